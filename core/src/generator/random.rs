use super::*;

/// Draws one index at a time and discards duplicates until enough mines are placed.
///
/// Terminates almost surely since at least one tile is always left safe, but the expected number of draws grows
/// quickly as the board fills up.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RejectionGenerator {
    seed: u64,
}

impl RejectionGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinefieldGenerator for RejectionGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout> {
        use rand::prelude::*;

        config.validate()?;

        let total_tiles = config.total_tiles() as usize;
        let wanted = config.mines as usize;
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut taken = vec![false; total_tiles];
        let mut mines = Vec::with_capacity(wanted);
        let mut draws: u64 = 0;

        while mines.len() < wanted {
            let index = rng.random_range(0..total_tiles);
            draws += 1;
            if !taken[index] {
                taken[index] = true;
                mines.push(index);
            }
        }
        log::trace!("rejection sampling took {} draws for {} mines", draws, wanted);

        MineLayout::from_indices(config.size(), &mines)
    }
}
