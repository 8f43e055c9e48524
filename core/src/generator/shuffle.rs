use super::*;

/// Partial Fisher-Yates shuffle over every tile index, O(tile count) regardless of density.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ShuffleGenerator {
    seed: u64,
}

impl ShuffleGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinefieldGenerator for ShuffleGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout> {
        use rand::prelude::*;

        config.validate()?;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut indices: Vec<TileIndex> = (0..config.total_tiles() as usize).collect();
        let (mines, _) = indices.partial_shuffle(&mut rng, config.mines as usize);

        MineLayout::from_indices(config.size(), mines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_board_keeps_exactly_one_safe_tile() {
        let config = GameConfig::new(30, 16, 479).unwrap();
        let layout = ShuffleGenerator::new(11).generate(config).unwrap();

        assert_eq!(layout.mine_count(), 479);
        assert_eq!(layout.total_tiles() - layout.mine_count(), 1);
    }

    #[test]
    fn different_seeds_usually_differ() {
        let config = GameConfig::new(16, 16, 40).unwrap();
        let a = ShuffleGenerator::new(1).generate(config).unwrap();
        let b = ShuffleGenerator::new(2).generate(config).unwrap();

        assert_ne!(a, b);
    }
}
