use serde::{Deserialize, Serialize};

use crate::*;
pub use random::*;
pub use shuffle::*;

mod random;
mod shuffle;

pub trait MinefieldGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout>;
}

/// How mine positions are drawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementStrategy {
    /// Rejection sampling for sparse boards, partial shuffle for dense ones.
    Auto,
    Rejection,
    PartialShuffle,
}

impl PlacementStrategy {
    /// Above this share of mines, rejection sampling wastes too many draws.
    const DENSE_BOARD_RATIO: (CellCount, CellCount) = (1, 2);

    pub fn resolve(self, config: GameConfig) -> Self {
        use PlacementStrategy::*;
        match self {
            Auto => {
                let (num, den) = Self::DENSE_BOARD_RATIO;
                let dense = u64::from(config.mines) * u64::from(den)
                    > u64::from(config.total_tiles()) * u64::from(num);
                if dense { PartialShuffle } else { Rejection }
            }
            other => other,
        }
    }
}

impl Default for PlacementStrategy {
    fn default() -> Self {
        Self::Auto
    }
}

/// Generator settings a host can load alongside [`GameConfig`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Forces a seed instead of random
    pub seed: Option<u64>,
    pub strategy: PlacementStrategy,
}

/// Seeded uniform placement, dispatching to the configured strategy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
    strategy: PlacementStrategy,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64, strategy: PlacementStrategy) -> Self {
        Self { seed, strategy }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout> {
        config.validate()?;

        let strategy = self.strategy.resolve(config);
        log::debug!(
            "placing {} mines on {}x{} with {:?} (seed {})",
            config.mines,
            config.width,
            config.height,
            strategy,
            self.seed
        );

        let layout = match strategy {
            PlacementStrategy::PartialShuffle => ShuffleGenerator::new(self.seed).generate(config)?,
            _ => RejectionGenerator::new(self.seed).generate(config)?,
        };

        // double check mine count
        if layout.mine_count() != config.mines {
            log::warn!(
                "Generated minefield count mismatch, actual: {}, requested: {}",
                layout.mine_count(),
                config.mines
            );
            return Err(GameError::InvalidConfiguration {
                width: config.width,
                height: config.height,
                mines: config.mines,
            });
        }

        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_strategy_switches_on_density() {
        let sparse = GameConfig::new(10, 10, 50).unwrap();
        let dense = GameConfig::new(10, 10, 51).unwrap();

        assert_eq!(
            PlacementStrategy::Auto.resolve(sparse),
            PlacementStrategy::Rejection
        );
        assert_eq!(
            PlacementStrategy::Auto.resolve(dense),
            PlacementStrategy::PartialShuffle
        );
        assert_eq!(
            PlacementStrategy::Rejection.resolve(dense),
            PlacementStrategy::Rejection
        );
    }

    #[test]
    fn same_seed_gives_same_layout() {
        let config = GameConfig::new(16, 16, 40).unwrap();
        for strategy in [PlacementStrategy::Rejection, PlacementStrategy::PartialShuffle] {
            let a = RandomMinefieldGenerator::new(7, strategy).generate(config).unwrap();
            let b = RandomMinefieldGenerator::new(7, strategy).generate(config).unwrap();
            assert_eq!(a, b);
            assert_eq!(a.mine_count(), 40);
        }
    }

    #[test]
    fn generator_refuses_invalid_config() {
        let config = GameConfig::new_unchecked(2, 2, 4);
        let result = RandomMinefieldGenerator::new(1, PlacementStrategy::Auto).generate(config);

        assert!(matches!(
            result,
            Err(GameError::InvalidConfiguration { mines: 4, .. })
        ));
    }
}
