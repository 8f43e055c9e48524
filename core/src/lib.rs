use core::ops::BitOr;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use error::*;
pub use events::*;
pub use flags::*;
pub use generator::*;
pub use reveal::*;
pub use session::*;
pub use snapshot::*;
pub use tile::*;
pub use timer::*;
pub use types::*;

mod board;
mod error;
mod events;
mod flags;
mod generator;
mod reveal;
mod session;
mod snapshot;
mod tile;
mod timer;
mod types;

/// Board dimensions and mine count for one session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: Coord,
    pub height: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(width: Coord, height: Coord, mines: CellCount) -> Self {
        Self {
            width,
            height,
            mines,
        }
    }

    pub fn new(width: Coord, height: Coord, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(width, height, mines);
        config.validate()?;
        Ok(config)
    }

    /// At least one tile must stay safe, so `mines == total_tiles` is rejected too.
    pub fn validate(&self) -> Result<()> {
        if self.width < 1 || self.height < 1 || self.mines >= self.total_tiles() {
            Err(GameError::InvalidConfiguration {
                width: self.width,
                height: self.height,
                mines: self.mines,
            })
        } else {
            Ok(())
        }
    }

    pub const fn size(&self) -> Coord2 {
        (self.width, self.height)
    }

    pub const fn total_tiles(&self) -> CellCount {
        mult(self.width, self.height)
    }

    pub const fn safe_tiles(&self) -> CellCount {
        self.total_tiles().saturating_sub(self.mines)
    }

    pub(crate) const fn nd_shape(&self) -> (usize, usize) {
        (self.height as usize, self.width as usize)
    }
}

/// A concrete placement of mines on a board of a given size.
///
/// Deserialized layouts go through the same checks as the constructors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMineLayout")]
pub struct MineLayout {
    config: GameConfig,
    mine_mask: Array2<bool>,
}

#[derive(Deserialize)]
struct RawMineLayout {
    config: GameConfig,
    mine_mask: Array2<bool>,
}

impl TryFrom<RawMineLayout> for MineLayout {
    type Error = GameError;

    fn try_from(raw: RawMineLayout) -> Result<Self> {
        let layout = Self::from_mine_mask(raw.config.size(), raw.mine_mask)?;
        if layout.config != raw.config {
            return Err(GameError::InvalidConfiguration {
                width: raw.config.width,
                height: raw.config.height,
                mines: raw.config.mines,
            });
        }
        Ok(layout)
    }
}

impl MineLayout {
    /// Builds a layout from flat tile indices. Duplicates collapse into one mine.
    pub fn from_indices(size: Coord2, mine_indices: &[TileIndex]) -> Result<Self> {
        let bounds = GameConfig::new_unchecked(size.0, size.1, 0);
        let tile_count = bounds.total_tiles() as usize;
        let mut mine_mask: Array2<bool> = Array2::default(bounds.nd_shape());

        for &index in mine_indices {
            if index >= tile_count {
                return Err(GameError::InvalidIndex { index, tile_count });
            }
            let column = index % usize::from(size.0);
            let row = index / usize::from(size.0);
            mine_mask[[row, column]] = true;
        }

        Self::from_mine_mask(size, mine_mask)
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let bounds = GameConfig::new_unchecked(size.0, size.1, 0);
        let mut mine_mask: Array2<bool> = Array2::default(bounds.nd_shape());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(size, mine_mask)
    }

    fn from_mine_mask(size: Coord2, mine_mask: Array2<bool>) -> Result<Self> {
        let bounds = GameConfig::new_unchecked(size.0, size.1, 0);
        if mine_mask.dim() != bounds.nd_shape() {
            let (rows, columns) = mine_mask.dim();
            return Err(GameError::InvalidConfiguration {
                width: Coord::try_from(columns).unwrap_or(Coord::MAX),
                height: Coord::try_from(rows).unwrap_or(Coord::MAX),
                mines: 0,
            });
        }
        let mines = mine_mask.iter().filter(|&&is_mine| is_mine).count();
        let config = GameConfig::new(
            size.0,
            size.1,
            CellCount::try_from(mines).unwrap_or(CellCount::MAX),
        )?;
        Ok(Self { config, mine_mask })
    }

    pub fn game_config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size()
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines
    }

    pub fn total_tiles(&self) -> CellCount {
        self.config.total_tiles()
    }

    pub fn contains_mine(&self, index: TileIndex) -> bool {
        self.mine_indices().any(|mine| mine == index)
    }

    /// Mine positions in ascending index order.
    pub fn mine_indices(&self) -> impl Iterator<Item = TileIndex> + '_ {
        self.mine_mask
            .iter()
            .enumerate()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|(index, _)| index)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    /// A flagged tile was cleared instead of revealed.
    Unflagged,
    Revealed,
    HitMine(TileIndex),
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Unflagged => true,
            Revealed => true,
            HitMine(_) => true,
            Won => true,
        }
    }

    pub const fn hit_mine(self) -> bool {
        matches!(self, Self::HitMine(_))
    }
}

/// Used to merge outcomes when revealing several tiles in one intent
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine(index), _) => HitMine(index),
            (_, HitMine(index)) => HitMine(index),
            (Won, _) => Won,
            (_, Won) => Won,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (Unflagged, _) => Unflagged,
            (_, Unflagged) => Unflagged,
            (NoChange, NoChange) => NoChange,
        }
    }
}
