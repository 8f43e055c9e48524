use thiserror::Error;

use crate::{CellCount, Coord, TileIndex};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: {width}x{height} board cannot hold {mines} mines")]
    InvalidConfiguration {
        width: Coord,
        height: Coord,
        mines: CellCount,
    },
    #[error("Tile index {index} out of range for a board of {tile_count} tiles")]
    InvalidIndex { index: TileIndex, tile_count: usize },
    #[error("Invalid coordinates")]
    InvalidCoords,
}

pub type Result<T> = core::result::Result<T, GameError>;
