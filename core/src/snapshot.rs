use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Everything a renderer needs to redraw the board from scratch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub config: GameConfig,
    pub state: SessionState,
    pub elapsed_seconds: u32,
    pub flag_count: CellCount,
    pub mines_left: i64,
    /// Indexed `[row, column]`.
    pub tiles: Array2<TileDisplay>,
}

impl BoardSnapshot {
    pub fn from_session<O: SessionObserver>(session: &GameSession<O>) -> Self {
        let board = session.board();
        let config = board.config();
        let tiles = Array2::from_shape_fn(config.nd_shape(), |(row, column)| {
            board[row * usize::from(config.width) + column].display()
        });

        Self {
            config,
            state: session.state(),
            elapsed_seconds: session.elapsed_seconds(),
            flag_count: session.flag_count(),
            mines_left: session.mines_left(),
            tiles,
        }
    }

    pub fn display_at(&self, coords: Coord2) -> Option<TileDisplay> {
        self.tiles.get(coords.to_nd_index()).copied()
    }

    pub fn count(&self, display: TileDisplay) -> usize {
        self.tiles.iter().filter(|&&tile| tile == display).count()
    }

    /// Tiles still drawn as closed, including end-of-game flags.
    pub fn closed_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_closed()).count()
    }
}
