use serde::{Deserialize, Serialize};

/// Player-driven state of a tile. Revealed and flagged are mutually exclusive.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileState {
    Hidden,
    Revealed,
    Flagged,
}

impl TileState {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }
}

impl Default for TileState {
    fn default() -> Self {
        Self::Hidden
    }
}

/// Marker applied by the end-of-game reveal pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndMark {
    None,
    /// Mine that was not detonated.
    Mine,
    /// Flag placed on a safe tile.
    IncorrectFlag,
    /// The mine that ended the game.
    Exploded,
}

impl Default for EndMark {
    fn default() -> Self {
        Self::None
    }
}

/// What a renderer should draw for a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileDisplay {
    Hidden,
    Flagged,
    Revealed(u8),
    Mine,
    FlaggedMine,
    IncorrectFlag,
    Exploded,
}

impl TileDisplay {
    /// Whether the tile is visually closed
    pub const fn is_closed(self) -> bool {
        use TileDisplay::*;
        match self {
            Hidden => true,
            Flagged => true,
            Revealed(_) => false,
            Mine => false,
            FlaggedMine => true,
            IncorrectFlag => true,
            Exploded => false,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub(crate) mine: bool,
    pub(crate) adjacent_mines: u8,
    pub(crate) state: TileState,
    pub(crate) mark: EndMark,
}

impl Tile {
    pub const fn is_mine(&self) -> bool {
        self.mine
    }

    pub const fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    pub const fn state(&self) -> TileState {
        self.state
    }

    pub const fn mark(&self) -> EndMark {
        self.mark
    }

    pub const fn display(&self) -> TileDisplay {
        use TileDisplay::*;
        match (self.state, self.mark) {
            (_, EndMark::Exploded) => Exploded,
            (TileState::Flagged, EndMark::IncorrectFlag) => IncorrectFlag,
            (TileState::Flagged, EndMark::Mine) => FlaggedMine,
            (_, EndMark::Mine) => Mine,
            (TileState::Hidden, _) => Hidden,
            (TileState::Flagged, _) => Flagged,
            (TileState::Revealed, _) => Revealed(self.adjacent_mines),
        }
    }
}
