use crate::*;

/// Flag bookkeeping over a [`Board`]'s tile states.
///
/// The tracker never checks whether the session still accepts moves; [`GameSession`] gates that before
/// delegating here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlagTracker {
    flagged_count: CellCount,
}

impl FlagTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hidden becomes flagged, flagged becomes hidden, revealed tiles are left alone.
    pub fn toggle_flag(&mut self, board: &mut Board, index: TileIndex) -> MarkOutcome {
        use MarkOutcome::*;
        use TileState::*;

        match board[index].state {
            Hidden => {
                board[index].state = Flagged;
                self.flagged_count = self.flagged_count.saturating_add(1);
                Changed
            }
            Flagged => {
                self.unflag(board, index);
                Changed
            }
            Revealed => NoChange,
        }
    }

    /// Flags every hidden neighbor of a revealed tile once the unrevealed neighbors can only be mines.
    pub fn chord_flag(
        &mut self,
        board: &mut Board,
        index: TileIndex,
        changed: &mut Vec<TileIndex>,
    ) -> MarkOutcome {
        let tile = board[index];
        if tile.state != TileState::Revealed || tile.adjacent_mines == 0 {
            return MarkOutcome::NoChange;
        }

        let unrevealed = board
            .adjacent_indices(index)
            .filter(|&pos| board[pos].state.is_unrevealed())
            .count();
        if unrevealed != usize::from(tile.adjacent_mines) {
            return MarkOutcome::NoChange;
        }

        let before = changed.len();
        for pos in board.adjacent_indices(index) {
            if board[pos].state == TileState::Hidden {
                board[pos].state = TileState::Flagged;
                self.flagged_count = self.flagged_count.saturating_add(1);
                changed.push(pos);
            }
        }

        if changed.len() > before {
            MarkOutcome::Changed
        } else {
            MarkOutcome::NoChange
        }
    }

    pub(crate) fn unflag(&mut self, board: &mut Board, index: TileIndex) {
        if board[index].state == TileState::Flagged {
            board[index].state = TileState::Hidden;
            self.flagged_count = self.flagged_count.saturating_sub(1);
        }
    }

    pub fn flag_count(&self) -> CellCount {
        self.flagged_count
    }

    pub fn flagged_neighbor_count(&self, board: &Board, index: TileIndex) -> u8 {
        board
            .adjacent_indices(index)
            .filter(|&pos| board[pos].state == TileState::Flagged)
            .count() as u8
    }

    /// How many mines have not been flagged yet, negative when over-flagged
    pub fn mines_left(&self, board: &Board) -> i64 {
        i64::from(board.mine_count()) - i64::from(self.flagged_count)
    }
}
