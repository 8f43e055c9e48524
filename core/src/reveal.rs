use std::collections::VecDeque;

use crate::*;

/// Opens tiles on a [`Board`]: single reveals, zero-region cascades, chords and the end-of-game pass.
///
/// Every tile whose display changes is appended to the caller's `changed` list.
#[derive(Clone, Debug, Default)]
pub struct RevealEngine {
    revealed_count: CellCount,
    to_visit: VecDeque<TileIndex>,
}

impl RevealEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Safe tiles revealed so far. Mines never count.
    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    /// Reveal one tile, cascading through zero-count regions.
    ///
    /// A flagged tile is only unflagged; it takes a second reveal to open it.
    pub fn reveal_tile(
        &mut self,
        board: &mut Board,
        flags: &mut FlagTracker,
        index: TileIndex,
        changed: &mut Vec<TileIndex>,
    ) -> RevealOutcome {
        match board[index].state {
            TileState::Revealed => RevealOutcome::NoChange,
            TileState::Flagged => {
                flags.unflag(board, index);
                changed.push(index);
                RevealOutcome::Unflagged
            }
            TileState::Hidden => self.open(board, index, changed),
        }
    }

    /// Reveal every hidden neighbor of a numbered tile whose flagged neighbors match its number.
    ///
    /// Wrong flags are not second-guessed: a matching count opens the rest even if it hits a mine.
    pub fn chord_reveal(
        &mut self,
        board: &mut Board,
        flags: &FlagTracker,
        index: TileIndex,
        changed: &mut Vec<TileIndex>,
    ) -> RevealOutcome {
        let tile = board[index];
        if tile.state != TileState::Revealed || tile.adjacent_mines == 0 {
            return RevealOutcome::NoChange;
        }
        if flags.flagged_neighbor_count(board, index) != tile.adjacent_mines {
            return RevealOutcome::NoChange;
        }

        let mut outcome = RevealOutcome::NoChange;
        for neighbor in board.adjacent_indices(index) {
            // an earlier neighbor's cascade may already have opened this one
            if board[neighbor].state != TileState::Hidden {
                continue;
            }
            outcome = outcome | self.open(board, neighbor, changed);
            if outcome.hit_mine() {
                break;
            }
        }
        outcome
    }

    fn open(&mut self, board: &mut Board, index: TileIndex, changed: &mut Vec<TileIndex>) -> RevealOutcome {
        board[index].state = TileState::Revealed;
        changed.push(index);

        if board[index].mine {
            log::debug!("mine hit at {}", index);
            return RevealOutcome::HitMine(index);
        }

        self.revealed_count += 1;
        log::trace!(
            "Open tile at {}, mine count: {}",
            index,
            board[index].adjacent_mines
        );
        if board[index].adjacent_mines == 0 {
            self.cascade(board, index, changed);
        }
        RevealOutcome::Revealed
    }

    /// Flood reveal from a zero tile. Tiles are marked revealed as they are queued, so the tile state doubles as
    /// the visited set and each tile is queued at most once.
    fn cascade(&mut self, board: &mut Board, origin: TileIndex, changed: &mut Vec<TileIndex>) {
        self.to_visit.clear();
        self.to_visit.push_back(origin);
        let before = changed.len();

        while let Some(current) = self.to_visit.pop_front() {
            for neighbor in board.adjacent_indices(current) {
                // skip flagged or already opened tiles
                if board[neighbor].state != TileState::Hidden {
                    continue;
                }

                // neighbors of a zero tile are never mines
                board[neighbor].state = TileState::Revealed;
                self.revealed_count += 1;
                changed.push(neighbor);

                if board[neighbor].adjacent_mines == 0 {
                    self.to_visit.push_back(neighbor);
                }
            }
        }

        log::trace!(
            "flood-fill from {} opened {} more tiles",
            origin,
            changed.len() - before
        );
    }

    /// Final display pass once the game is over.
    ///
    /// - flags on safe tiles become [`EndMark::IncorrectFlag`] and stay closed
    /// - mines are marked, keeping a correct flag, and `exploded` is marked apart from the rest
    /// - remaining hidden safe tiles are revealed
    pub fn reveal_all(
        &mut self,
        board: &mut Board,
        exploded: Option<TileIndex>,
        changed: &mut Vec<TileIndex>,
    ) {
        for index in 0..board.tile_count() {
            let tile = &mut board[index];
            match (tile.mine, tile.state) {
                (true, _) if exploded == Some(index) => tile.mark = EndMark::Exploded,
                (true, _) => tile.mark = EndMark::Mine,
                (false, TileState::Flagged) => tile.mark = EndMark::IncorrectFlag,
                (false, TileState::Hidden) => {
                    tile.state = TileState::Revealed;
                    self.revealed_count += 1;
                }
                (false, TileState::Revealed) => continue,
            }
            changed.push(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        board: Board,
        flags: FlagTracker,
        engine: RevealEngine,
        changed: Vec<TileIndex>,
    }

    impl Fixture {
        fn new(size: Coord2, mines: &[TileIndex]) -> Self {
            Self {
                board: Board::from_layout(&MineLayout::from_indices(size, mines).unwrap()),
                flags: FlagTracker::new(),
                engine: RevealEngine::new(),
                changed: Vec::new(),
            }
        }

        fn reveal(&mut self, index: TileIndex) -> RevealOutcome {
            self.engine
                .reveal_tile(&mut self.board, &mut self.flags, index, &mut self.changed)
        }

        fn chord(&mut self, index: TileIndex) -> RevealOutcome {
            self.engine
                .chord_reveal(&mut self.board, &self.flags, index, &mut self.changed)
        }

        fn flag(&mut self, index: TileIndex) {
            self.flags.toggle_flag(&mut self.board, index);
        }

        fn state(&self, index: TileIndex) -> TileState {
            self.board[index].state()
        }
    }

    #[test]
    fn zero_tile_cascades_to_numbered_border() {
        let mut f = Fixture::new((3, 3), &[8]);

        assert_eq!(f.reveal(0), RevealOutcome::Revealed);

        for index in 0..8 {
            assert_eq!(f.state(index), TileState::Revealed, "tile {}", index);
        }
        assert_eq!(f.state(8), TileState::Hidden);
        assert_eq!(f.engine.revealed_count(), 8);
    }

    #[test]
    fn numbered_tile_does_not_cascade() {
        let mut f = Fixture::new((3, 3), &[8]);

        assert_eq!(f.reveal(4), RevealOutcome::Revealed);

        assert_eq!(f.board[4].display(), TileDisplay::Revealed(1));
        assert_eq!(f.engine.revealed_count(), 1);
        assert_eq!(f.changed, vec![4]);
    }

    #[test]
    fn cascade_stops_at_flags() {
        let mut f = Fixture::new((5, 1), &[4]);
        f.flag(1);

        f.reveal(0);

        assert_eq!(f.state(0), TileState::Revealed);
        assert_eq!(f.state(1), TileState::Flagged);
        assert_eq!(f.state(2), TileState::Hidden);
    }

    #[test]
    fn cascade_is_bounded_on_open_board() {
        let mut f = Fixture::new((200, 200), &[39_999]);

        f.reveal(0);

        assert_eq!(f.engine.revealed_count(), 39_999);
        assert_eq!(f.changed.len(), 39_999);
    }

    #[test]
    fn reveal_on_flag_only_unflags() {
        let mut f = Fixture::new((3, 3), &[8]);
        f.flag(0);

        assert_eq!(f.reveal(0), RevealOutcome::Unflagged);
        assert_eq!(f.state(0), TileState::Hidden);
        assert_eq!(f.flags.flag_count(), 0);

        assert_eq!(f.reveal(0), RevealOutcome::Revealed);
        assert_eq!(f.state(0), TileState::Revealed);
    }

    #[test]
    fn reveal_mine_reports_index() {
        let mut f = Fixture::new((3, 3), &[8]);

        assert_eq!(f.reveal(8), RevealOutcome::HitMine(8));
        assert_eq!(f.engine.revealed_count(), 0);
    }

    #[test]
    fn revealing_twice_is_no_change() {
        let mut f = Fixture::new((3, 3), &[8]);
        f.reveal(4);

        assert_eq!(f.reveal(4), RevealOutcome::NoChange);
    }

    #[test]
    fn chord_reveal_uses_flagged_neighbors() {
        // mines left and right of the center column
        let mut f = Fixture::new((3, 3), &[3, 5]);
        f.reveal(4);
        f.flag(3);
        f.flag(5);

        let outcome = f.chord(4);

        assert_eq!(outcome, RevealOutcome::Revealed);
        assert_eq!(f.board[1].display(), TileDisplay::Revealed(2));
        assert_eq!(f.board[7].display(), TileDisplay::Revealed(2));
        assert_eq!(f.engine.revealed_count(), 7);
    }

    #[test]
    fn chord_reveal_cascades_from_opened_zero() {
        let mut f = Fixture::new((5, 1), &[0]);
        f.reveal(1);
        f.flag(0);

        assert_eq!(f.chord(1), RevealOutcome::Revealed);
        for index in 2..5 {
            assert_eq!(f.state(index), TileState::Revealed);
        }
        assert_eq!(f.state(0), TileState::Flagged);
        assert_eq!(f.engine.revealed_count(), 4);
    }

    #[test]
    fn chord_reveal_is_noop_on_flag_mismatch() {
        let mut f = Fixture::new((3, 3), &[3, 5]);
        f.reveal(4);
        f.flag(3);

        assert_eq!(f.chord(4), RevealOutcome::NoChange);

        f.flag(0);
        f.flag(1);
        assert_eq!(f.chord(4), RevealOutcome::NoChange);
        assert_eq!(f.engine.revealed_count(), 1);
    }

    #[test]
    fn chord_reveal_with_wrong_flag_detonates() {
        let mut f = Fixture::new((3, 3), &[8]);
        f.reveal(4);
        f.flag(0);

        assert_eq!(f.chord(4), RevealOutcome::HitMine(8));
    }

    #[test]
    fn chord_reveal_ignores_hidden_and_zero_tiles() {
        let mut f = Fixture::new((3, 3), &[8]);

        assert_eq!(f.chord(4), RevealOutcome::NoChange);

        f.reveal(0);
        assert_eq!(f.chord(0), RevealOutcome::NoChange);
    }

    #[test]
    fn reveal_all_marks_flags_and_mines() {
        let mut f = Fixture::new((3, 3), &[0, 8]);
        f.flag(0);
        f.flag(2);
        f.reveal(8);
        f.changed.clear();

        f.engine.reveal_all(&mut f.board, Some(8), &mut f.changed);

        assert_eq!(f.board[0].display(), TileDisplay::FlaggedMine);
        assert_eq!(f.board[2].display(), TileDisplay::IncorrectFlag);
        assert_eq!(f.board[8].display(), TileDisplay::Exploded);
        assert_eq!(f.board[4].display(), TileDisplay::Revealed(2));
        assert_eq!(f.state(2), TileState::Flagged);
        assert_eq!(f.changed.len(), 9);
    }
}
