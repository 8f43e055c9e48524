use rand::prelude::*;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::*;

/// Valid transitions:
/// - Pending -> Active
/// - Pending -> Won / Lost, when the very first reveal ends the game
/// - Active -> Won
/// - Active -> Lost
/// - any -> Pending, through reset
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Board built, nothing revealed yet
    Pending,
    /// At least one tile revealed, clock running
    Active,
    Won,
    Lost,
}

impl SessionState {
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Pending
    }
}

/// One game from first reveal to win or loss, rebuilt in place by [`GameSession::reset`].
///
/// All mutation goes through `&mut self`, so intents and timer ticks are processed strictly one after another.
/// Hosts sharing a session across threads must wrap it in a single lock.
#[derive(Debug)]
pub struct GameSession<O = ()> {
    config: GameConfig,
    strategy: PlacementStrategy,
    seeds: SmallRng,
    board: Board,
    flags: FlagTracker,
    engine: RevealEngine,
    timer: TimerController,
    state: SessionState,
    exploded: Option<TileIndex>,
    observer: O,
    changed: Vec<TileIndex>,
}

impl GameSession<()> {
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_observer(config, ())
    }
}

impl<O: SessionObserver> GameSession<O> {
    pub fn with_observer(config: GameConfig, observer: O) -> Result<Self> {
        Self::with_generator(config, GeneratorConfig::default(), observer)
    }

    /// Reproducible session: the same seed yields the same sequence of boards across resets.
    pub fn with_seed(config: GameConfig, seed: u64, observer: O) -> Result<Self> {
        let generator = GeneratorConfig {
            seed: Some(seed),
            ..Default::default()
        };
        Self::with_generator(config, generator, observer)
    }

    pub fn with_generator(
        config: GameConfig,
        generator: GeneratorConfig,
        observer: O,
    ) -> Result<Self> {
        config.validate()?;
        let mut seeds = Self::seed_stream(generator.seed);
        let board = Self::build_board(&mut seeds, generator.strategy, config)?;
        Ok(Self::assemble(config, generator.strategy, seeds, board, observer))
    }

    /// Session over a fixed mine layout. Later resets draw random layouts of the same size.
    pub fn from_layout(layout: MineLayout, observer: O) -> Self {
        let config = layout.game_config();
        let board = Board::from_layout(&layout);
        Self::assemble(
            config,
            PlacementStrategy::default(),
            Self::seed_stream(None),
            board,
            observer,
        )
    }

    fn assemble(
        config: GameConfig,
        strategy: PlacementStrategy,
        seeds: SmallRng,
        board: Board,
        observer: O,
    ) -> Self {
        Self {
            config,
            strategy,
            seeds,
            board,
            flags: FlagTracker::new(),
            engine: RevealEngine::new(),
            timer: TimerController::new(),
            state: SessionState::default(),
            exploded: None,
            observer,
            changed: Vec::new(),
        }
    }

    fn seed_stream(seed: Option<u64>) -> SmallRng {
        let seed = seed.unwrap_or_else(rand::random);
        log::debug!("seed: {}", seed);
        SmallRng::seed_from_u64(seed)
    }

    fn build_board(
        seeds: &mut SmallRng,
        strategy: PlacementStrategy,
        config: GameConfig,
    ) -> Result<Board> {
        let mut board = Board::new(config)?;
        board.place_mines(RandomMinefieldGenerator::new(seeds.random(), strategy))?;
        Ok(board)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn tile_state(&self, index: TileIndex) -> Result<TileState> {
        Ok(self.board.tile(index)?.state())
    }

    pub fn tile_display(&self, index: TileIndex) -> Result<TileDisplay> {
        Ok(self.board.tile(index)?.display())
    }

    pub fn adjacent_mine_count(&self, index: TileIndex) -> Result<u8> {
        self.board.adjacent_mine_count(index)
    }

    pub fn flagged_neighbor_count(&self, index: TileIndex) -> Result<u8> {
        let index = self.board.validate_index(index)?;
        Ok(self.flags.flagged_neighbor_count(&self.board, index))
    }

    pub fn flag_count(&self) -> CellCount {
        self.flags.flag_count()
    }

    /// How many mines have not been flagged yet
    pub fn mines_left(&self) -> i64 {
        self.flags.mines_left(&self.board)
    }

    pub fn revealed_count(&self) -> CellCount {
        self.engine.revealed_count()
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.timer.elapsed_seconds()
    }

    /// The mine that ended the game, if it was lost
    pub fn exploded_index(&self) -> Option<TileIndex> {
        self.exploded
    }

    pub fn can_chord_reveal(&self, index: TileIndex) -> Result<bool> {
        let tile = *self.board.tile(index)?;
        Ok(!self.is_finished()
            && tile.state() == TileState::Revealed
            && tile.adjacent_mines() > 0
            && self.flags.flagged_neighbor_count(&self.board, index) == tile.adjacent_mines())
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::from_session(self)
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Reveal a tile, cascading through zero regions. Revealing a flagged tile only removes the flag.
    pub fn reveal_tile(&mut self, index: TileIndex) -> Result<RevealOutcome> {
        let index = self.board.validate_index(index)?;
        if self.state.is_finished() {
            return Ok(RevealOutcome::NoChange);
        }

        let outcome =
            self.engine
                .reveal_tile(&mut self.board, &mut self.flags, index, &mut self.changed);
        Ok(self.settle(outcome))
    }

    /// Reveal the hidden neighbors of a numbered tile once its flagged neighbors match its number.
    pub fn chord_reveal(&mut self, index: TileIndex) -> Result<RevealOutcome> {
        let index = self.board.validate_index(index)?;
        if self.state.is_finished() {
            return Ok(RevealOutcome::NoChange);
        }

        let outcome =
            self.engine
                .chord_reveal(&mut self.board, &self.flags, index, &mut self.changed);
        Ok(self.settle(outcome))
    }

    pub fn toggle_flag(&mut self, index: TileIndex) -> Result<MarkOutcome> {
        let index = self.board.validate_index(index)?;
        if self.state.is_finished() {
            return Ok(MarkOutcome::NoChange);
        }

        let outcome = self.flags.toggle_flag(&mut self.board, index);
        if outcome.has_update() {
            self.changed.push(index);
            self.flush_changes();
            self.notify_flag_count();
        }
        Ok(outcome)
    }

    /// Flag every hidden neighbor of a numbered tile when they can only be mines.
    pub fn chord_flag(&mut self, index: TileIndex) -> Result<MarkOutcome> {
        let index = self.board.validate_index(index)?;
        if self.state.is_finished() {
            return Ok(MarkOutcome::NoChange);
        }

        let outcome = self
            .flags
            .chord_flag(&mut self.board, index, &mut self.changed);
        if outcome.has_update() {
            self.flush_changes();
            self.notify_flag_count();
        }
        Ok(outcome)
    }

    /// New random board with the current configuration.
    pub fn reset(&mut self) -> Result<()> {
        self.reset_with(self.config)
    }

    /// Like [`GameSession::reset_with`], keeping current values for omitted parameters.
    pub fn reconfigure(
        &mut self,
        width: Option<Coord>,
        height: Option<Coord>,
        mines: Option<CellCount>,
    ) -> Result<()> {
        let config = GameConfig::new_unchecked(
            width.unwrap_or(self.config.width),
            height.unwrap_or(self.config.height),
            mines.unwrap_or(self.config.mines),
        );
        self.reset_with(config)
    }

    /// Discard the current board and start over in [`SessionState::Pending`].
    ///
    /// An invalid `config` is rejected before anything changes.
    pub fn reset_with(&mut self, config: GameConfig) -> Result<()> {
        config.validate()?;
        let board = Self::build_board(&mut self.seeds, self.strategy, config)?;

        self.teardown();
        self.config = config;
        self.board = board;
        self.flags = FlagTracker::new();
        self.engine = RevealEngine::new();
        self.timer.reset();
        self.state = SessionState::Pending;
        self.exploded = None;
        self.changed.clear();
        log::debug!(
            "new board {}x{} with {} mines",
            config.width,
            config.height,
            config.mines
        );

        self.observer.notify(SessionEvent::Reset { config });
        self.notify_flag_count();
        Ok(())
    }

    /// Stop the clock of the current game. Called by every reset before the old board is dropped.
    pub fn teardown(&mut self) {
        log::debug!(
            "tearing down {:?} session after {}s",
            self.state,
            self.timer.elapsed_seconds()
        );
        self.timer.pause();
    }

    /// Suspend the clock, e.g. while the host is hidden.
    pub fn pause(&mut self) {
        self.timer.pause();
    }

    /// Resume a paused clock. Only an active game runs its clock.
    pub fn resume(&mut self) {
        if matches!(self.state, SessionState::Active) {
            self.timer.resume();
        }
    }

    /// One second from a host interval.
    pub fn tick(&mut self) {
        if matches!(self.state, SessionState::Active) && self.timer.tick() {
            self.observer.notify(SessionEvent::TimerTick {
                elapsed_seconds: self.timer.elapsed_seconds(),
            });
        }
    }

    /// Wall-clock reading; fires one tick notification per whole second since the previous poll.
    ///
    /// Readings only need to be consistent with each other. The first poll after the clock starts
    /// or resumes sets the reference point.
    pub fn poll_timer(&mut self, now: Instant) {
        let seconds = self.timer.poll(now);
        let end = self.timer.elapsed_seconds();
        for elapsed_seconds in end - seconds + 1..=end {
            self.observer
                .notify(SessionEvent::TimerTick { elapsed_seconds });
        }
    }

    fn settle(&mut self, outcome: RevealOutcome) -> RevealOutcome {
        use RevealOutcome::*;

        self.flush_changes();
        match outcome {
            NoChange => NoChange,
            Unflagged => {
                self.notify_flag_count();
                Unflagged
            }
            HitMine(index) => {
                self.mark_started();
                self.end_game(Some(index));
                HitMine(index)
            }
            Revealed | Won => {
                self.mark_started();
                if self.engine.revealed_count() >= self.board.safe_tiles() {
                    self.end_game(None);
                    Won
                } else {
                    Revealed
                }
            }
        }
    }

    /// Checks if the state is initial and changes to active, starting the clock
    fn mark_started(&mut self) {
        if self.state.is_pending() {
            log::debug!("session started");
            self.state = SessionState::Active;
            self.timer.resume();
        }
    }

    fn end_game(&mut self, exploded: Option<TileIndex>) {
        if self.state.is_finished() {
            return;
        }

        self.state = if exploded.is_some() {
            SessionState::Lost
        } else {
            SessionState::Won
        };
        self.exploded = exploded;
        self.timer.pause();
        self.engine
            .reveal_all(&mut self.board, exploded, &mut self.changed);
        self.flush_changes();

        let elapsed_seconds = self.timer.elapsed_seconds();
        log::debug!("ended {:?} after {}s", self.state, elapsed_seconds);
        self.observer.notify(match exploded {
            Some(index) => SessionEvent::GameLost { index },
            None => SessionEvent::GameWon { elapsed_seconds },
        });
    }

    fn flush_changes(&mut self) {
        for index in self.changed.drain(..) {
            let display = self.board[index].display();
            self.observer
                .notify(SessionEvent::TileChanged { index, display });
        }
    }

    fn notify_flag_count(&mut self) {
        self.observer.notify(SessionEvent::FlagCountChanged {
            count: self.flags.flag_count(),
        });
    }
}
