use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::cell::CellState;
use crate::engine::{OpenOutcome, OpenedCell};
use crate::error::{GameError, Result};
use crate::generator::{MinePlacer, RandomPlacer};
use crate::level::Level;
use crate::types::{CellCount, Pos};

/// Session lifecycle. Transitions: `NotStarted -> Running` on the first
/// open, `Running -> Won` through flags, `Running -> Lost` through a mine.
/// `Won` and `Lost` are terminal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    NotStarted,
    Running,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// Whether a command ended the game, and how.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Ongoing,
    Won,
    Lost,
}

impl Outcome {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

/// Result of [`Session::open`] and [`Session::chord`]: every cell the
/// command opened, plus the outcome. After a loss the list also carries
/// the full board sweep, so the UI can redraw from it alone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenResult {
    pub opened: Vec<OpenedCell>,
    pub outcome: Outcome,
}

/// Result of [`Session::toggle_flag`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagResult {
    pub state: CellState,
    pub remaining_flags: CellCount,
    pub correct_flags: CellCount,
    pub outcome: Outcome,
}

/// Copyable snapshot of the session counters for rendering.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub level: Level,
    pub mine_count: CellCount,
    pub remaining_flags: CellCount,
    pub correct_flags: CellCount,
    pub status: GameStatus,
    pub elapsed_secs: u32,
}

/// Play clock advanced one second at a time by [`Session::tick`]. The
/// `Display` form is `HH:MM:SS` with the hours wrapping at 24, the string
/// highscore records store.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameClock {
    secs: u32,
}

impl GameClock {
    pub const fn secs(self) -> u32 {
        self.secs
    }

    fn tick(&mut self) {
        self.secs = self.secs.saturating_add(1);
    }

    fn reset(&mut self) {
        self.secs = 0;
    }
}

impl fmt::Display for GameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = (self.secs / 3600) % 24;
        let minutes = (self.secs / 60) % 60;
        let seconds = self.secs % 60;
        write!(f, "{hours:02}:{minutes:02}:{seconds:02}")
    }
}

/// One game from first open to `Won`/`Lost`.
///
/// The session owns the board exclusively; callers see state only through
/// the returned results, [`SessionView`] snapshots, and the read-only
/// [`Session::board`] projection. Mines are placed lazily by the first
/// `open`, with the opened cell excluded, so the first open never explodes
/// under a well-behaved placer.
#[derive(Clone, Debug)]
pub struct Session<P = RandomPlacer> {
    level: Level,
    board: Board,
    placer: P,
    mines_placed: bool,
    status: GameStatus,
    clock: GameClock,
}

impl Session<RandomPlacer> {
    /// Session with entropy-seeded mine placement.
    pub fn new(level: Level) -> Self {
        Self::with_placer(level, RandomPlacer::new())
    }

    /// Deterministic session: the same seed and the same moves replay the
    /// same game.
    pub fn seeded(level: Level, seed: u64) -> Self {
        Self::with_placer(level, RandomPlacer::seeded(seed))
    }
}

impl<P: MinePlacer> Session<P> {
    pub fn with_placer(level: Level, placer: P) -> Self {
        Self {
            board: Board::new(&level),
            level,
            placer,
            mines_placed: false,
            status: GameStatus::default(),
            clock: GameClock::default(),
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Read-only view of the board. All mutation goes through the session.
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn clock(&self) -> GameClock {
        self.clock
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.clock.secs()
    }

    /// Play time formatted for a highscore record.
    pub fn time_string(&self) -> String {
        self.clock.to_string()
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            level: self.level,
            mine_count: self.board.mine_count(),
            remaining_flags: self.board.remaining_flags(),
            correct_flags: self.board.correct_flags(),
            status: self.status,
            elapsed_secs: self.clock.secs(),
        }
    }

    /// Advance the play clock by one second. The embedding layer drives
    /// this from its own timer; only running games accumulate time.
    pub fn tick(&mut self) {
        if matches!(self.status, GameStatus::Running) {
            self.clock.tick();
        }
    }

    /// Throw away the current board and start over on `level`. The placer
    /// is retained, so a seeded session continues its layout sequence.
    pub fn new_game(&mut self, level: Level) -> SessionView {
        self.level = level;
        self.board = Board::new(&level);
        self.mines_placed = false;
        self.status = GameStatus::NotStarted;
        self.clock.reset();
        log::debug!(
            "new {} game, {}x{} with {} mines",
            level.name(),
            level.width(),
            level.height(),
            level.mines()
        );
        self.view()
    }

    /// Open a cell. The first open of a game places the mines, keeping
    /// `pos` mine-free, and sets the game running; this happens even when
    /// the open itself then no-ops on a flagged cell.
    pub fn open(&mut self, pos: Pos) -> Result<OpenResult> {
        let pos = self.board.validate(pos)?;
        self.check_not_finished()?;
        self.ensure_mines(pos)?;

        let mut opened = Vec::new();
        let outcome = self.board.open_cell(pos, &mut opened);
        Ok(self.conclude(outcome, opened))
    }

    /// Chord around an opened numbered cell. Never places mines: before
    /// the first open nothing is opened, so there is nothing to chord on.
    pub fn chord(&mut self, pos: Pos) -> Result<OpenResult> {
        let pos = self.board.validate(pos)?;
        self.check_not_finished()?;

        let mut opened = Vec::new();
        let outcome = self.board.chord(pos, &mut opened);
        Ok(self.conclude(outcome, opened))
    }

    /// Toggle a flag. Allowed before the first open without starting the
    /// game; there are no mines yet at that point, so such flags earn no
    /// `correct_flags` credit.
    pub fn toggle_flag(&mut self, pos: Pos) -> Result<FlagResult> {
        let pos = self.board.validate(pos)?;
        self.check_not_finished()?;

        if self.board.toggle_flag(pos).has_update() {
            log::debug!(
                "flag toggled at {pos:?}, {} flags left",
                self.board.remaining_flags()
            );
        }
        let outcome = self.win_check();
        Ok(FlagResult {
            state: self.board.cell(pos).state(),
            remaining_flags: self.board.remaining_flags(),
            correct_flags: self.board.correct_flags(),
            outcome,
        })
    }

    fn ensure_mines(&mut self, excluded: Pos) -> Result<()> {
        if self.mines_placed {
            return Ok(());
        }

        let mines = self.placer.place_mines(&self.level, excluded);
        if mines.len() != usize::from(self.level.mines()) {
            log::warn!(
                "placer produced {} mines, level asks for {}",
                mines.len(),
                self.level.mines()
            );
        }
        self.board.place_mines(&mines)?;
        self.mines_placed = true;
        self.status = GameStatus::Running;
        log::debug!(
            "{} game started, first open at {excluded:?}",
            self.level.name()
        );
        Ok(())
    }

    /// Fold a board outcome into the session: an explosion loses the game
    /// and sweeps the board open, anything else runs the win check.
    fn conclude(&mut self, outcome: OpenOutcome, mut opened: Vec<OpenedCell>) -> OpenResult {
        let outcome = if outcome.is_explosion() {
            self.status = GameStatus::Lost;
            log::debug!("game lost after {}", self.clock);
            self.board.open_all(&mut opened);
            Outcome::Lost
        } else {
            self.win_check()
        };
        OpenResult { opened, outcome }
    }

    /// The win rule: every mine carries a correct flag. Checked after
    /// every flag toggle and every clear command.
    fn win_check(&mut self) -> Outcome {
        if matches!(self.status, GameStatus::Running)
            && self.board.correct_flags() == self.board.mine_count()
        {
            self.status = GameStatus::Won;
            log::debug!("game won after {}", self.clock);
            return Outcome::Won;
        }
        Outcome::Ongoing
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.status.is_terminal() {
            Err(GameError::GameOver)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::FixedPlacer;

    /// 4x4 game with two known mines; the level mine count matches.
    fn scripted_session(mines: Vec<Pos>) -> Session<FixedPlacer> {
        let level = Level::custom(4, 4, mines.len() as CellCount).unwrap();
        Session::with_placer(level, FixedPlacer::new(mines))
    }

    #[test]
    fn first_open_places_mines_and_starts_the_game() {
        let mut session = Session::seeded(Level::easy(), 42);
        assert!(session.status().is_initial());

        let result = session.open((4, 4)).unwrap();

        assert_eq!(session.status(), GameStatus::Running);
        assert_eq!(result.outcome, Outcome::Ongoing);
        assert!(!result.opened.is_empty());
        assert!(!session.board().cell((4, 4)).value().is_mine());
    }

    #[test]
    fn first_open_never_hits_a_mine_across_seeds() {
        for seed in 0..32 {
            let mut session = Session::seeded(Level::easy(), seed);
            let result = session.open((0, 0)).unwrap();
            assert_eq!(result.outcome, Outcome::Ongoing, "seed {seed}");
        }
    }

    #[test]
    fn seeded_games_replay_identically() {
        let mut first = Session::seeded(Level::easy(), 7);
        let mut second = Session::seeded(Level::easy(), 7);

        let a = first.open((4, 4)).unwrap();
        let b = second.open((4, 4)).unwrap();

        assert_eq!(a, b);
        assert_eq!(first.view(), second.view());
    }

    #[test]
    fn opening_a_mine_loses_and_sweeps_the_board() {
        let mut session = scripted_session(vec![(0, 0), (2, 2)]);
        session.open((3, 0)).unwrap();

        let result = session.open((2, 2)).unwrap();

        assert_eq!(result.outcome, Outcome::Lost);
        assert_eq!(session.status(), GameStatus::Lost);
        // the sweep leaves nothing hidden
        for row in 0..4 {
            for col in 0..4 {
                assert!(!session.board().cell((row, col)).state().is_hidden());
            }
        }
        assert_eq!(session.open((1, 1)), Err(GameError::GameOver));
        assert_eq!(session.toggle_flag((1, 1)), Err(GameError::GameOver));
        assert_eq!(session.chord((1, 1)), Err(GameError::GameOver));
    }

    #[test]
    fn losing_sweep_respects_flags() {
        let mut session = scripted_session(vec![(0, 0), (2, 2)]);
        session.open((3, 0)).unwrap();
        session.toggle_flag((0, 0)).unwrap();

        let result = session.open((2, 2)).unwrap();

        assert_eq!(result.outcome, Outcome::Lost);
        assert!(session.board().cell((0, 0)).state().is_flagged());
    }

    #[test]
    fn flagging_every_mine_wins() {
        let mut session = scripted_session(vec![(0, 0), (2, 2)]);
        session.open((3, 0)).unwrap();

        assert_eq!(session.toggle_flag((0, 0)).unwrap().outcome, Outcome::Ongoing);
        let result = session.toggle_flag((2, 2)).unwrap();

        assert_eq!(result.outcome, Outcome::Won);
        assert_eq!(result.correct_flags, 2);
        assert_eq!(session.status(), GameStatus::Won);
        assert_eq!(session.open((3, 3)), Err(GameError::GameOver));
    }

    #[test]
    fn easy_game_is_won_by_the_tenth_correct_flag_and_not_before() {
        let mines: Vec<Pos> = (0..9).map(|col| (0, col)).chain([(1, 0)]).collect();
        let mut session = Session::with_placer(Level::easy(), FixedPlacer::new(mines.clone()));
        session.open((8, 8)).unwrap();

        for &pos in &mines[..9] {
            let result = session.toggle_flag(pos).unwrap();
            assert_eq!(result.outcome, Outcome::Ongoing);
            assert_eq!(session.status(), GameStatus::Running);
        }

        let result = session.toggle_flag(mines[9]).unwrap();
        assert_eq!(result.outcome, Outcome::Won);
        assert_eq!(result.correct_flags, 10);
        assert_eq!(result.remaining_flags, 0);
        assert_eq!(session.status(), GameStatus::Won);
    }

    #[test]
    fn wrong_flags_do_not_win() {
        let mut session = scripted_session(vec![(0, 0), (2, 2)]);
        session.open((3, 0)).unwrap();

        session.toggle_flag((0, 0)).unwrap();
        let result = session.toggle_flag((1, 1)).unwrap();

        assert_eq!(result.outcome, Outcome::Ongoing);
        assert_eq!(result.correct_flags, 1);
        assert_eq!(session.status(), GameStatus::Running);
    }

    #[test]
    fn flag_cycling_on_one_mine_can_still_win() {
        // the reference's asymmetric bookkeeping: unflagging keeps the
        // credit, so cycling a single mine reaches the win threshold
        let mut session = scripted_session(vec![(0, 0), (2, 2)]);
        session.open((3, 0)).unwrap();

        session.toggle_flag((0, 0)).unwrap();
        session.toggle_flag((0, 0)).unwrap();
        let result = session.toggle_flag((0, 0)).unwrap();

        assert_eq!(result.correct_flags, 2);
        assert_eq!(result.outcome, Outcome::Won);
    }

    #[test]
    fn flags_before_the_first_open_earn_no_credit() {
        let mut session = scripted_session(vec![(0, 0), (2, 2)]);

        let result = session.toggle_flag((0, 0)).unwrap();

        assert!(session.status().is_initial());
        assert_eq!(result.state, CellState::Flagged);
        assert_eq!(result.correct_flags, 0);
        assert_eq!(result.remaining_flags, 1);
    }

    #[test]
    fn first_open_on_a_flagged_cell_still_starts_the_game() {
        let mut session = scripted_session(vec![(0, 0), (2, 2)]);
        session.toggle_flag((1, 1)).unwrap();

        let result = session.open((1, 1)).unwrap();

        assert_eq!(session.status(), GameStatus::Running);
        assert!(result.opened.is_empty());
        assert_eq!(result.outcome, Outcome::Ongoing);
        assert!(session.board().cell((1, 1)).state().is_flagged());
    }

    #[test]
    fn chord_before_the_first_open_is_a_no_op() {
        let mut session = scripted_session(vec![(0, 0), (2, 2)]);

        let result = session.chord((1, 1)).unwrap();

        assert!(session.status().is_initial());
        assert!(result.opened.is_empty());
        assert_eq!(result.outcome, Outcome::Ongoing);
    }

    #[test]
    fn chord_through_the_session_opens_neighbors() {
        // the third mine keeps the two flags short of a win
        let mut session = scripted_session(vec![(0, 0), (0, 2), (3, 3)]);
        session.open((1, 1)).unwrap();
        session.toggle_flag((0, 0)).unwrap();
        session.toggle_flag((0, 2)).unwrap();

        let result = session.chord((1, 1)).unwrap();

        assert_eq!(result.outcome, Outcome::Ongoing);
        assert!(session.board().cell((0, 1)).state().is_opened());
    }

    #[test]
    fn out_of_bounds_commands_are_rejected() {
        let mut session = scripted_session(vec![(0, 0), (2, 2)]);
        assert_eq!(session.open((4, 0)), Err(GameError::InvalidCoords));
        assert_eq!(session.toggle_flag((0, 4)), Err(GameError::InvalidCoords));
        assert_eq!(session.chord((9, 9)), Err(GameError::InvalidCoords));
        assert!(session.status().is_initial());
    }

    #[test]
    fn clock_ticks_only_while_running() {
        let mut session = scripted_session(vec![(0, 0), (2, 2)]);
        session.tick();
        assert_eq!(session.elapsed_secs(), 0);

        session.open((3, 0)).unwrap();
        session.tick();
        session.tick();
        assert_eq!(session.elapsed_secs(), 2);

        session.open((2, 2)).unwrap();
        session.tick();
        assert_eq!(session.elapsed_secs(), 2);
    }

    #[test]
    fn clock_formats_as_wall_time() {
        let mut session = scripted_session(vec![(0, 0), (2, 2)]);
        session.open((3, 0)).unwrap();
        for _ in 0..3723 {
            session.tick();
        }
        assert_eq!(session.time_string(), "01:02:03");
    }

    #[test]
    fn clock_hours_wrap_at_twenty_four() {
        let mut session = scripted_session(vec![(0, 0), (2, 2)]);
        session.open((3, 0)).unwrap();
        for _ in 0..(24 * 3600 + 61) {
            session.tick();
        }
        assert_eq!(session.time_string(), "00:01:01");
        assert_eq!(session.elapsed_secs(), 24 * 3600 + 61);
    }

    #[test]
    fn new_game_resets_the_session() {
        let mut session = scripted_session(vec![(0, 0), (2, 2)]);
        session.open((3, 0)).unwrap();
        session.open((2, 2)).unwrap();
        assert_eq!(session.status(), GameStatus::Lost);

        let view = session.new_game(Level::custom(4, 4, 2).unwrap());

        assert_eq!(view.status, GameStatus::NotStarted);
        assert_eq!(view.remaining_flags, 2);
        assert_eq!(view.correct_flags, 0);
        assert_eq!(view.elapsed_secs, 0);
        assert!(session.board().cell((2, 2)).state().is_hidden());

        // the retained placer scripts the same layout again
        let result = session.open((3, 0)).unwrap();
        assert_eq!(result.outcome, Outcome::Ongoing);
        assert_eq!(session.status(), GameStatus::Running);
    }

    #[test]
    fn view_mirrors_the_session_counters() {
        let mut session = scripted_session(vec![(0, 0), (2, 2)]);
        session.open((3, 0)).unwrap();
        session.toggle_flag((0, 0)).unwrap();
        session.tick();

        let view = session.view();

        assert_eq!(view.level, session.level());
        assert_eq!(view.mine_count, 2);
        assert_eq!(view.remaining_flags, 1);
        assert_eq!(view.correct_flags, 1);
        assert_eq!(view.status, GameStatus::Running);
        assert_eq!(view.elapsed_secs, 1);
    }
}
