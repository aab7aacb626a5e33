use arrayvec::ArrayVec;
use tracing::{debug, info, trace};

use crate::core::{Direction, FIELD_HEIGHT, FallingPiece, Field, PieceKind};

use super::{GameConfig, GameStats, PieceSource, ScoreUpdate, Snapshot};

/// Lifecycle of a session.
///
/// ```text
///          start/reset (from any state)
/// Idle ───────────────────────────────► Running ◄──── pause ────► Paused
///                                          │
///                                          │ spawn collides
///                                          ▼
///                                       GameOver
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum SessionState {
    /// Before the first start.
    #[default]
    Idle,
    Running,
    Paused,
    /// Terminal until the next start or reset.
    GameOver,
}

/// Result of a command or gravity tick.
///
/// Rejections are not errors: a rejected command leaves the session exactly
/// as it was.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum Transition {
    /// The session was not running or had no active piece.
    Ignored,
    /// The move or rotation would collide.
    Rejected,
    /// The active piece moved or rotated.
    Moved,
    /// A failed descent locked the active piece.
    Locked(LockEvent),
}

/// What happened when a piece locked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockEvent {
    /// The piece as it was merged into the field.
    pub piece: FallingPiece,
    /// Indices (top to bottom, before compaction) of the rows removed.
    pub cleared_rows: ArrayVec<usize, FIELD_HEIGHT>,
    pub score_gained: usize,
    pub leveled_up: bool,
    /// The following spawn collided and the session is over.
    pub topped_out: bool,
}

impl LockEvent {
    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.cleared_rows.len()
    }
}

/// Session state machine: field, active piece, next piece, statistics and
/// the running/paused/over lifecycle.
///
/// A session knows nothing about time; gravity arrives through
/// [`Session::tick`], driven by [`Game`](crate::Game) and its scheduler.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Direction, PieceKind, PieceSequence, Session, Transition};
///
/// let mut session = Session::new(PieceSequence::new([PieceKind::O]));
/// session.start();
///
/// assert_eq!(session.try_move(Direction::Left), Transition::Moved);
/// while !session.tick().is_locked() {}
///
/// assert_eq!(session.stats().completed_pieces(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Session<S> {
    source: S,
    field: Field,
    falling_piece: Option<FallingPiece>,
    next_piece: Option<PieceKind>,
    stats: GameStats,
    state: SessionState,
}

impl<S> Session<S> {
    #[must_use]
    pub fn field(&self) -> &Field {
        &self.field
    }

    #[must_use]
    pub fn falling_piece(&self) -> Option<&FallingPiece> {
        self.falling_piece.as_ref()
    }

    #[must_use]
    pub fn next_piece(&self) -> Option<PieceKind> {
        self.next_piece
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(
            &self.field,
            self.falling_piece.as_ref(),
            self.next_piece,
            &self.stats,
            self.state,
        )
    }

    fn active_piece(&self) -> Option<FallingPiece> {
        if self.state.is_running() {
            self.falling_piece
        } else {
            None
        }
    }
}

impl<S> Session<S>
where
    S: PieceSource,
{
    /// Creates an idle session with the default rules.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_config(&GameConfig::default(), source)
    }

    #[must_use]
    pub fn with_config(config: &GameConfig, source: S) -> Self {
        Self {
            source,
            field: Field::EMPTY,
            falling_piece: None,
            next_piece: None,
            stats: GameStats::from_config(config),
            state: SessionState::Idle,
        }
    }

    /// Starts a fresh game from any state.
    ///
    /// Empties the field, zeroes the statistics, pre-rolls the next piece and
    /// spawns it.
    pub fn start(&mut self) {
        self.field = Field::EMPTY;
        self.stats.reset();
        self.falling_piece = None;
        self.next_piece = Some(self.source.next_piece());
        self.state = SessionState::Running;
        info!("session started");
        self.spawn();
    }

    /// Same as [`Self::start`]; fully reinitializes regardless of state.
    pub fn reset(&mut self) {
        info!(state = ?self.state, "session reset");
        self.start();
    }

    /// Switches between running and paused. Ignored before the first start
    /// and after game over.
    ///
    /// Pausing never begins play: an idle session stays idle until
    /// [`Self::start`] is called.
    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            SessionState::Running => SessionState::Paused,
            SessionState::Paused => SessionState::Running,
            SessionState::Idle | SessionState::GameOver => {
                trace!(state = ?self.state, "pause ignored");
                return;
            }
        };
        debug!(state = ?self.state, "pause toggled");
        if self.state.is_running() && self.falling_piece.is_none() {
            self.spawn();
        }
    }

    /// Shifts the active piece by one cell.
    ///
    /// A blocked left/right move is rejected. A blocked downward move locks
    /// the piece at its current position, clears lines, updates statistics
    /// and spawns the next piece.
    pub fn try_move(&mut self, direction: Direction) -> Transition {
        let Some(piece) = self.active_piece() else {
            return Transition::Ignored;
        };
        let candidate = piece.moved(direction);
        if !self.field.is_colliding(&candidate) {
            self.falling_piece = Some(candidate);
            return Transition::Moved;
        }
        match direction {
            Direction::Down => Transition::Locked(self.lock(piece)),
            Direction::Left | Direction::Right => Transition::Rejected,
        }
    }

    /// Rotates the active piece to its next rotation state, with wall kicks.
    ///
    /// See [`FallingPiece::rotated_with_kicks`] for the offsets tried.
    pub fn try_rotate(&mut self) -> Transition {
        let Some(piece) = self.active_piece() else {
            return Transition::Ignored;
        };
        match piece.rotated_with_kicks(&self.field) {
            Some(rotated) => {
                self.falling_piece = Some(rotated);
                Transition::Moved
            }
            None => Transition::Rejected,
        }
    }

    /// Gravity: one forced descent, locking the piece if it cannot fall.
    pub fn tick(&mut self) -> Transition {
        trace!("gravity tick");
        self.try_move(Direction::Down)
    }

    /// Installs the pending next piece at the spawn position.
    ///
    /// Returns `false` and ends the game if the spawn position is blocked; the
    /// field and the pending piece are left as they were.
    fn spawn(&mut self) -> bool {
        let kind = self
            .next_piece
            .take()
            .unwrap_or_else(|| self.source.next_piece());
        let piece = FallingPiece::spawn(kind);
        if self.field.is_colliding(&piece) {
            self.next_piece = Some(kind);
            self.falling_piece = None;
            self.state = SessionState::GameOver;
            info!(
                score = self.stats.score(),
                level = self.stats.level(),
                lines = self.stats.total_cleared_lines(),
                pieces = self.stats.completed_pieces(),
                "game over"
            );
            return false;
        }
        self.falling_piece = Some(piece);
        self.next_piece = Some(self.source.next_piece());
        debug!(?kind, next = ?self.next_piece, "piece spawned");
        true
    }

    fn lock(&mut self, piece: FallingPiece) -> LockEvent {
        self.field.fill_piece(&piece);
        let cleared_rows = self.field.full_rows();
        let cleared_lines = self.field.clear_full_lines();
        debug_assert_eq!(cleared_lines, cleared_rows.len());
        let ScoreUpdate {
            score_gained,
            leveled_up,
        } = self.stats.complete_piece_drop(cleared_lines);
        self.falling_piece = None;

        debug!(
            kind = ?piece.kind(),
            position = ?piece.position(),
            rows = ?cleared_rows.as_slice(),
            score_gained,
            score = self.stats.score(),
            "piece locked"
        );
        if leveled_up {
            info!(
                level = self.stats.level(),
                lines = self.stats.total_cleared_lines(),
                "level up"
            );
        }

        let topped_out = !self.spawn();
        LockEvent {
            piece,
            cleared_rows,
            score_gained,
            leveled_up,
            topped_out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{Cell, FIELD_WIDTH, Position},
        engine::PieceSequence,
    };

    fn running(kinds: &[PieceKind]) -> Session<PieceSequence> {
        let mut session = Session::new(PieceSequence::new(kinds.iter().copied()));
        session.start();
        session
    }

    fn position(session: &Session<PieceSequence>) -> Position {
        session.falling_piece().unwrap().position()
    }

    fn drop_to_lock(session: &mut Session<PieceSequence>) -> LockEvent {
        loop {
            if let Transition::Locked(event) = session.tick() {
                return event;
            }
        }
    }

    #[test]
    fn test_idle_session_ignores_commands() {
        let mut session = Session::new(PieceSequence::new([PieceKind::T]));
        assert!(session.state().is_idle());
        assert_eq!(session.try_move(Direction::Down), Transition::Ignored);
        assert_eq!(session.try_rotate(), Transition::Ignored);
        assert_eq!(session.tick(), Transition::Ignored);
        session.toggle_pause();
        assert!(session.state().is_idle());
        assert!(session.falling_piece().is_none());
    }

    #[test]
    fn test_pause_does_not_start_idle_session() {
        let mut session = Session::new(PieceSequence::new([PieceKind::T]));
        session.toggle_pause();
        session.toggle_pause();
        assert!(session.state().is_idle());
        assert!(session.next_piece().is_none());
        assert_eq!(session.tick(), Transition::Ignored);

        session.start();
        assert!(session.state().is_running());
        assert_eq!(session.falling_piece().unwrap().kind(), PieceKind::T);
    }

    #[test]
    fn test_start_spawns_and_prerolls() {
        let session = running(&[PieceKind::T, PieceKind::S, PieceKind::Z]);
        assert!(session.state().is_running());
        let piece = session.falling_piece().unwrap();
        assert_eq!(piece.kind(), PieceKind::T);
        assert_eq!(piece.position(), Position::new(4, 0));
        assert_eq!(piece.rotation(), 0);
        assert_eq!(session.next_piece(), Some(PieceKind::S));
        assert!(session.field().is_empty());
        assert_eq!(session.stats().level(), 1);
    }

    #[test]
    fn test_horizontal_moves_and_wall_rejection() {
        let mut session = running(&[PieceKind::O]);
        for _ in 0..4 {
            assert_eq!(session.try_move(Direction::Left), Transition::Moved);
        }
        assert_eq!(position(&session), Position::new(0, 0));
        assert_eq!(session.try_move(Direction::Left), Transition::Rejected);
        assert_eq!(position(&session), Position::new(0, 0));
        assert!(session.field().is_empty());

        for _ in 0..8 {
            assert_eq!(session.try_move(Direction::Right), Transition::Moved);
        }
        assert_eq!(session.try_move(Direction::Right), Transition::Rejected);
        assert_eq!(position(&session), Position::new(8, 0));
    }

    #[test]
    fn test_blocked_down_move_locks() {
        let mut session = running(&[PieceKind::O, PieceKind::T]);
        for _ in 0..18 {
            assert_eq!(session.try_move(Direction::Down), Transition::Moved);
        }
        let Transition::Locked(event) = session.try_move(Direction::Down) else {
            panic!("expected lock");
        };
        assert_eq!(event.piece.position(), Position::new(4, 18));
        assert_eq!(event.cleared_lines(), 0);
        assert!(!event.topped_out);
        assert_eq!(session.field().cell(4, 19), Some(Cell::Piece(PieceKind::O)));
        assert_eq!(session.falling_piece().unwrap().kind(), PieceKind::T);
        assert_eq!(session.next_piece(), Some(PieceKind::O));
        assert_eq!(session.stats().completed_pieces(), 1);
        assert_eq!(session.stats().score(), 0);
    }

    #[test]
    fn test_rotate_commits_rotation() {
        let mut session = running(&[PieceKind::T]);
        assert_eq!(session.try_rotate(), Transition::Moved);
        let piece = session.falling_piece().unwrap();
        assert_eq!(piece.rotation(), 1);
        assert_eq!(piece.position(), Position::new(4, 0));
    }

    #[test]
    fn test_rotate_kicks_off_left_wall() {
        let mut session = running(&[PieceKind::T]);
        session.try_rotate();
        // Rotation 1 occupies columns 1 and 2 of the box; push it flush left.
        for _ in 0..5 {
            assert_eq!(session.try_move(Direction::Left), Transition::Moved);
        }
        assert_eq!(session.try_move(Direction::Left), Transition::Rejected);
        assert_eq!(position(&session), Position::new(-1, 0));

        assert_eq!(session.try_rotate(), Transition::Moved);
        let piece = session.falling_piece().unwrap();
        assert_eq!(piece.rotation(), 2);
        assert_eq!(piece.position(), Position::new(0, 0));
    }

    #[test]
    fn test_rotate_kicks_bar_one_off_right_wall() {
        let mut session = running(&[PieceKind::I]);
        session.try_rotate();
        for _ in 0..4 {
            assert_eq!(session.try_move(Direction::Right), Transition::Moved);
        }
        assert_eq!(position(&session), Position::new(7, 0));

        assert_eq!(session.try_rotate(), Transition::Moved);
        let piece = session.falling_piece().unwrap();
        assert_eq!(piece.rotation(), 2);
        assert_eq!(piece.position(), Position::new(6, 0));
    }

    #[test]
    fn test_rotate_kicks_bar_two_off_right_wall() {
        let mut session = running(&[PieceKind::I]);
        session.try_rotate();
        for _ in 0..5 {
            assert_eq!(session.try_move(Direction::Right), Transition::Moved);
        }
        assert_eq!(session.try_move(Direction::Right), Transition::Rejected);
        assert_eq!(position(&session), Position::new(8, 0));

        assert_eq!(session.try_rotate(), Transition::Moved);
        let piece = session.falling_piece().unwrap();
        assert_eq!(piece.rotation(), 2);
        assert_eq!(piece.position(), Position::new(6, 0));
        let cells: Vec<_> = piece.occupied_positions().collect();
        assert_eq!(cells, vec![(6, 2), (7, 2), (8, 2), (9, 2)]);
    }

    #[test]
    fn test_rotate_prefers_left_kick() {
        let mut session = running(&[PieceKind::T]);
        // Blocks only the unshifted rotation; both one-cell kicks fit.
        session.field.set_cell(5, 2, Cell::Occupied);

        assert_eq!(session.try_rotate(), Transition::Moved);
        let piece = session.falling_piece().unwrap();
        assert_eq!(piece.rotation(), 1);
        assert_eq!(piece.position(), Position::new(3, 0));
    }

    #[test]
    fn test_rotate_prefers_two_left_over_two_right() {
        let mut session = running(&[PieceKind::T]);
        // Blocks the offsets 0, -1 and +1; both two-cell kicks fit.
        for x in 4..=6 {
            session.field.set_cell(x, 2, Cell::Occupied);
        }

        assert_eq!(session.try_rotate(), Transition::Moved);
        let piece = session.falling_piece().unwrap();
        assert_eq!(piece.rotation(), 1);
        assert_eq!(piece.position(), Position::new(2, 0));
    }

    #[test]
    fn test_rotate_rejected_leaves_piece() {
        let mut session = running(&[PieceKind::T]);
        for x in 0..FIELD_WIDTH {
            session.field.set_cell(x, 2, Cell::Occupied);
        }
        let field = session.field().clone();
        let before = session.falling_piece().copied();

        assert_eq!(session.try_rotate(), Transition::Rejected);
        assert_eq!(session.falling_piece().copied(), before);
        assert_eq!(session.falling_piece().unwrap().rotation(), 0);
        assert_eq!(session.field(), &field);
        assert!(session.state().is_running());
    }

    #[test]
    fn test_pause_freezes_session() {
        let mut session = running(&[PieceKind::L]);
        session.toggle_pause();
        assert!(session.state().is_paused());
        let before = session.falling_piece().copied();
        assert_eq!(session.tick(), Transition::Ignored);
        assert_eq!(session.try_move(Direction::Left), Transition::Ignored);
        assert_eq!(session.try_rotate(), Transition::Ignored);
        assert_eq!(session.falling_piece().copied(), before);

        session.toggle_pause();
        assert!(session.state().is_running());
        assert_eq!(session.falling_piece().copied(), before);
    }

    #[test]
    fn test_game_over_when_spawn_blocked() {
        let mut session = running(&[PieceKind::O]);
        // Ten squares stack straight down columns 4-5 and fill all 20 rows.
        for i in 0..10 {
            let event = drop_to_lock(&mut session);
            assert_eq!(event.topped_out, i == 9);
        }
        assert!(session.state().is_game_over());
        assert!(session.falling_piece().is_none());
        assert_eq!(session.next_piece(), Some(PieceKind::O));

        let mut expected = Field::EMPTY;
        for y in 0..FIELD_HEIGHT {
            expected.set_cell(4, y, Cell::Piece(PieceKind::O));
            expected.set_cell(5, y, Cell::Piece(PieceKind::O));
        }
        assert_eq!(session.field(), &expected);

        // Terminal: commands and pause are ignored.
        assert_eq!(session.tick(), Transition::Ignored);
        session.toggle_pause();
        assert!(session.state().is_game_over());
        assert!(session.snapshot().is_paused());
    }

    #[test]
    fn test_start_after_game_over_reinitializes() {
        let mut session = running(&[PieceKind::O]);
        while !session.state().is_game_over() {
            drop_to_lock(&mut session);
        }
        session.start();
        assert!(session.state().is_running());
        assert!(session.field().is_empty());
        assert_eq!(session.stats().completed_pieces(), 0);
        assert!(session.falling_piece().is_some());
    }

    #[test]
    fn test_reset_while_paused() {
        let mut session = running(&[PieceKind::I]);
        drop_to_lock(&mut session);
        session.toggle_pause();
        session.reset();
        assert!(session.state().is_running());
        assert!(session.field().is_empty());
        assert_eq!(session.stats(), &GameStats::new());
    }

    #[test]
    fn test_snapshot_overlays_piece_only_while_running() {
        let mut session = running(&[PieceKind::I, PieceKind::J]);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.board().cell(3, 1), Some(Cell::Piece(PieceKind::I)));
        assert_eq!(snapshot.next_piece(), Some(PieceKind::J));
        assert!(!snapshot.is_paused());
        assert!(session.field().is_empty());

        session.toggle_pause();
        let snapshot = session.snapshot();
        assert!(snapshot.board().is_empty());
        assert!(snapshot.is_paused());
        assert!(!snapshot.is_game_over());
    }
}
