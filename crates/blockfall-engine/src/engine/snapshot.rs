use crate::core::{FallingPiece, Field, PieceKind};

use super::{GameStats, SessionState};

/// Read-only view of a session after a transition.
///
/// The board is the static field with the active piece stamped on it, so a
/// renderer never sees the field mid-mutation and never has to composite the
/// falling piece itself. The piece is only drawn while the session is
/// running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    board: Field,
    next_piece: Option<PieceKind>,
    stats: GameStats,
    state: SessionState,
}

impl Snapshot {
    pub(crate) fn new(
        field: &Field,
        falling_piece: Option<&FallingPiece>,
        next_piece: Option<PieceKind>,
        stats: &GameStats,
        state: SessionState,
    ) -> Self {
        let board = match falling_piece {
            Some(piece) if state.is_running() => field.merged(piece),
            _ => field.clone(),
        };
        Self {
            board,
            next_piece,
            stats: stats.clone(),
            state,
        }
    }

    /// Field with the active piece overlaid.
    #[must_use]
    pub fn board(&self) -> &Field {
        &self.board
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
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.stats.level()
    }

    #[must_use]
    pub fn total_cleared_lines(&self) -> usize {
        self.stats.total_cleared_lines()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// True whenever gravity and commands are suspended: before the first
    /// start, while paused, and after game over.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        !self.state.is_running()
    }
}
