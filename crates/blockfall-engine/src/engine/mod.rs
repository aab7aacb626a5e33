//! Session logic, scoring and gravity timing.
//!
//! This module builds the playable game on top of [`crate::core`]:
//!
//! - [`Session`] - State machine owning the field, the active and next piece,
//!   statistics and the idle/running/paused/over lifecycle
//! - [`GameStats`] - Score, level, line and piece counters
//! - [`Scheduler`] - Gravity timer deriving drop and poll intervals from the
//!   level
//! - [`Game`] - Front-end facing driver combining a session, a scheduler and
//!   a [`Clock`]
//! - [`Snapshot`] - Read-only view handed to renderers
//! - [`PieceSource`] - Injectable randomness for spawns
//!
//! # Game Flow
//!
//! 1. Create a [`Game`] from a [`GameConfig`], a piece source and a clock
//! 2. [`Game::start`] spawns the first piece and arms gravity
//! 3. The event loop waits up to [`Game::poll_interval`] for input, forwards
//!    commands, then calls [`Game::poll`]
//! 4. Pieces that cannot descend lock, full rows clear, and the next piece
//!    spawns
//! 5. A blocked spawn ends the game; [`Game::reset`] starts over

pub use self::{
    clock::*, config::*, game::*, game_stats::*, piece_source::*, scheduler::*, session::*,
    snapshot::*,
};

mod clock;
mod config;
mod game;
mod game_stats;
mod piece_source;
mod scheduler;
mod session;
mod snapshot;
