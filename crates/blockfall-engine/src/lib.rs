//! Rules engine and session state machine for a falling-block puzzle game.
//!
//! The crate is split in two layers:
//!
//! - [`core`] - Static piece catalog, the field grid and its geometry
//!   (collision, locking, line clears)
//! - [`engine`] - Session state machine, scoring, gravity scheduling and the
//!   [`Game`] driver that ties them to a clock
//!
//! Rendering and input mapping live outside this crate; they consume a
//! [`Snapshot`] and call the [`Game`] command methods.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("initial drop interval must be greater than zero")]
    ZeroDropInterval,
    #[display("poll divisor must be greater than zero")]
    ZeroPollDivisor,
    #[display("max level must be at least 1")]
    ZeroMaxLevel,
    #[display("lines per level must be greater than zero")]
    ZeroLinesPerLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseFieldError {
    #[display("field text has {rows} rows, more than the field height")]
    TooManyRows { rows: usize },
    #[display("row {row} has {width} cells, expected a full field row")]
    RowWidth { row: usize, width: usize },
    #[display("unknown cell character {cell:?}")]
    UnknownCell { cell: char },
}
