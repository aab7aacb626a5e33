//! Minimal terminal runtime: an event loop multiplexing gravity ticks,
//! redraws and crossterm input for a single [`App`].

mod app;
mod event;
mod event_loop;
mod runner;

pub use self::{app::App, runner::Tui};
