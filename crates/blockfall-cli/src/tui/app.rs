use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::Tui;

/// Application driven by [`Tui::run`].
pub trait App {
    /// Called once before the loop starts. Use this to set the tick interval.
    fn init(&mut self, tui: &mut Tui);

    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, resize, ...). The screen is always
    /// redrawn afterwards.
    fn handle_event(&mut self, tui: &mut Tui, event: Event);

    fn draw(&self, frame: &mut Frame);

    /// Advances time-driven state on each tick.
    ///
    /// Returns `true` if anything visible changed and a redraw is needed.
    fn update(&mut self, tui: &mut Tui) -> bool;
}
