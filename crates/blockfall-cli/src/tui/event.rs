use crossterm::event::Event as CrosstermEvent;

/// Events produced by the event loop.
#[derive(Debug, Clone, derive_more::IsVariant, derive_more::From)]
pub(super) enum TuiEvent {
    /// The tick interval elapsed.
    Tick,
    /// The screen is out of date.
    Render,
    /// Key input, resize and other terminal events.
    Crossterm(CrosstermEvent),
}
