use std::time::Duration;

use crate::tui::{App, event::TuiEvent, event_loop::EventLoop};

/// Drives a single [`App`] and redraws only when the frame is stale.
///
/// The screen is repainted once at startup, after every terminal event and
/// after any tick whose [`App::update`] reports a visible change. A quiet
/// tick costs no draw, so the app can tick as often as gravity needs without
/// flooding the terminal.
#[derive(Default, Debug)]
pub struct Tui {
    events: EventLoop,
}

impl Tui {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how often [`App::update`] runs; `None` stops ticking, leaving the
    /// loop blocked on terminal input.
    ///
    /// Apps call this from `init` and again whenever their pace changes.
    pub fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.events.set_tick_interval(interval);
    }

    /// Runs `app` on the alternate screen until it asks to exit.
    pub fn run<A>(mut self, app: &mut A) -> anyhow::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                let event = self.events.next()?;
                if self.dispatch(app, event) {
                    terminal.draw(|f| app.draw(f))?;
                }
            }
            Ok(())
        })
    }

    /// Hands `event` to `app`, marking the frame stale where needed.
    ///
    /// Returns `true` when the caller must draw now.
    fn dispatch<A>(&mut self, app: &mut A, event: TuiEvent) -> bool
    where
        A: App,
    {
        match event {
            TuiEvent::Render => return true,
            TuiEvent::Tick => {
                if app.update(self) {
                    self.events.mark_dirty();
                }
            }
            TuiEvent::Crossterm(event) => {
                app.handle_event(self, event);
                self.events.mark_dirty();
            }
        }
        false
    }
}
