use blockfall_engine::{Clock, Game, PieceSource, Snapshot, Transition};
use crossterm::event::Event;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};
use tracing::{debug, info};

use crate::{
    command::play::input::{self, Command},
    tui::{App, Tui},
    ui::widgets::{KeyBinding, KeyBindingDisplay, SessionDisplay},
};

const KEY_BINDINGS: &[KeyBinding] = &[
    (&["←", "→", "↓"], "Move"),
    (&["↑"], "Rotate"),
    (&["S"], "Start"),
    (&["P"], "Pause"),
    (&["R"], "Reset"),
    (&["Q", "Esc"], "Quit"),
];

/// Interactive game: forwards keys to the [`Game`] and lets the event loop
/// tick at the game's poll interval.
#[derive(Debug)]
pub struct PlayApp<S, C> {
    game: Game<S, C>,
    snapshot: Snapshot,
    is_exiting: bool,
}

impl<S, C> PlayApp<S, C>
where
    S: PieceSource,
    C: Clock,
{
    pub fn new(game: Game<S, C>) -> Self {
        let snapshot = game.snapshot();
        Self {
            game,
            snapshot,
            is_exiting: false,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Start => self.game.start(),
            Command::Pause => self.game.pause(),
            Command::Reset => self.game.reset(),
            Command::Quit => {
                info!(score = self.snapshot.score(), "quit requested");
                self.is_exiting = true;
            }
            Command::Move(direction) => _ = self.game.move_piece(direction),
            Command::Rotate => _ = self.game.rotate(),
        }
        debug!(?command, state = ?self.game.snapshot().state(), "command applied");
    }

    fn refresh(&mut self, tui: &mut Tui) {
        self.snapshot = self.game.snapshot();
        tui.set_tick_interval(self.game.poll_interval());
    }
}

impl<S, C> App for PlayApp<S, C>
where
    S: PieceSource,
    C: Clock,
{
    fn init(&mut self, tui: &mut Tui) {
        self.refresh(tui);
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, tui: &mut Tui, event: Event) {
        if let Some(command) = event.as_key_event().and_then(input::command_for_key) {
            self.apply(command);
            self.refresh(tui);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(24), Constraint::Length(1)]).areas(frame.area());
        frame.render_widget(SessionDisplay::new(&self.snapshot), main_area);
        frame.render_widget(KeyBindingDisplay::new(KEY_BINDINGS), help_area);
    }

    fn update(&mut self, tui: &mut Tui) -> bool {
        if self.game.poll() == Transition::Ignored {
            return false;
        }
        self.refresh(tui);
        true
    }
}
