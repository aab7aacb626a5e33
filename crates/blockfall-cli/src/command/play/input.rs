use blockfall_engine::Direction;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Player intent decoded from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    Start,
    Pause,
    Reset,
    Quit,
    Move(Direction),
    Rotate,
}

/// Maps a key press to a command.
///
/// Arrows move (`↑` rotates), `s` starts, `p` pauses or resumes, `r`
/// resets, `q`/`Esc`/`Ctrl-C` quit. Key releases and unmapped keys yield
/// `None`.
pub(crate) fn command_for_key(key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let command = match key.code {
        KeyCode::Left => Command::Move(Direction::Left),
        KeyCode::Right => Command::Move(Direction::Right),
        KeyCode::Down => Command::Move(Direction::Down),
        KeyCode::Up => Command::Rotate,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Command::Quit,
        KeyCode::Char('s' | 'S') => Command::Start,
        KeyCode::Char('p' | 'P') => Command::Pause,
        KeyCode::Char('r' | 'R') => Command::Reset,
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Command::Quit,
        _ => return None,
    };
    Some(command)
}
