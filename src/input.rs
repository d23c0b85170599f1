use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::pomodoro::Action;

/// What a key press asks the host to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Timer(Action),
    Quit,
}

pub fn command_for_key(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }

    let command = match key.code {
        KeyCode::Esc | KeyCode::Char('q') => Command::Quit,
        KeyCode::Char('s') => Command::Timer(Action::Start),
        KeyCode::Char('x') => Command::Timer(Action::Stop),
        KeyCode::Char(' ') | KeyCode::Enter => Command::Timer(Action::Toggle),
        KeyCode::Char('r') => Command::Timer(Action::Reset),
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => Command::Timer(Action::VolumeUp),
        KeyCode::Char('-') | KeyCode::Down => Command::Timer(Action::VolumeDown),
        _ => return None,
    };
    Some(command)
}
