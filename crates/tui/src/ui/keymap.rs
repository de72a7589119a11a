use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    Cancel,
    NextField,
    Submit,
    Backspace,
    Up,
    Down,
    /// Flip the login screen between sign-in and registration.
    ToggleMode,
    Input(char),
    None,
}

/// Plain characters always come through as `Input` so text fields can hold
/// any letter; section shortcuts are resolved by the app, not here.
pub fn map_key(key: KeyEvent) -> AppAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => AppAction::Quit,
            KeyCode::Char('r') => AppAction::ToggleMode,
            _ => AppAction::None,
        };
    }

    match key.code {
        KeyCode::Esc => AppAction::Cancel,
        KeyCode::Tab => AppAction::NextField,
        KeyCode::Enter => AppAction::Submit,
        KeyCode::Backspace => AppAction::Backspace,
        KeyCode::Up => AppAction::Up,
        KeyCode::Down => AppAction::Down,
        KeyCode::Char(ch) => AppAction::Input(ch),
        _ => AppAction::None,
    }
}
