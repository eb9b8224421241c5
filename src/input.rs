//! Key bindings: arrows, Z/X and vim-style.

use chainblocks::{HorizontalDirection, Rotation, SessionInput};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    RotateCw,
    RotateCcw,
    QuickDrop,
    Pause,
    Restart,
    Quit,
    None,
}

impl Action {
    /// Actions that keep acting while the key is held.
    pub fn is_held(self) -> bool {
        matches!(
            self,
            Self::MoveLeft | Self::MoveRight | Self::RotateCw | Self::RotateCcw | Self::QuickDrop
        )
    }

    /// Fold this action into the intent handed to the session.
    pub fn apply_to(self, input: &mut SessionInput) {
        match self {
            Self::MoveLeft => input.horizontal = HorizontalDirection::Left,
            Self::MoveRight => input.horizontal = HorizontalDirection::Right,
            Self::RotateCw => input.rotation = Rotation::Clockwise,
            Self::RotateCcw => input.rotation = Rotation::AntiClockwise,
            Self::QuickDrop => input.quick_drop = true,
            Self::Pause | Self::Restart | Self::Quit | Self::None => {}
        }
    }
}

/// Map key event to game action.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Action::Quit;
    }
    if !no_mod {
        return Action::None;
    }
    match code {
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('p' | 'P') => Action::Pause,
        KeyCode::Char('r' | 'R') => Action::Restart,
        KeyCode::Left | KeyCode::Char('z' | 'Z' | 'h') => Action::MoveLeft,
        KeyCode::Right | KeyCode::Char('x' | 'X' | 'l') => Action::MoveRight,
        KeyCode::Up | KeyCode::Char('k' | 'i') => Action::RotateCw,
        KeyCode::Char('u') => Action::RotateCcw,
        KeyCode::Down | KeyCode::Char('j' | ' ') => Action::QuickDrop,
        _ => Action::None,
    }
}
