//! Key mapping from terminal events to engine input.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::types::Command;

/// Keys whose press and release are both reported to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeldKey {
    Left,
    Right,
    SoftDrop,
}

impl HeldKey {
    pub const ALL: [HeldKey; 3] = [HeldKey::Left, HeldKey::Right, HeldKey::SoftDrop];

    pub fn press(&self) -> Command {
        match self {
            HeldKey::Left => Command::MoveLeftDown,
            HeldKey::Right => Command::MoveRightDown,
            HeldKey::SoftDrop => Command::SoftDrop(true),
        }
    }

    pub fn release(&self) -> Command {
        match self {
            HeldKey::Left => Command::MoveLeftUp,
            HeldKey::Right => Command::MoveRightUp,
            HeldKey::SoftDrop => Command::SoftDrop(false),
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            HeldKey::Left => 0,
            HeldKey::Right => 1,
            HeldKey::SoftDrop => 2,
        }
    }
}

/// What a key does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyBinding {
    /// Tracked while down
    Held(HeldKey),
    /// Fires once per press
    Tap(Command),
    /// Pause or resume, depending on the current phase
    TogglePause,
    Restart,
}

/// Map a key code to its binding.
pub fn binding_for(code: KeyCode) -> Option<KeyBinding> {
    match code {
        // Movement
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(KeyBinding::Held(HeldKey::Left))
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(KeyBinding::Held(HeldKey::Right))
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(KeyBinding::Held(HeldKey::SoftDrop))
        }

        // Rotation
        KeyCode::Up
        | KeyCode::Char('k')
        | KeyCode::Char('K')
        | KeyCode::Char('w')
        | KeyCode::Char('W')
        | KeyCode::Char('x')
        | KeyCode::Char('X') => Some(KeyBinding::Tap(Command::RotateRight)),
        KeyCode::Char('z')
        | KeyCode::Char('Z')
        | KeyCode::Char('y')
        | KeyCode::Char('Y') => Some(KeyBinding::Tap(Command::RotateLeft)),

        // Actions
        KeyCode::Char(' ') => Some(KeyBinding::Tap(Command::HardDrop)),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(KeyBinding::Tap(Command::Hold)),
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => Some(KeyBinding::TogglePause),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(KeyBinding::Restart),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
