use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Action, Direction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Absolute heading requested by the player
    Steer(Direction),
    Restart,
    Quit,
    /// Any other key; starts the game from the title screen
    Other,
}

/// Keyboard side of human play
///
/// Players press absolute directions while the engine only takes relative
/// turns, so this is also where a reversal request gets dropped.
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Steer(Direction::Up),
            KeyCode::Down => KeyAction::Steer(Direction::Down),
            KeyCode::Left => KeyAction::Steer(Direction::Left),
            KeyCode::Right => KeyAction::Steer(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Steer(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Steer(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Steer(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Steer(Direction::Right),

            // Controls
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,

            _ => KeyAction::Other,
        }
    }

    /// Relative action for a requested heading, `None` for a straight reversal
    pub fn steer(&self, current: Direction, requested: Direction) -> Option<Action> {
        let action = Action::toward(current, requested);
        if action.is_none() {
            tracing::trace!(?current, ?requested, "ignoring reversal request");
        }
        action
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
