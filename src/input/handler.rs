use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Direction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Requested heading for the next tick
    Turn(Direction),
    Restart,
    Quit,
    None,
}

/// Maps terminal keys to play commands
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Up => KeyAction::Turn(Direction::Up),
            KeyCode::Down => KeyAction::Turn(Direction::Down),
            KeyCode::Left => KeyAction::Turn(Direction::Left),
            KeyCode::Right => KeyAction::Turn(Direction::Right),

            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,

            // WASD
            KeyCode::Char(c) => Self::wasd(c).map_or(KeyAction::None, KeyAction::Turn),

            _ => KeyAction::None,
        }
    }

    fn wasd(c: char) -> Option<Direction> {
        match c.to_ascii_lowercase() {
            'w' => Some(Direction::Up),
            'a' => Some(Direction::Left),
            's' => Some(Direction::Down),
            'd' => Some(Direction::Right),
            _ => None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyAction {
        InputHandler::new().handle_key_event(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_turn_keys() {
        let cases = [
            (KeyCode::Up, Direction::Up),
            (KeyCode::Down, Direction::Down),
            (KeyCode::Left, Direction::Left),
            (KeyCode::Right, Direction::Right),
            (KeyCode::Char('w'), Direction::Up),
            (KeyCode::Char('a'), Direction::Left),
            (KeyCode::Char('s'), Direction::Down),
            (KeyCode::Char('d'), Direction::Right),
        ];

        for (code, direction) in cases {
            assert_eq!(press(code, KeyModifiers::NONE), KeyAction::Turn(direction));
        }
    }

    #[test]
    fn test_shifted_letters() {
        assert_eq!(
            press(KeyCode::Char('W'), KeyModifiers::SHIFT),
            KeyAction::Turn(Direction::Up)
        );
        assert_eq!(press(KeyCode::Char('Q'), KeyModifiers::SHIFT), KeyAction::Quit);
        assert_eq!(press(KeyCode::Char('R'), KeyModifiers::SHIFT), KeyAction::Restart);
    }

    #[test]
    fn test_quit_and_restart() {
        assert_eq!(press(KeyCode::Char('q'), KeyModifiers::NONE), KeyAction::Quit);
        assert_eq!(press(KeyCode::Esc, KeyModifiers::NONE), KeyAction::Quit);
        assert_eq!(press(KeyCode::Char('c'), KeyModifiers::CONTROL), KeyAction::Quit);
        assert_eq!(press(KeyCode::Char('r'), KeyModifiers::NONE), KeyAction::Restart);
    }

    #[test]
    fn test_modified_letter_still_turns() {
        assert_eq!(
            press(KeyCode::Char('d'), KeyModifiers::ALT),
            KeyAction::Turn(Direction::Right)
        );
    }

    #[test]
    fn test_unmapped_keys() {
        assert_eq!(press(KeyCode::Char('x'), KeyModifiers::NONE), KeyAction::None);
        assert_eq!(press(KeyCode::Char('c'), KeyModifiers::NONE), KeyAction::None);
        assert_eq!(press(KeyCode::Tab, KeyModifiers::NONE), KeyAction::None);
    }
}
