use thiserror::Error;

use super::state::Point;

/// Absolute heading of the snake
///
/// Discriminants are the integer action codes exchanged with a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

/// An action code outside `0..=3`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid action code {0}, expected 0 (up), 1 (right), 2 (down) or 3 (left)")]
pub struct ActionError(pub usize);

impl Direction {
    /// All headings in action-code order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Number of discrete actions
    pub const COUNT: usize = 4;

    /// Map an action code to a heading
    pub fn from_code(code: usize) -> Result<Self, ActionError> {
        Self::ALL.get(code).copied().ok_or(ActionError(code))
    }

    /// Action code of this heading
    pub fn code(self) -> usize {
        self as usize
    }

    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    /// Unit vector for this heading, y grows downwards
    pub fn delta(&self) -> Point {
        match self {
            Direction::Up => Point::new(0, -1),
            Direction::Right => Point::new(1, 0),
            Direction::Down => Point::new(0, 1),
            Direction::Left => Point::new(-1, 0),
        }
    }
}

impl TryFrom<usize> for Direction {
    type Error = ActionError;

    fn try_from(code: usize) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_codes() {
        assert_eq!(Direction::from_code(0), Ok(Direction::Up));
        assert_eq!(Direction::from_code(1), Ok(Direction::Right));
        assert_eq!(Direction::from_code(2), Ok(Direction::Down));
        assert_eq!(Direction::from_code(3), Ok(Direction::Left));

        for direction in Direction::ALL {
            assert_eq!(Direction::from_code(direction.code()), Ok(direction));
        }
    }

    #[test]
    fn test_invalid_action_code() {
        assert_eq!(Direction::from_code(4), Err(ActionError(4)));
        assert_eq!(Direction::try_from(999), Err(ActionError(999)));
        assert!(ActionError(7).to_string().contains('7'));
    }

    #[test]
    fn test_opposite_directions() {
        assert!(Direction::Up.is_opposite(Direction::Down));
        assert!(Direction::Down.is_opposite(Direction::Up));
        assert!(Direction::Left.is_opposite(Direction::Right));
        assert!(Direction::Right.is_opposite(Direction::Left));

        assert!(!Direction::Up.is_opposite(Direction::Left));
        assert!(!Direction::Up.is_opposite(Direction::Right));
        assert!(!Direction::Up.is_opposite(Direction::Up));
    }

    #[test]
    fn test_direction_delta() {
        assert_eq!(Direction::Up.delta(), Point::new(0, -1));
        assert_eq!(Direction::Down.delta(), Point::new(0, 1));
        assert_eq!(Direction::Left.delta(), Point::new(-1, 0));
        assert_eq!(Direction::Right.delta(), Point::new(1, 0));
    }
}
