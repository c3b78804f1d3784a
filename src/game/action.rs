use std::str::FromStr;

use super::error::GameError;

/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Headings in clockwise order, starting from `Right`
    pub const CLOCKWISE: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    /// Index of this direction in [`Direction::CLOCKWISE`]
    pub fn clockwise_index(self) -> usize {
        match self {
            Direction::Right => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Up => 3,
        }
    }

    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        self.opposite() == other
    }

    pub fn opposite(self) -> Direction {
        Self::CLOCKWISE[(self.clockwise_index() + 2) % 4]
    }

    /// Heading after applying a relative action
    pub fn turned(self, action: Action) -> Direction {
        let idx = self.clockwise_index();
        match action {
            Action::Continue => self,
            Action::TurnRight => Self::CLOCKWISE[(idx + 1) % 4],
            // +3 is -1 mod 4 without going through a signed index
            Action::TurnLeft => Self::CLOCKWISE[(idx + 3) % 4],
        }
    }

    /// Returns the unit delta (dx, dy) for moving in this direction; y grows downward
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Relative control signal accepted by the engine each frame
///
/// There is no "turn around" action, so a single step can never reverse the
/// snake onto its own neck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Keep the current heading
    Continue,
    /// Turn clockwise
    TurnRight,
    /// Turn counter-clockwise
    TurnLeft,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Continue, Action::TurnRight, Action::TurnLeft];

    /// Discrete index used by automated controllers (0 = continue, 1 = right, 2 = left)
    pub fn index(self) -> usize {
        match self {
            Action::Continue => 0,
            Action::TurnRight => 1,
            Action::TurnLeft => 2,
        }
    }

    /// One-hot `[straight, right, left]` encoding
    pub fn one_hot(self) -> [u8; 3] {
        let mut encoded = [0; 3];
        encoded[self.index()] = 1;
        encoded
    }

    /// Translate an absolute heading request into a relative action.
    ///
    /// Returns `None` when `desired` is the exact reverse of `current`; callers
    /// offering absolute controls must drop such requests.
    pub fn toward(current: Direction, desired: Direction) -> Option<Action> {
        Action::ALL
            .into_iter()
            .find(|action| current.turned(*action) == desired)
    }
}

impl TryFrom<usize> for Action {
    type Error = GameError;

    fn try_from(idx: usize) -> Result<Self, Self::Error> {
        Action::ALL.get(idx).copied().ok_or_else(|| {
            GameError::InvalidAction(format!("action index {idx} is not 0, 1 or 2"))
        })
    }
}

impl TryFrom<[u8; 3]> for Action {
    type Error = GameError;

    fn try_from(encoded: [u8; 3]) -> Result<Self, Self::Error> {
        match encoded {
            [1, 0, 0] => Ok(Action::Continue),
            [0, 1, 0] => Ok(Action::TurnRight),
            [0, 0, 1] => Ok(Action::TurnLeft),
            other => Err(GameError::InvalidAction(format!(
                "{other:?} is not a one-hot [straight, right, left] vector"
            ))),
        }
    }
}

impl FromStr for Action {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continue" | "straight" => Ok(Action::Continue),
            "right" | "turn_right" => Ok(Action::TurnRight),
            "left" | "turn_left" => Ok(Action::TurnLeft),
            _ => Err(GameError::InvalidAction(format!("unknown action name {s:?}"))),
        }
    }
}
