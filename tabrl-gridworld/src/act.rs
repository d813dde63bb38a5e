//! Actions of [`GridWorld`](crate::GridWorld).
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// A move on the grid.
///
/// The index of an action, used by tables and policies, follows the order of
/// [`Action::ALL`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
pub enum Action {
    /// Row - 1.
    Up,

    /// Column + 1.
    Right,

    /// Row + 1.
    Down,

    /// Column - 1.
    Left,

    /// Stay in place. Only available when enabled in the configuration.
    Stay,
}

impl Action {
    /// All actions in index order.
    pub const ALL: [Action; 5] = [
        Action::Up,
        Action::Right,
        Action::Down,
        Action::Left,
        Action::Stay,
    ];

    /// Index of the action.
    pub fn index(self) -> usize {
        match self {
            Action::Up => 0,
            Action::Right => 1,
            Action::Down => 2,
            Action::Left => 3,
            Action::Stay => 4,
        }
    }

    /// `(row delta, column delta)`.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Action::Up => (-1, 0),
            Action::Right => (0, 1),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
            Action::Stay => (0, 0),
        }
    }

    /// A single character drawing the action.
    pub fn symbol(self) -> char {
        match self {
            Action::Up => '^',
            Action::Right => '>',
            Action::Down => 'v',
            Action::Left => '<',
            Action::Stay => 'o',
        }
    }
}

impl From<Action> for usize {
    fn from(a: Action) -> Self {
        a.index()
    }
}

impl TryFrom<usize> for Action {
    type Error = usize;

    fn try_from(i: usize) -> Result<Self, usize> {
        Action::ALL.get(i).copied().ok_or(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_order() {
        for (i, a) in Action::ALL.iter().enumerate() {
            assert_eq!(a.index(), i);
            assert_eq!(Action::try_from(i), Ok(*a));
        }
        assert_eq!(Action::try_from(5), Err(5));
    }
}
