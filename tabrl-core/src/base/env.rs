//! Environment.
use serde::{Deserialize, Serialize};

/// A cell of the grid, addressed as `(row, col)`.
pub type State = (usize, usize);

/// Type of a cell of the grid.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
pub enum CellKind {
    /// An ordinary cell.
    Normal,

    /// Episodes end when the agent enters this cell.
    Terminal,

    /// Entering this cell is penalised and ends the episode.
    Forbidden,

    /// An impassable cell. Moves into a wall leave the agent where it is.
    Wall,
}

/// Represents a small, deterministic, fully observable grid MDP.
///
/// Rewards belong to cells, not to transitions: moving into a cell `s'` yields
/// `reward(s')`. The layout is fixed once the environment is built.
pub trait Env {
    /// Number of rows of the grid.
    fn n_rows(&self) -> usize;

    /// Number of columns of the grid.
    fn n_cols(&self) -> usize;

    /// Number of actions, identical in every state.
    fn n_actions(&self) -> usize;

    /// Type of the cell at `s`.
    fn kind(&self, s: State) -> CellKind;

    /// Reward obtained when entering the cell at `s`.
    fn reward(&self, s: State) -> f64;

    /// Deterministic transition function.
    ///
    /// Moves leaving the grid or entering a wall return `s` unchanged.
    fn transition(&self, s: State, a: usize) -> State;

    /// Discount factor in `[0, 1)`.
    fn discount_factor(&self) -> f64;

    /// All cells in row-major order.
    fn states(&self) -> Vec<State> {
        let n_cols = self.n_cols();
        (0..self.n_rows() * n_cols)
            .map(|i| (i / n_cols, i % n_cols))
            .collect()
    }

    /// Returns `true` if entering `s` ends an episode.
    fn is_absorbing(&self, s: State) -> bool {
        matches!(self.kind(s), CellKind::Terminal | CellKind::Forbidden)
    }

    /// Returns `true` if `s` is a wall.
    fn is_wall(&self, s: State) -> bool {
        self.kind(s) == CellKind::Wall
    }

    /// Cells from which an episode may start: everything except forbidden cells and walls.
    fn start_states(&self) -> Vec<State> {
        self.states()
            .into_iter()
            .filter(|&s| !matches!(self.kind(s), CellKind::Forbidden | CellKind::Wall))
            .collect()
    }
}
