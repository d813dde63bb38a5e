//! Tables indexed by cells of the grid.
use crate::{Env, State};
use ndarray::{s, Array2, Array3, ArrayBase, ArrayView1, ArrayViewMut1, Data, Ix1, Zip};
use std::ops::{Index, IndexMut};

/// A scalar per state-action pair, indexed by `(row, col, action)`.
///
/// Used for policy logits, Q-values, gradients and Fisher information.
#[derive(Debug, Clone, PartialEq)]
pub struct StateActionTable {
    data: Array3<f64>,
}

impl StateActionTable {
    /// Creates a table filled with zeros.
    pub fn zeros(n_rows: usize, n_cols: usize, n_actions: usize) -> Self {
        Self {
            data: Array3::zeros((n_rows, n_cols, n_actions)),
        }
    }

    /// Creates a table of zeros with the shape of the given environment.
    pub fn zeros_like_env<E: Env>(env: &E) -> Self {
        Self::zeros(env.n_rows(), env.n_cols(), env.n_actions())
    }

    /// Creates a table of zeros with the shape of `self`.
    pub fn zeros_like(&self) -> Self {
        Self {
            data: Array3::zeros(self.data.raw_dim()),
        }
    }

    /// Returns `(n_rows, n_cols, n_actions)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Number of actions per state.
    pub fn n_actions(&self) -> usize {
        self.data.dim().2
    }

    /// Values of all actions at `s`.
    pub fn row(&self, (r, c): State) -> ArrayView1<'_, f64> {
        self.data.slice(s![r, c, ..])
    }

    /// Mutable values of all actions at `s`.
    pub fn row_mut(&mut self, (r, c): State) -> ArrayViewMut1<'_, f64> {
        self.data.slice_mut(s![r, c, ..])
    }

    /// Maximum value over actions at `s`.
    pub fn max(&self, s: State) -> f64 {
        self.row(s).fold(f64::NEG_INFINITY, |m, &x| m.max(x))
    }

    /// Index of the maximum value at `s`; the lowest index wins ties.
    pub fn argmax(&self, s: State) -> usize {
        argmax(&self.row(s))
    }

    /// `self += alpha * other`.
    pub fn add_scaled(&mut self, other: &Self, alpha: f64) {
        self.data.scaled_add(alpha, &other.data);
    }

    /// The underlying array.
    pub fn as_array(&self) -> &Array3<f64> {
        &self.data
    }

    /// The underlying mutable array.
    pub fn as_array_mut(&mut self) -> &mut Array3<f64> {
        &mut self.data
    }
}

impl Index<(usize, usize, usize)> for StateActionTable {
    type Output = f64;

    fn index(&self, (r, c, a): (usize, usize, usize)) -> &f64 {
        &self.data[[r, c, a]]
    }
}

impl IndexMut<(usize, usize, usize)> for StateActionTable {
    fn index_mut(&mut self, (r, c, a): (usize, usize, usize)) -> &mut f64 {
        &mut self.data[[r, c, a]]
    }
}

/// Index of the first maximum of `xs`.
pub fn argmax<S: Data<Elem = f64>>(xs: &ArrayBase<S, Ix1>) -> usize {
    let mut best = 0;
    for (i, &x) in xs.iter().enumerate().skip(1) {
        if x > xs[best] {
            best = i;
        }
    }
    best
}

/// A scalar per state.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable {
    data: Array2<f64>,
}

impl ValueTable {
    /// Creates a table filled with zeros.
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            data: Array2::zeros((n_rows, n_cols)),
        }
    }

    /// Creates a table of zeros with the shape of the given environment.
    pub fn zeros_like_env<E: Env>(env: &E) -> Self {
        Self::zeros(env.n_rows(), env.n_cols())
    }

    /// Returns `(n_rows, n_cols)`.
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Maximum absolute difference between two tables of the same shape.
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        assert_eq!(self.shape(), other.shape());
        Zip::from(&self.data)
            .and(&other.data)
            .fold(0.0, |m, x, y| f64::max(m, (x - y).abs()))
    }

    /// The underlying array.
    pub fn as_array(&self) -> &Array2<f64> {
        &self.data
    }
}

impl Index<State> for ValueTable {
    type Output = f64;

    fn index(&self, (r, c): State) -> &f64 {
        &self.data[[r, c]]
    }
}

impl IndexMut<State> for ValueTable {
    fn index_mut(&mut self, (r, c): State) -> &mut f64 {
        &mut self.data[[r, c]]
    }
}

/// An action index per state. `None` marks cells without an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyTable {
    data: Array2<Option<usize>>,
}

impl PolicyTable {
    /// Creates a table without actions.
    pub fn empty(n_rows: usize, n_cols: usize) -> Self {
        Self {
            data: Array2::from_elem((n_rows, n_cols), None),
        }
    }

    /// Returns `(n_rows, n_cols)`.
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }
}

impl Index<State> for PolicyTable {
    type Output = Option<usize>;

    fn index(&self, (r, c): State) -> &Option<usize> {
        &self.data[[r, c]]
    }
}

impl IndexMut<State> for PolicyTable {
    fn index_mut(&mut self, (r, c): State) -> &mut Option<usize> {
        &mut self.data[[r, c]]
    }
}

/// Output of every solver.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// State values.
    pub values: ValueTable,

    /// Greedy action of each state.
    pub policy: PolicyTable,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, aview1};

    #[test]
    fn test_state_action_table_layout() {
        let mut t = StateActionTable::zeros(2, 3, 4);
        t[(1, 2, 3)] = 5.0;
        t[(0, 1, 0)] = -1.0;
        assert_eq!(t.shape(), (2, 3, 4));
        assert_eq!(t.row((1, 2)), aview1(&[0.0, 0.0, 0.0, 5.0]));
        assert_eq!(t.row((0, 1)), aview1(&[-1.0, 0.0, 0.0, 0.0]));
        assert_eq!(t.as_array().iter().filter(|&&x| x != 0.0).count(), 2);
    }

    #[test]
    fn test_argmax_first_max_wins() {
        assert_eq!(argmax(&arr1(&[1.0, 3.0, 3.0, 2.0])), 1);
        assert_eq!(argmax(&arr1(&[0.0, 0.0, 0.0, 0.0])), 0);

        let mut t = StateActionTable::zeros(1, 1, 4);
        t.row_mut((0, 0)).assign(&aview1(&[0.5, -1.0, 2.0, 2.0]));
        assert_eq!(t.argmax((0, 0)), 2);
        assert_eq!(t.max((0, 0)), 2.0);
    }

    #[test]
    fn test_add_scaled() {
        let mut t = StateActionTable::zeros(1, 2, 2);
        let mut g = t.zeros_like();
        g[(0, 1, 1)] = 2.0;
        t.add_scaled(&g, 0.5);
        assert_eq!(t[(0, 1, 1)], 1.0);
        assert_eq!(t[(0, 0, 0)], 0.0);
        t.add_scaled(&g, -0.5);
        assert_eq!(t, t.zeros_like());
    }

    #[test]
    fn test_value_table_diff() {
        let mut v1 = ValueTable::zeros(2, 2);
        let v2 = ValueTable::zeros(2, 2);
        v1[(1, 0)] = -0.25;
        assert_eq!(v1.max_abs_diff(&v2), 0.25);
        assert_eq!(v1.as_array().row(1), aview1(&[-0.25, 0.0]));
    }

    #[test]
    fn test_policy_table() {
        let mut p = PolicyTable::empty(2, 3);
        p[(1, 2)] = Some(3);
        assert_eq!(p.shape(), (2, 3));
        assert_eq!(p[(1, 2)], Some(3));
        assert_eq!(p[(0, 0)], None);
    }
}
