//! The grid-world environment.
use crate::{Action, GridWorldConfig};
use anyhow::Result;
use log::info;
use std::convert::TryFrom;
use tabrl_core::{CellKind, Env, PolicyTable, State, ValueTable};

/// A deterministic grid world.
///
/// The layout is fixed at construction. Moving off the grid or into a wall leaves
/// the agent in place; the reward of a move is the reward of the cell entered.
#[derive(Debug, Clone)]
pub struct GridWorld {
    rows: usize,
    cols: usize,
    kinds: Vec<CellKind>,
    rewards: Vec<f64>,
    actions: Vec<Action>,
    discount_factor: f64,
}

impl GridWorld {
    /// Builds the environment.
    pub fn build(config: &GridWorldConfig) -> Result<Self> {
        config.validate()?;

        let n = config.rows * config.cols;
        let mut kinds = vec![CellKind::Normal; n];
        let mut rewards = vec![0.0; n];
        for cell in config.cells.iter() {
            let i = cell.row * config.cols + cell.col;
            kinds[i] = cell.kind;
            rewards[i] = cell.reward;
        }
        let n_actions = if config.stay_action { 5 } else { 4 };
        let actions = Action::ALL[..n_actions].to_vec();

        info!(
            "Built a {}x{} grid world with {} actions and discount factor {}",
            config.rows, config.cols, n_actions, config.discount_factor
        );

        Ok(Self {
            rows: config.rows,
            cols: config.cols,
            kinds,
            rewards,
            actions,
            discount_factor: config.discount_factor,
        })
    }

    #[inline]
    fn index(&self, (r, c): State) -> usize {
        r * self.cols + c
    }

    /// Available actions in index order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Draws a value table, one row of the grid per line. Walls are drawn as `#`.
    pub fn render_values(&self, values: &ValueTable) -> String {
        let mut out = String::new();
        for r in 0..self.rows {
            let line = (0..self.cols)
                .map(|c| match self.kind((r, c)) {
                    CellKind::Wall => format!("{:>8}", "#"),
                    _ => format!("{:>8.3}", values[(r, c)]),
                })
                .collect::<String>();
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    /// Draws a policy table with one symbol per cell.
    ///
    /// Terminal cells are drawn as `T`, forbidden cells as `X`, walls as `#`, and
    /// other cells without an action as `.`.
    pub fn render_policy(&self, policy: &PolicyTable) -> String {
        let mut out = String::new();
        for r in 0..self.rows {
            let line = (0..self.cols)
                .map(|c| {
                    let symbol = match (self.kind((r, c)), policy[(r, c)]) {
                        (CellKind::Terminal, _) => 'T',
                        (CellKind::Forbidden, _) => 'X',
                        (CellKind::Wall, _) => '#',
                        (CellKind::Normal, Some(a)) => Action::try_from(a)
                            .map(Action::symbol)
                            .unwrap_or('?'),
                        (CellKind::Normal, None) => '.',
                    };
                    format!(" {}", symbol)
                })
                .collect::<String>();
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

impl Env for GridWorld {
    fn n_rows(&self) -> usize {
        self.rows
    }

    fn n_cols(&self) -> usize {
        self.cols
    }

    fn n_actions(&self) -> usize {
        self.actions.len()
    }

    fn kind(&self, s: State) -> CellKind {
        self.kinds[self.index(s)]
    }

    fn reward(&self, s: State) -> f64 {
        self.rewards[self.index(s)]
    }

    fn transition(&self, s: State, a: usize) -> State {
        let (dr, dc) = match self.actions.get(a) {
            Some(action) => action.delta(),
            None => return s,
        };
        let r = s.0 as isize + dr;
        let c = s.1 as isize + dc;
        if r < 0 || c < 0 || r >= self.rows as isize || c >= self.cols as isize {
            return s;
        }
        let next = (r as usize, c as usize);
        if self.is_wall(next) {
            s
        } else {
            next
        }
    }

    fn discount_factor(&self) -> f64 {
        self.discount_factor
    }
}
