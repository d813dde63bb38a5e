//! Configuration of [`GridWorld`](crate::GridWorld).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};
use tabrl_core::{error::TabRlError, CellKind};

/// A cell that is not an ordinary zero-reward cell.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct CellConfig {
    /// Row of the cell.
    pub row: usize,

    /// Column of the cell.
    pub col: usize,

    /// Type of the cell.
    pub kind: CellKind,

    /// Reward obtained when entering the cell.
    pub reward: f64,
}

/// Configuration of [`GridWorld`](crate::GridWorld).
///
/// Cells not listed in `cells` are [`CellKind::Normal`] with zero reward.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct GridWorldConfig {
    /// Number of rows.
    pub rows: usize,

    /// Number of columns.
    pub cols: usize,

    /// Special cells.
    pub cells: Vec<CellConfig>,

    /// If `true`, [`Action::Stay`](crate::Action::Stay) is available.
    pub stay_action: bool,

    /// Discount factor in `[0, 1)`.
    pub discount_factor: f64,
}

impl Default for GridWorldConfig {
    fn default() -> Self {
        Self {
            rows: 3,
            cols: 4,
            cells: vec![],
            stay_action: false,
            discount_factor: 0.9,
        }
        .cell(0, 3, CellKind::Terminal, 1.0)
        .cell(1, 3, CellKind::Terminal, -1.0)
        .cell(1, 1, CellKind::Wall, 0.0)
        .cell(2, 2, CellKind::Forbidden, -0.5)
    }
}

impl GridWorldConfig {
    /// An empty grid of ordinary cells.
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![],
            stay_action: false,
            discount_factor: 0.9,
        }
    }

    /// Sets the number of rows.
    pub fn rows(mut self, v: usize) -> Self {
        self.rows = v;
        self
    }

    /// Sets the number of columns.
    pub fn cols(mut self, v: usize) -> Self {
        self.cols = v;
        self
    }

    /// Adds a special cell.
    pub fn cell(mut self, row: usize, col: usize, kind: CellKind, reward: f64) -> Self {
        self.cells.push(CellConfig {
            row,
            col,
            kind,
            reward,
        });
        self
    }

    /// Enables or disables the stay action.
    pub fn stay_action(mut self, v: bool) -> Self {
        self.stay_action = v;
        self
    }

    /// Sets the discount factor.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.discount_factor = v;
        self
    }

    /// Checks the layout.
    pub fn validate(&self) -> Result<(), TabRlError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(TabRlError::InvalidConfig(format!(
                "grid dimensions must be positive, got {}x{}",
                self.rows, self.cols
            )));
        }
        if !(0.0..1.0).contains(&self.discount_factor) {
            return Err(TabRlError::InvalidConfig(format!(
                "discount factor must be in [0, 1), got {}",
                self.discount_factor
            )));
        }
        let mut seen = HashSet::new();
        for cell in self.cells.iter() {
            if cell.row >= self.rows || cell.col >= self.cols {
                return Err(TabRlError::InvalidConfig(format!(
                    "cell ({}, {}) is out of a {}x{} grid",
                    cell.row, cell.col, self.rows, self.cols
                )));
            }
            if !seen.insert((cell.row, cell.col)) {
                return Err(TabRlError::InvalidConfig(format!(
                    "cell ({}, {}) is given more than once",
                    cell.row, cell.col
                )));
            }
            if !cell.reward.is_finite() {
                return Err(TabRlError::InvalidConfig(format!(
                    "reward of cell ({}, {}) is not finite",
                    cell.row, cell.col
                )));
            }
        }
        Ok(())
    }

    /// Constructs [`GridWorldConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`GridWorldConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_grid_world_config() -> Result<()> {
        let config = GridWorldConfig::default()
            .stay_action(true)
            .discount_factor(0.95)
            .cell(2, 0, CellKind::Normal, -0.04);

        let dir = TempDir::new("grid_world_config")?;
        let path = dir.path().join("grid_world.yaml");
        config.save(&path)?;
        let config_ = GridWorldConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_validate() {
        assert!(GridWorldConfig::default().validate().is_ok());
        assert!(GridWorldConfig::default().rows(0).validate().is_err());
        assert!(GridWorldConfig::default()
            .discount_factor(1.0)
            .validate()
            .is_err());
        assert!(GridWorldConfig::default()
            .cell(3, 0, CellKind::Wall, 0.0)
            .validate()
            .is_err());
        assert!(GridWorldConfig::default()
            .cell(1, 1, CellKind::Normal, 0.0)
            .validate()
            .is_err());
    }
}
