//! Configuration of the dynamic programming solvers.
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};
use tabrl_core::error::TabRlError;

/// Configuration of [`ValueIteration`](super::ValueIteration) and
/// [`PolicyIteration`](super::PolicyIteration).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct DpConfig {
    /// Sweeps stop when the largest value change is below this threshold.
    pub theta: f64,

    /// Maximum number of sweeps of a run of sweeps, and of improvement steps of
    /// policy iteration.
    pub max_iterations: usize,
}

impl Default for DpConfig {
    fn default() -> Self {
        Self {
            theta: 1e-4,
            max_iterations: 10000,
        }
    }
}

impl DpConfig {
    /// Sets the convergence threshold.
    pub fn theta(mut self, v: f64) -> Self {
        self.theta = v;
        self
    }

    /// Sets the maximum number of iterations.
    pub fn max_iterations(mut self, v: usize) -> Self {
        self.max_iterations = v;
        self
    }

    /// Checks the values of the configuration.
    pub fn validate(&self) -> Result<(), TabRlError> {
        if !(self.theta > 0.0) {
            return Err(TabRlError::InvalidConfig(format!(
                "theta must be positive, got {}",
                self.theta
            )));
        }
        if self.max_iterations == 0 {
            return Err(TabRlError::InvalidConfig(
                "max_iterations must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Constructs [`DpConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`DpConfig`] as YAML file.
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
    fn test_serde_dp_config() -> Result<()> {
        let config = DpConfig::default().theta(1e-8).max_iterations(50);
        let dir = TempDir::new("dp_config")?;
        let path = dir.path().join("dp.yaml");
        config.save(&path)?;
        assert_eq!(config, DpConfig::load(&path)?);
        Ok(())
    }

    #[test]
    fn test_validate() {
        assert!(DpConfig::default().validate().is_ok());
        assert!(DpConfig::default().theta(0.0).validate().is_err());
        assert!(DpConfig::default().theta(f64::NAN).validate().is_err());
        assert!(DpConfig::default().max_iterations(0).validate().is_err());
    }
}
