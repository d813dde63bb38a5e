//! Configuration of TRPO agent.
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};
use tabrl_core::error::TabRlError;

/// Configuration of [`Trpo`](super::Trpo).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrpoConfig {
    /// Number of episodes collected before each update.
    pub episodes_per_update: usize,

    /// Largest accepted mean KL divergence of an update.
    pub max_kl: f64,

    /// Added to the diagonal Fisher information before inversion.
    pub damping: f64,

    /// Initial step size of the line search.
    pub initial_step: f64,

    /// Factor applied to the step size after a rejected candidate.
    pub backtrack_ratio: f64,

    /// Number of candidates of the line search.
    pub max_backtracks: usize,
}

impl Default for TrpoConfig {
    fn default() -> Self {
        Self {
            episodes_per_update: 20,
            max_kl: 0.01,
            damping: 0.1,
            initial_step: 1.0,
            backtrack_ratio: 0.5,
            max_backtracks: 10,
        }
    }
}

impl TrpoConfig {
    /// Sets the number of episodes per update.
    pub fn episodes_per_update(mut self, v: usize) -> Self {
        self.episodes_per_update = v;
        self
    }

    /// Sets the KL divergence limit.
    pub fn max_kl(mut self, v: f64) -> Self {
        self.max_kl = v;
        self
    }

    /// Sets the damping of the Fisher information.
    pub fn damping(mut self, v: f64) -> Self {
        self.damping = v;
        self
    }

    /// Sets the initial step size of the line search.
    pub fn initial_step(mut self, v: f64) -> Self {
        self.initial_step = v;
        self
    }

    /// Sets the factor applied after a rejected candidate.
    pub fn backtrack_ratio(mut self, v: f64) -> Self {
        self.backtrack_ratio = v;
        self
    }

    /// Sets the number of line search candidates.
    pub fn max_backtracks(mut self, v: usize) -> Self {
        self.max_backtracks = v;
        self
    }

    /// Checks the values of the configuration.
    pub fn validate(&self) -> Result<(), TabRlError> {
        if self.episodes_per_update == 0 {
            return Err(TabRlError::InvalidConfig(
                "episodes_per_update must be positive".to_string(),
            ));
        }
        if !(self.max_kl >= 0.0) || !(self.damping >= 0.0) {
            return Err(TabRlError::InvalidConfig(format!(
                "max_kl and damping must be non-negative, got {} and {}",
                self.max_kl, self.damping
            )));
        }
        if self.max_backtracks == 0 {
            return Err(TabRlError::InvalidConfig(
                "max_backtracks must be positive".to_string(),
            ));
        }
        if !(self.initial_step > 0.0 && self.initial_step.is_finite()) {
            return Err(TabRlError::InvalidConfig(format!(
                "initial_step must be positive and finite, got {}",
                self.initial_step
            )));
        }
        if !(self.backtrack_ratio > 0.0 && self.backtrack_ratio < 1.0) {
            return Err(TabRlError::InvalidConfig(format!(
                "backtrack_ratio must be in (0, 1), got {}",
                self.backtrack_ratio
            )));
        }
        Ok(())
    }

    /// Constructs [`TrpoConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrpoConfig`] as YAML file.
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
    fn test_serde_trpo_config() -> Result<()> {
        let config = TrpoConfig::default().max_kl(0.02).damping(0.5);
        let dir = TempDir::new("trpo_config")?;
        let path = dir.path().join("trpo.yaml");
        config.save(&path)?;
        assert_eq!(config, TrpoConfig::load(&path)?);
        Ok(())
    }

    #[test]
    fn test_validate_line_search() {
        assert!(TrpoConfig::default().validate().is_ok());
        assert!(TrpoConfig::default().max_backtracks(0).validate().is_err());
        assert!(TrpoConfig::default().initial_step(0.0).validate().is_err());
        assert!(TrpoConfig::default().initial_step(-1.0).validate().is_err());
        assert!(TrpoConfig::default()
            .initial_step(f64::INFINITY)
            .validate()
            .is_err());
        assert!(TrpoConfig::default()
            .initial_step(f64::NAN)
            .validate()
            .is_err());
        assert!(TrpoConfig::default().backtrack_ratio(1.0).validate().is_err());
        assert!(TrpoConfig::default()
            .initial_step(0.5)
            .backtrack_ratio(0.8)
            .max_backtracks(1)
            .validate()
            .is_ok());
    }
}
