//! Configuration of PPO agent.
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};
use tabrl_core::error::TabRlError;

/// Configuration of [`Ppo`](super::Ppo).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct PpoConfig {
    /// Number of episodes collected before each update.
    pub episodes_per_update: usize,

    /// Step size of both the policy and the value updates.
    pub learning_rate: f64,

    /// Half-width of the trust interval `[1 - eps, 1 + eps]` of probability ratios.
    pub clip_epsilon: f64,

    /// Number of passes over a batch.
    pub n_epochs: usize,
}

impl Default for PpoConfig {
    fn default() -> Self {
        Self {
            episodes_per_update: 20,
            learning_rate: 0.001,
            clip_epsilon: 0.2,
            n_epochs: 10,
        }
    }
}

impl PpoConfig {
    /// Sets the number of episodes per update.
    pub fn episodes_per_update(mut self, v: usize) -> Self {
        self.episodes_per_update = v;
        self
    }

    /// Sets the learning rate.
    pub fn learning_rate(mut self, v: f64) -> Self {
        self.learning_rate = v;
        self
    }

    /// Sets the clipping parameter.
    pub fn clip_epsilon(mut self, v: f64) -> Self {
        self.clip_epsilon = v;
        self
    }

    /// Sets the number of epochs per update.
    pub fn n_epochs(mut self, v: usize) -> Self {
        self.n_epochs = v;
        self
    }

    /// Checks the values of the configuration.
    pub fn validate(&self) -> Result<(), TabRlError> {
        if self.episodes_per_update == 0 || self.n_epochs == 0 {
            return Err(TabRlError::InvalidConfig(
                "episodes_per_update and n_epochs must be positive".to_string(),
            ));
        }
        if !(self.clip_epsilon > 0.0 && self.clip_epsilon < 1.0) {
            return Err(TabRlError::InvalidConfig(format!(
                "clip_epsilon must be in (0, 1), got {}",
                self.clip_epsilon
            )));
        }
        if !(self.learning_rate > 0.0) {
            return Err(TabRlError::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }

    /// Constructs [`PpoConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`PpoConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
