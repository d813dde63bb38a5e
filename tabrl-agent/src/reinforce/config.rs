//! Configuration of REINFORCE agent.
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};
use tabrl_core::error::TabRlError;

/// Configuration of [`Reinforce`](super::Reinforce).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct ReinforceConfig {
    /// Number of episodes collected before each update.
    pub episodes_per_update: usize,

    /// Step size of gradient ascent.
    pub learning_rate: f64,
}

impl Default for ReinforceConfig {
    fn default() -> Self {
        Self {
            episodes_per_update: 10,
            learning_rate: 0.01,
        }
    }
}

impl ReinforceConfig {
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

    /// Checks the values of the configuration.
    pub fn validate(&self) -> Result<(), TabRlError> {
        if self.episodes_per_update == 0 {
            return Err(TabRlError::InvalidConfig(
                "episodes_per_update must be positive".to_string(),
            ));
        }
        if !(self.learning_rate > 0.0) {
            return Err(TabRlError::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }

    /// Constructs [`ReinforceConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`ReinforceConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
