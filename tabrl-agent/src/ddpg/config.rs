//! Configuration of DDPG agent.
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};
use tabrl_core::{error::TabRlError, replay_buffer::SimpleReplayBufferConfig};

/// Configuration of [`Ddpg`](super::Ddpg).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct DdpgConfig {
    /// Configuration of the replay buffer.
    pub replay_buffer: SimpleReplayBufferConfig,

    /// Number of transitions sampled per optimization step. Optimization starts
    /// once the buffer holds this many transitions.
    pub batch_size: usize,

    /// Step size of the actor.
    pub actor_lr: f64,

    /// Step size of the critic.
    pub critic_lr: f64,

    /// Soft update coefficient of the target tables.
    pub tau: f64,

    /// Probability of a uniformly random action during rollouts.
    pub epsilon: f64,
}

impl Default for DdpgConfig {
    fn default() -> Self {
        Self {
            replay_buffer: SimpleReplayBufferConfig::default(),
            batch_size: 32,
            actor_lr: 0.001,
            critic_lr: 0.001,
            tau: 0.001,
            epsilon: 0.1,
        }
    }
}

impl DdpgConfig {
    /// Sets the configuration of the replay buffer.
    pub fn replay_buffer(mut self, v: SimpleReplayBufferConfig) -> Self {
        self.replay_buffer = v;
        self
    }

    /// Sets the batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the step size of the actor.
    pub fn actor_lr(mut self, v: f64) -> Self {
        self.actor_lr = v;
        self
    }

    /// Sets the step size of the critic.
    pub fn critic_lr(mut self, v: f64) -> Self {
        self.critic_lr = v;
        self
    }

    /// Sets the soft update coefficient.
    pub fn tau(mut self, v: f64) -> Self {
        self.tau = v;
        self
    }

    /// Sets the exploration probability.
    pub fn epsilon(mut self, v: f64) -> Self {
        self.epsilon = v;
        self
    }

    /// Checks the values of the configuration.
    pub fn validate(&self) -> Result<(), TabRlError> {
        if self.batch_size == 0 {
            return Err(TabRlError::InvalidConfig(
                "batch_size must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.tau) || !(0.0..=1.0).contains(&self.epsilon) {
            return Err(TabRlError::InvalidConfig(format!(
                "tau and epsilon must be in [0, 1], got {} and {}",
                self.tau, self.epsilon
            )));
        }
        Ok(())
    }

    /// Constructs [`DdpgConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`DdpgConfig`] as YAML file.
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
    fn test_serde_ddpg_config() -> Result<()> {
        let config = DdpgConfig::default()
            .replay_buffer(SimpleReplayBufferConfig::default().capacity(500))
            .batch_size(16)
            .tau(0.01);
        let dir = TempDir::new("ddpg_config")?;
        let path = dir.path().join("ddpg.yaml");
        config.save(&path)?;
        assert_eq!(config, DdpgConfig::load(&path)?);
        Ok(())
    }
}
