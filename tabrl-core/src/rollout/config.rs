//! Configuration of [`Rollout`](super::Rollout).
use serde::{Deserialize, Serialize};

/// Configuration of [`Rollout`](super::Rollout).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct RolloutConfig {
    /// The maximum number of steps of an episode.
    pub max_steps: usize,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        Self { max_steps: 1000 }
    }
}

impl RolloutConfig {
    /// Sets the maximum number of steps of an episode.
    pub fn max_steps(mut self, v: usize) -> Self {
        self.max_steps = v;
        self
    }
}
