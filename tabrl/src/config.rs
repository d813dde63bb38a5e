//! Hyperparameters of every solver.
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};
use tabrl_agent::{
    ddpg::DdpgConfig, dp::DpConfig, ppo::PpoConfig, reinforce::ReinforceConfig, trpo::TrpoConfig,
};
use tabrl_core::TrainerConfig;

/// Hyperparameters of every solver, loadable from a single YAML file.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Default)]
pub struct SolversConfig {
    /// Episode loop of the sampling solvers.
    #[serde(default)]
    pub trainer: TrainerConfig,

    /// Value iteration and policy iteration.
    #[serde(default)]
    pub dp: DpConfig,

    /// REINFORCE.
    #[serde(default)]
    pub reinforce: ReinforceConfig,

    /// TRPO.
    #[serde(default)]
    pub trpo: TrpoConfig,

    /// PPO.
    #[serde(default)]
    pub ppo: PpoConfig,

    /// DDPG-style actor-critic.
    #[serde(default)]
    pub ddpg: DdpgConfig,
}

impl SolversConfig {
    /// Sets the trainer configuration.
    pub fn trainer(mut self, v: TrainerConfig) -> Self {
        self.trainer = v;
        self
    }

    /// Sets the dynamic programming configuration.
    pub fn dp(mut self, v: DpConfig) -> Self {
        self.dp = v;
        self
    }

    /// Constructs [`SolversConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`SolversConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
