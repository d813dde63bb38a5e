//! PPO agent.
mod base;
mod config;
mod value;
pub use base::{gated_score, Ppo, PpoEpisode};
pub use config::PpoConfig;
pub use value::ValueFunction;
