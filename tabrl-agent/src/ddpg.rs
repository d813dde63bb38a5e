//! DDPG-style actor-critic for discrete actions.
//!
//! A tabular critic is trained on transitions sampled from a replay buffer, with
//! bootstrapped targets computed from a Polyak-averaged copy of itself. A softmax
//! actor follows the critic's action values. Rollouts are epsilon-greedy around
//! the actor's most probable action.
mod actor;
mod base;
mod config;
mod critic;
pub use actor::Actor;
pub use base::Ddpg;
pub use config::DdpgConfig;
pub use critic::Critic;
