//! A bounded replay buffer of [`Experience`](crate::Experience)s.
mod base;
mod config;
pub use base::SimpleReplayBuffer;
pub use config::SimpleReplayBufferConfig;
