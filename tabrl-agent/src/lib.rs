#![warn(missing_docs)]
//! Solvers of tabular MDPs.
//!
//! * [`dp`]: value iteration and policy iteration, computed from the model.
//! * [`reinforce`]: Monte-Carlo policy gradient.
//! * [`trpo`]: natural policy gradient with a KL-constrained line search.
//! * [`ppo`]: clipped surrogate updates with a separate value table.
//! * [`ddpg`]: an actor-critic with experience replay and target tables.
//!
//! The last four implement [`Agent`](tabrl_core::Agent) and are trained with
//! [`Trainer`](tabrl_core::Trainer).
pub mod ddpg;
pub mod dp;
pub mod ppo;
pub mod reinforce;
pub mod trpo;
pub mod util;
