#![warn(missing_docs)]
//! Core functionalities of tabrl, a library of tabular reinforcement learning solvers.
//!
//! The crate provides the pieces shared by every solver:
//!
//! * [`Env`], the interface of a small, deterministic, fully observable grid MDP.
//! * [`StateActionTable`], [`ValueTable`] and [`PolicyTable`], `ndarray`-backed tables indexed by
//!   `(row, col)` or `(row, col, action)`.
//! * [`SoftmaxPolicy`], a per-state-action logit table with softmax action probabilities.
//! * [`Rollout`], which runs an episode with a [`SoftmaxPolicy`] and returns a [`Trajectory`].
//! * [`replay_buffer::SimpleReplayBuffer`], a bounded FIFO buffer of [`Experience`]s.
//! * [`Trainer`], the episode loop driving an [`Agent`].
pub mod error;
pub mod record;
pub mod replay_buffer;

mod base;
pub use base::{Agent, CellKind, Env, ExperienceBufferBase, ReplayBufferBase, Solver, State};

mod table;
pub use table::{argmax, PolicyTable, Solution, StateActionTable, ValueTable};

mod policy;
pub use policy::{softmax, ActionSelection, SoftmaxPolicy};

mod rollout;
pub use rollout::{terminates_episode, Experience, Rollout, RolloutConfig, Trajectory, TrajectoryStep};

mod trainer;
pub use trainer::{Trainer, TrainerConfig};
