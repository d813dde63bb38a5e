//! Core functionalities.
mod agent;
mod env;
mod replay_buffer;
mod solver;
pub use agent::Agent;
pub use env::{CellKind, Env, State};
pub use replay_buffer::{ExperienceBufferBase, ReplayBufferBase};
pub use solver::Solver;
