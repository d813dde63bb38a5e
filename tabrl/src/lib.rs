//! Tabular reinforcement learning solvers on a deterministic grid world.
//!
//! tabrl consists of the following crates:
//!
//! * [`tabrl_core`] provides the traits shared by environments and solvers, tabular
//!   value and policy types, the softmax policy, episode rollouts, the replay buffer,
//!   records and the trainer.
//! * [`tabrl_gridworld`] provides the grid-world environment.
//! * [`tabrl_agent`] provides the solvers: value iteration, policy iteration,
//!   REINFORCE, TRPO, PPO and a DDPG-style actor-critic.
//!
//! This crate ties them together: [`SolverKind`] names a solver and [`solve`] runs
//! it with the hyperparameters of a [`SolversConfig`].
//!
//! ```no_run
//! use tabrl::{solve, SolverKind, SolversConfig};
//! use tabrl_core::record::NullRecorder;
//! use tabrl_gridworld::{GridWorld, GridWorldConfig};
//!
//! let env = GridWorld::build(&GridWorldConfig::default()).unwrap();
//! let config = SolversConfig::default();
//! let solution = solve(SolverKind::ValueIteration, &env, &config, &mut NullRecorder::new()).unwrap();
//! print!("{}", env.render_policy(&solution.policy));
//! ```
mod config;
mod solver;
pub use config::SolversConfig;
pub use solver::{solve, SolverKind};
