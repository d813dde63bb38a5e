#![warn(missing_docs)]
//! A small, deterministic grid-world environment.
//!
//! [`GridWorld`] implements [`Env`](tabrl_core::Env). Its layout is described by
//! [`GridWorldConfig`], whose default is the 3x4 grid below, with a discount
//! factor of 0.9:
//!
//! ```text
//!   .   .   .  +1
//!   .   #   .  -1
//!   .   .  -0.5 .
//! ```
//!
//! `+1` and `-1` are terminal cells, `-0.5` is a forbidden cell and `#` a wall.
//!
//! ```rust
//! use tabrl_core::Env;
//! use tabrl_gridworld::{Action, GridWorld, GridWorldConfig};
//!
//! let env = GridWorld::build(&GridWorldConfig::default()).unwrap();
//! assert_eq!(env.transition((0, 2), Action::Right.index()), (0, 3));
//! assert_eq!(env.reward((0, 3)), 1.0);
//! ```
mod act;
mod config;
mod grid;
pub use act::Action;
pub use config::{CellConfig, GridWorldConfig};
pub use grid::GridWorld;
