//! Solver.
use super::Env;
use crate::{record::AggregateRecorder, Solution};
use anyhow::Result;

/// A solver computing a [`Solution`] directly from the environment model.
pub trait Solver<E: Env> {
    /// Solves the MDP given by `env`.
    ///
    /// Information about the iterations, like the value change of each sweep,
    /// is stored in `recorder`.
    fn solve(&mut self, env: &E, recorder: &mut dyn AggregateRecorder) -> Result<Solution>;
}
