//! Agent.
use super::Env;
use crate::{record::Record, ActionSelection, Solution, SoftmaxPolicy, Trajectory};
use anyhow::Result;
use rand::Rng;

/// A solver that learns from sampled episodes.
///
/// An agent is driven by [`Trainer`](crate::Trainer): episodes are rolled out with
/// [`Agent::policy`] and [`Agent::selection`], handed over with [`Agent::push_episode`],
/// and followed by a call to [`Agent::opt_with_record`]. The agent decides whether
/// enough data has been collected to perform an optimization step.
pub trait Agent<E: Env> {
    /// The policy used to roll out episodes.
    fn policy(&self) -> &SoftmaxPolicy;

    /// How actions are chosen from [`Agent::policy`] during rollouts.
    fn selection(&self) -> ActionSelection;

    /// Stores an episode for the next optimization step.
    fn push_episode(&mut self, trajectory: Trajectory) -> Result<()>;

    /// Performs an optimization step and returns some information.
    ///
    /// Returns `None` when the step was skipped, for example while a batch is
    /// still being collected.
    fn opt_with_record<R: Rng>(&mut self, rng: &mut R) -> Option<Record>;

    /// Value and greedy policy tables of the current parameters.
    fn solution(&self, env: &E) -> Solution;
}
