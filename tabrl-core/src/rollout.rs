//! Episode rollout.
//!
//! [`Rollout`] runs a single episode in an [`Env`] with a [`SoftmaxPolicy`] and
//! returns the visited steps as a [`Trajectory`]. The same routine serves every
//! sampling solver; what differs between them is the [`ActionSelection`] and the
//! predicate deciding when an episode is over.
mod config;
mod trajectory;
use crate::{ActionSelection, Env, SoftmaxPolicy, State};
pub use config::RolloutConfig;
use log::{trace, warn};
use rand::{seq::SliceRandom, Rng};
pub use trajectory::{Experience, Trajectory, TrajectoryStep};

/// The default termination predicate: an episode ends on entering a terminal or
/// forbidden cell.
pub fn terminates_episode<E: Env>(env: &E, s: State) -> bool {
    env.is_absorbing(s)
}

/// Runs episodes with a bounded number of steps.
#[derive(Debug, Clone)]
pub struct Rollout {
    max_steps: usize,
}

impl Rollout {
    /// Builds a rollout from its configuration.
    pub fn build(config: &RolloutConfig) -> Self {
        Self {
            max_steps: config.max_steps,
        }
    }

    /// The step budget of an episode.
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Runs an episode.
    ///
    /// The start cell is drawn uniformly from [`Env::start_states`]. At each step an
    /// action is chosen with `selection`, and the probability the softmax policy
    /// assigns to it is recorded. The episode ends when `is_done` holds for the
    /// current cell or after `max_steps` steps.
    pub fn run<E, R, F>(
        &self,
        env: &E,
        policy: &SoftmaxPolicy,
        selection: ActionSelection,
        is_done: F,
        rng: &mut R,
    ) -> Trajectory
    where
        E: Env,
        R: Rng,
        F: Fn(&E, State) -> bool,
    {
        let starts = env.start_states();
        let mut s = match starts.choose(rng) {
            Some(&s) => s,
            None => {
                warn!("The environment has no start state");
                return Trajectory::default();
            }
        };
        let gamma = env.discount_factor();
        let mut trajectory = Trajectory::default();
        let mut discount = 1.0;

        for _ in 0..self.max_steps {
            if is_done(env, s) {
                trajectory.terminated = true;
                break;
            }
            let action = policy.select(s, selection, rng);
            let prob = policy.prob(s, action);
            let next_state = env.transition(s, action);
            let reward = env.reward(next_state);
            trajectory.total_return += discount * reward;
            discount *= gamma;
            trajectory.steps.push(TrajectoryStep {
                state: s,
                action,
                reward,
                prob,
                next_state,
            });
            s = next_state;
        }

        if !trajectory.terminated && is_done(env, s) {
            trajectory.terminated = true;
        }
        trace!(
            "Episode of {} steps, return {:.4}, terminated: {}",
            trajectory.len(),
            trajectory.total_return,
            trajectory.terminated
        );

        trajectory
    }
}
