//! Trajectories and experiences.
use crate::State;

/// A step of an episode.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryStep {
    /// The cell the action was taken in.
    pub state: State,

    /// The action taken.
    pub action: usize,

    /// Reward of the cell entered.
    pub reward: f64,

    /// Probability of `action` under the policy when it was sampled.
    pub prob: f64,

    /// The cell entered.
    pub next_state: State,
}

/// An episode.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trajectory {
    /// Steps in the order they were taken.
    pub steps: Vec<TrajectoryStep>,

    /// Discounted return `sum_t gamma^t * r_t`.
    pub total_return: f64,

    /// `true` if the episode ended in an absorbing cell rather than by the step budget.
    pub terminated: bool,
}

impl Trajectory {
    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if no step was taken.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Converts the steps into transitions for a replay buffer.
    ///
    /// Only the last transition of a terminated episode is marked as `done`.
    pub fn experiences(&self) -> Vec<Experience> {
        let n = self.steps.len();
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| Experience {
                state: step.state,
                action: step.action,
                reward: step.reward,
                next_state: step.next_state,
                done: self.terminated && i + 1 == n,
            })
            .collect()
    }
}

/// A transition stored in a replay buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Experience {
    /// The cell the action was taken in.
    pub state: State,

    /// The action taken.
    pub action: usize,

    /// Reward of the cell entered.
    pub reward: f64,

    /// The cell entered.
    pub next_state: State,

    /// `true` if `next_state` ends the episode.
    pub done: bool,
}
