//! State-value table of PPO.
use super::PpoEpisode;
use tabrl_core::{Env, State, ValueTable};

/// A state-value table fitted to Monte-Carlo returns.
#[derive(Debug, Clone)]
pub struct ValueFunction {
    values: ValueTable,
}

impl ValueFunction {
    /// A table of zeros with the shape of `env`.
    pub fn new<E: Env>(env: &E) -> Self {
        Self {
            values: ValueTable::zeros_like_env(env),
        }
    }

    /// Value of `s`.
    pub fn get(&self, s: State) -> f64 {
        self.values[s]
    }

    /// The table.
    pub fn values(&self) -> &ValueTable {
        &self.values
    }

    /// Moves the value of every visited cell toward the discounted return of its
    /// episode: `V(s) += lr * (G - V(s))`, once per visit.
    pub fn update(&mut self, episodes: &[PpoEpisode], learning_rate: f64) {
        for ep in episodes.iter() {
            for step in ep.steps.iter() {
                let v = &mut self.values[step.state];
                *v += learning_rate * (ep.total_return - *v);
            }
        }
    }
}
