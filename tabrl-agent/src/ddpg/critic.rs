//! Critic of DDPG agent.
use crate::util::track;
use tabrl_core::{Env, Experience, StateActionTable};

/// A tabular action-value function with a target copy.
#[derive(Debug, Clone)]
pub struct Critic {
    q: StateActionTable,
    q_tgt: StateActionTable,
}

impl Critic {
    /// Zero action values with the shape of `env`.
    pub fn new<E: Env>(env: &E) -> Self {
        let q = StateActionTable::zeros_like_env(env);
        let q_tgt = q.clone();
        Self { q, q_tgt }
    }

    /// The action values.
    pub fn q(&self) -> &StateActionTable {
        &self.q
    }

    /// The target action values.
    pub fn q_tgt(&self) -> &StateActionTable {
        &self.q_tgt
    }

    /// Bootstrapped target of a transition: `r` if `done`, otherwise
    /// `r + gamma * max_a' Q_target(s', a')`.
    pub fn target(&self, exp: &Experience, discount_factor: f64) -> f64 {
        if exp.done {
            exp.reward
        } else {
            exp.reward + discount_factor * self.q_tgt.max(exp.next_state)
        }
    }

    /// Moves `Q(s, a)` toward the target of each transition, in order.
    ///
    /// Returns the mean absolute TD error before the updates.
    pub fn update(&mut self, batch: &[Experience], learning_rate: f64, discount_factor: f64) -> f64 {
        let mut td_abs = 0.0;
        for exp in batch.iter() {
            let target = self.target(exp, discount_factor);
            let q = &mut self.q[(exp.state.0, exp.state.1, exp.action)];
            let td = target - *q;
            *q += learning_rate * td;
            td_abs += td.abs();
        }
        if batch.is_empty() {
            0.0
        } else {
            td_abs / batch.len() as f64
        }
    }

    /// Soft update of the target table.
    pub fn track(&mut self, tau: f64) {
        track(&mut self.q_tgt, &self.q, tau);
    }
}
