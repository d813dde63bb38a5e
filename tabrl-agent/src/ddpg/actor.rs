//! Actor of DDPG agent.
use crate::util::track;
use ndarray::{ArrayView1, Zip};
use tabrl_core::{Env, Experience, SoftmaxPolicy, StateActionTable};

/// A softmax policy with a target copy of its logits.
///
/// The target logits are kept up to date but not used by the updates.
#[derive(Debug, Clone)]
pub struct Actor {
    policy: SoftmaxPolicy,
    logits_tgt: StateActionTable,
}

impl Actor {
    /// A uniform policy over the actions of `env`.
    pub fn new<E: Env>(env: &E) -> Self {
        let policy = SoftmaxPolicy::uniform(env);
        let logits_tgt = policy.logits().clone();
        Self { policy, logits_tgt }
    }

    /// The policy.
    pub fn policy(&self) -> &SoftmaxPolicy {
        &self.policy
    }

    /// The target logits.
    pub fn logits_tgt(&self) -> &StateActionTable {
        &self.logits_tgt
    }

    /// `theta(s, b) += lr * Q(s, b) * (1[b = a] - pi(b|s))` for every action `b`,
    /// where `q_row` holds `Q(s, .)`.
    pub fn update(&mut self, exp: &Experience, q_row: ArrayView1<f64>, learning_rate: f64) {
        let probs = self.policy.probs(exp.state);
        Zip::indexed(self.policy.logits_mut().row_mut(exp.state))
            .and(q_row)
            .and(&probs)
            .for_each(|b, theta, &q, &p| {
                let indicator = if b == exp.action { 1.0 } else { 0.0 };
                *theta += learning_rate * q * (indicator - p);
            });
    }

    /// Soft update of the target logits.
    pub fn track(&mut self, tau: f64) {
        track(&mut self.logits_tgt, self.policy.logits(), tau);
    }
}
