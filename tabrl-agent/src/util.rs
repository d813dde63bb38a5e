//! Utilities shared by the solvers.
use log::trace;
use ndarray::{Array1, Zip};
use tabrl_core::{Env, SoftmaxPolicy, State, StateActionTable, Trajectory, ValueTable};

/// Tolerance of the policy evaluation run when reporting the value of a stochastic policy.
pub const EVAL_TOLERANCE: f64 = 1e-6;

/// Maximum number of sweeps of the policy evaluation run when reporting the value of
/// a stochastic policy.
pub const EVAL_MAX_SWEEPS: usize = 1000;

/// Applies soft update on a table.
///
/// dest = tau * src + (1.0 - tau) * dest
pub fn track(dest: &mut StateActionTable, src: &StateActionTable, tau: f64) {
    Zip::from(dest.as_array_mut())
        .and(src.as_array())
        .for_each(|d, &s| *d = tau * s + (1.0 - tau) * *d);
    trace!("soft update");
}

/// Adds `weight * (e_a - probs)` to the gradient row of `s`.
///
/// `e_a - probs` is the gradient of `ln softmax(theta(s, .))[a]` with respect to
/// `theta(s, .)`.
pub fn add_score(
    grad: &mut StateActionTable,
    s: State,
    a: usize,
    probs: &Array1<f64>,
    weight: f64,
) {
    let mut row = grad.row_mut(s);
    row.scaled_add(-weight, probs);
    row[a] += weight;
}

/// Monte-Carlo policy gradient of a batch of episodes.
///
/// Every step is weighted by the discounted return of its whole episode, and the
/// probabilities are those of the current `policy`.
pub fn policy_gradient(policy: &SoftmaxPolicy, trajectories: &[Trajectory]) -> StateActionTable {
    let mut grad = policy.logits().zeros_like();
    for tr in trajectories.iter() {
        for step in tr.steps.iter() {
            let probs = policy.probs(step.state);
            add_score(&mut grad, step.state, step.action, &probs, tr.total_return);
        }
    }
    grad
}

/// Mean discounted return of a batch of episodes. Zero for an empty batch.
pub fn mean_return(trajectories: &[Trajectory]) -> f64 {
    if trajectories.is_empty() {
        0.0
    } else {
        trajectories.iter().map(|tr| tr.total_return).sum::<f64>() / trajectories.len() as f64
    }
}

/// Sets absorbing cells to their reward and walls to zero.
pub fn pin_absorbing<E: Env>(env: &E, values: &mut ValueTable) {
    for s in env.states() {
        if env.is_absorbing(s) {
            values[s] = env.reward(s);
        } else if env.is_wall(s) {
            values[s] = 0.0;
        }
    }
}
