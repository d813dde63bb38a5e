//! Dynamic programming on a known model.
//!
//! Both solvers update every cell from the values of the previous sweep
//! (synchronous sweeps). Absorbing cells keep their reward as value and walls keep
//! zero; neither gets an action.
mod config;
mod policy_iteration;
mod value_iteration;
pub use config::DpConfig;
use ndarray::Array1;
pub use policy_iteration::PolicyIteration;
use tabrl_core::{argmax, Env, State, ValueTable};
pub use value_iteration::ValueIteration;

/// One-step lookahead `reward(s') + gamma * V(s')` with `s' = transition(s, a)`.
pub fn q_value<E: Env>(env: &E, v: &ValueTable, s: State, a: usize) -> f64 {
    let s_next = env.transition(s, a);
    env.reward(s_next) + env.discount_factor() * v[s_next]
}

/// Lookahead values of every action at `s`.
pub fn q_values<E: Env>(env: &E, v: &ValueTable, s: State) -> Array1<f64> {
    (0..env.n_actions()).map(|a| q_value(env, v, s, a)).collect()
}

/// Largest violation of the Bellman optimality equation,
/// `max_s |max_a Q(s, a) - V(s)|` over cells that are updated.
pub fn bellman_residual<E: Env>(env: &E, v: &ValueTable) -> f64 {
    env.states()
        .into_iter()
        .filter(|&s| is_updated(env, s))
        .map(|s| {
            let q = q_values(env, v, s);
            (q[argmax(&q)] - v[s]).abs()
        })
        .fold(0.0, f64::max)
}

/// Values of a fresh solver: rewards on absorbing cells, zero elsewhere.
pub(crate) fn initial_values<E: Env>(env: &E) -> ValueTable {
    let mut v = ValueTable::zeros_like_env(env);
    crate::util::pin_absorbing(env, &mut v);
    v
}

/// Returns `true` if `s` has a value to learn and an action.
pub(crate) fn is_updated<E: Env>(env: &E, s: State) -> bool {
    !env.is_absorbing(s) && !env.is_wall(s)
}
