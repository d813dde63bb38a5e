//! Policy iteration.
use super::{initial_values, is_updated, q_value, q_values, DpConfig};
use anyhow::Result;
use log::{debug, info, warn};
use tabrl_core::{
    argmax,
    record::{AggregateRecorder, Record, RecordValue},
    Env, PolicyTable, Solution, Solver, ValueTable,
};

/// An action replaces the current one only if its value is larger by more than this.
const IMPROVEMENT_TOLERANCE: f64 = 1e-12;

/// Policy iteration.
///
/// Starting from the policy taking action 0 everywhere, alternates policy
/// evaluation and greedy improvement until no action changes.
#[derive(Debug, Clone)]
pub struct PolicyIteration {
    theta: f64,
    max_iterations: usize,
}

impl PolicyIteration {
    /// Constructs the solver.
    pub fn build(config: DpConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            theta: config.theta,
            max_iterations: config.max_iterations,
        })
    }

    /// Evaluates `policy` in place with synchronous sweeps.
    ///
    /// Returns the number of sweeps.
    pub fn evaluate<E: Env>(
        &self,
        env: &E,
        policy: &PolicyTable,
        v: &mut ValueTable,
        recorder: &mut dyn AggregateRecorder,
    ) -> usize {
        let mut n_sweeps = 0;
        loop {
            let mut v_new = v.clone();
            for s in env.states() {
                if let Some(a) = policy[s] {
                    v_new[s] = q_value(env, v, s, a);
                }
            }
            let delta = v_new.max_abs_diff(v);
            *v = v_new;
            n_sweeps += 1;
            recorder.store(Record::from_slice(&[
                ("sweep", RecordValue::Scalar(n_sweeps as f64)),
                ("delta", RecordValue::Scalar(delta)),
            ]));

            if delta < self.theta {
                break;
            }
            if n_sweeps >= self.max_iterations {
                warn!(
                    "Policy evaluation stopped after {} sweeps, delta = {:e}",
                    n_sweeps, delta
                );
                break;
            }
        }
        n_sweeps
    }

    /// Makes `policy` greedy with respect to `v`.
    ///
    /// Returns the number of cells whose action changed.
    pub fn improve<E: Env>(env: &E, policy: &mut PolicyTable, v: &ValueTable) -> usize {
        let mut n_changes = 0;
        for s in env.states().into_iter().filter(|&s| is_updated(env, s)) {
            let q = q_values(env, v, s);
            let best = argmax(&q);
            match policy[s] {
                Some(a) if q[best] <= q[a] + IMPROVEMENT_TOLERANCE => {}
                _ => {
                    policy[s] = Some(best);
                    n_changes += 1;
                }
            }
        }
        n_changes
    }

    fn initial_policy<E: Env>(env: &E) -> PolicyTable {
        let mut policy = PolicyTable::empty(env.n_rows(), env.n_cols());
        for s in env.states().into_iter().filter(|&s| is_updated(env, s)) {
            policy[s] = Some(0);
        }
        policy
    }
}

impl<E: Env> Solver<E> for PolicyIteration {
    fn solve(&mut self, env: &E, recorder: &mut dyn AggregateRecorder) -> Result<Solution> {
        info!("Starts policy iteration with theta = {}", self.theta);
        let mut v = initial_values(env);
        let mut policy = Self::initial_policy(env);
        let mut n_iterations = 0;

        loop {
            let n_sweeps = self.evaluate(env, &policy, &mut v, recorder);
            let n_changes = Self::improve(env, &mut policy, &v);
            n_iterations += 1;
            debug!(
                "Iteration {}: {} evaluation sweeps, {} policy changes",
                n_iterations, n_sweeps, n_changes
            );
            recorder.store(Record::from_slice(&[
                ("iteration", RecordValue::Scalar(n_iterations as f64)),
                ("policy_changes", RecordValue::Scalar(n_changes as f64)),
            ]));
            recorder.flush(n_iterations as _);

            if n_changes == 0 {
                info!("Policy iteration converged after {} iterations", n_iterations);
                break;
            }
            if n_iterations >= self.max_iterations {
                warn!(
                    "Policy iteration stopped after {} iterations with {} changes in the last one",
                    n_iterations, n_changes
                );
                break;
            }
        }

        Ok(Solution { values: v, policy })
    }
}
