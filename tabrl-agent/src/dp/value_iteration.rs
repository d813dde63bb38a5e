//! Value iteration.
use super::{initial_values, is_updated, q_values, DpConfig};
use anyhow::Result;
use log::{debug, info, warn};
use tabrl_core::{
    argmax,
    record::{AggregateRecorder, Record, RecordValue},
    Env, PolicyTable, Solution, Solver, ValueTable,
};

/// Value iteration.
///
/// Repeats `V(s) <- max_a [reward(s') + gamma * V(s')]` until the largest change of
/// a sweep is below `theta`, then takes the greedy action of every cell.
#[derive(Debug, Clone)]
pub struct ValueIteration {
    theta: f64,
    max_iterations: usize,
}

impl ValueIteration {
    /// Constructs the solver.
    pub fn build(config: DpConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            theta: config.theta,
            max_iterations: config.max_iterations,
        })
    }

    /// Performs a sweep and returns the new values with the largest change.
    pub fn sweep<E: Env>(&self, env: &E, v: &ValueTable) -> (ValueTable, f64) {
        let mut v_new = v.clone();
        for s in env.states().into_iter().filter(|&s| is_updated(env, s)) {
            let q = q_values(env, v, s);
            v_new[s] = q[argmax(&q)];
        }
        let delta = v_new.max_abs_diff(v);
        (v_new, delta)
    }

    /// Greedy policy with respect to `v`; the lowest action index wins ties.
    pub fn extract_policy<E: Env>(env: &E, v: &ValueTable) -> PolicyTable {
        let mut policy = PolicyTable::empty(env.n_rows(), env.n_cols());
        for s in env.states().into_iter().filter(|&s| is_updated(env, s)) {
            policy[s] = Some(argmax(&q_values(env, v, s)));
        }
        policy
    }
}

impl<E: Env> Solver<E> for ValueIteration {
    fn solve(&mut self, env: &E, recorder: &mut dyn AggregateRecorder) -> Result<Solution> {
        info!("Starts value iteration with theta = {}", self.theta);
        let mut v = initial_values(env);
        let mut n_sweeps = 0;

        loop {
            let (v_new, delta) = self.sweep(env, &v);
            v = v_new;
            n_sweeps += 1;
            debug!("Sweep {}: delta = {:e}", n_sweeps, delta);
            recorder.store(Record::from_slice(&[
                ("sweep", RecordValue::Scalar(n_sweeps as f64)),
                ("delta", RecordValue::Scalar(delta)),
            ]));

            if delta < self.theta {
                info!("Value iteration converged after {} sweeps", n_sweeps);
                break;
            }
            if n_sweeps >= self.max_iterations {
                warn!(
                    "Value iteration stopped after {} sweeps, delta = {:e}",
                    n_sweeps, delta
                );
                break;
            }
        }
        recorder.flush(n_sweeps as _);

        let policy = Self::extract_policy(env, &v);
        Ok(Solution { values: v, policy })
    }
}
