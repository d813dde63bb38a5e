//! TRPO agent.
use super::TrpoConfig;
use crate::util::{mean_return, policy_gradient, EVAL_MAX_SWEEPS, EVAL_TOLERANCE};
use anyhow::Result;
use log::{debug, trace};
use ndarray::Zip;
use rand::Rng;
use tabrl_core::{
    record::{Record, RecordValue},
    softmax, ActionSelection, Agent, Env, Solution, SoftmaxPolicy, StateActionTable, Trajectory,
};

/// Probabilities at or below this value are left out of the KL divergence.
const KL_PROB_FLOOR: f64 = 1e-8;

/// Diagonal Fisher information of the taken state-action pairs.
///
/// Each occurrence of `(s, a)` in the batch adds `1 / (pi(a|s) + 1e-8)`; pairs
/// never taken stay at zero.
pub fn fisher_diagonal(policy: &SoftmaxPolicy, trajectories: &[Trajectory]) -> StateActionTable {
    let mut fisher = policy.logits().zeros_like();
    for step in trajectories.iter().flat_map(|tr| tr.steps.iter()) {
        let p = policy.prob(step.state, step.action);
        fisher[(step.state.0, step.state.1, step.action)] += 1.0 / (p + 1e-8);
    }
    fisher
}

/// `grad / (fisher + damping)` where the Fisher information is positive, zero elsewhere.
pub fn natural_gradient(
    grad: &StateActionTable,
    fisher: &StateActionTable,
    damping: f64,
) -> StateActionTable {
    let mut ngrad = grad.zeros_like();
    Zip::from(ngrad.as_array_mut())
        .and(grad.as_array())
        .and(fisher.as_array())
        .for_each(|n, &g, &f| {
            if f > 1e-8 {
                *n = g / (f + damping);
            }
        });
    ngrad
}

/// Mean KL divergence between the sampling-time policy and the policy moved by
/// `step * ngrad`, over the taken actions of the batch.
///
/// Each step contributes `old * ln(old / new)` where `old` is the recorded
/// probability of the taken action. Steps where either probability is at most
/// `1e-8` are skipped. Returns zero when every step is skipped.
pub fn kl_divergence(
    policy: &SoftmaxPolicy,
    trajectories: &[Trajectory],
    ngrad: &StateActionTable,
    step: f64,
) -> f64 {
    let mut kl = 0.0;
    let mut count = 0;
    for s in trajectories.iter().flat_map(|tr| tr.steps.iter()) {
        let mut logits = policy.logits().row(s.state).to_owned();
        logits.scaled_add(step, &ngrad.row(s.state));
        let new = softmax(&logits)[s.action];
        let old = s.prob;
        if old > KL_PROB_FLOOR && new > KL_PROB_FLOOR {
            kl += old * (old / new).ln();
            count += 1;
        }
    }
    if count > 0 {
        kl / count as f64
    } else {
        0.0
    }
}

/// Result of [`line_search`].
#[derive(Debug, Clone, PartialEq)]
pub struct LineSearch {
    /// The step size to apply.
    pub step_size: f64,

    /// Number of candidates evaluated.
    pub n_candidates: usize,

    /// KL divergence at `step_size`.
    pub kl: f64,

    /// `false` if no candidate satisfied the constraint.
    pub accepted: bool,
}

/// Backtracking line search on the KL constraint.
///
/// Candidates start at `initial_step` and are multiplied by `ratio` after each
/// rejection. The first candidate with `KL <= max_kl` is taken. If all
/// `max_backtracks` candidates are rejected, the step after the last reduction,
/// `initial_step * ratio^max_backtracks`, is returned anyway.
pub fn line_search(
    policy: &SoftmaxPolicy,
    trajectories: &[Trajectory],
    ngrad: &StateActionTable,
    max_kl: f64,
    initial_step: f64,
    ratio: f64,
    max_backtracks: usize,
) -> LineSearch {
    let mut step = initial_step;
    for i in 0..max_backtracks {
        let kl = kl_divergence(policy, trajectories, ngrad, step);
        trace!("Line search candidate {}: step = {:e}, kl = {:e}", i, step, kl);
        if kl <= max_kl {
            return LineSearch {
                step_size: step,
                n_candidates: i + 1,
                kl,
                accepted: true,
            };
        }
        step *= ratio;
    }
    LineSearch {
        step_size: step,
        n_candidates: max_backtracks,
        kl: kl_divergence(policy, trajectories, ngrad, step),
        accepted: false,
    }
}

/// TRPO agent with a tabular softmax policy.
pub struct Trpo {
    policy: SoftmaxPolicy,
    config: TrpoConfig,
    trajectories: Vec<Trajectory>,
    n_opts: usize,
}

impl Trpo {
    /// Constructs the agent with a uniform policy over the actions of `env`.
    pub fn build<E: Env>(config: TrpoConfig, env: &E) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            policy: SoftmaxPolicy::uniform(env),
            trajectories: Vec::with_capacity(config.episodes_per_update),
            config,
            n_opts: 0,
        })
    }

    fn opt_(&mut self) -> Record {
        let grad = policy_gradient(&self.policy, &self.trajectories);
        let fisher = fisher_diagonal(&self.policy, &self.trajectories);
        let ngrad = natural_gradient(&grad, &fisher, self.config.damping);
        let search = line_search(
            &self.policy,
            &self.trajectories,
            &ngrad,
            self.config.max_kl,
            self.config.initial_step,
            self.config.backtrack_ratio,
            self.config.max_backtracks,
        );
        self.policy.apply(&ngrad, search.step_size);
        self.n_opts += 1;

        let mean_return = mean_return(&self.trajectories);
        debug!(
            "TRPO update {}: step {:e} after {} candidates (accepted: {}), kl {:e}",
            self.n_opts, search.step_size, search.n_candidates, search.accepted, search.kl
        );
        self.trajectories.clear();

        Record::from_slice(&[
            ("kl", RecordValue::Scalar(search.kl)),
            ("step_size", RecordValue::Scalar(search.step_size)),
            (
                "line_search_steps",
                RecordValue::Scalar(search.n_candidates as f64),
            ),
            (
                "accepted",
                RecordValue::Scalar(if search.accepted { 1.0 } else { 0.0 }),
            ),
            ("mean_return", RecordValue::Scalar(mean_return)),
        ])
    }
}

impl<E: Env> Agent<E> for Trpo {
    fn policy(&self) -> &SoftmaxPolicy {
        &self.policy
    }

    fn selection(&self) -> ActionSelection {
        ActionSelection::Stochastic
    }

    fn push_episode(&mut self, trajectory: Trajectory) -> Result<()> {
        self.trajectories.push(trajectory);
        Ok(())
    }

    fn opt_with_record<R: Rng>(&mut self, _rng: &mut R) -> Option<Record> {
        if self.trajectories.len() < self.config.episodes_per_update {
            None
        } else {
            Some(self.opt_())
        }
    }

    fn solution(&self, env: &E) -> Solution {
        Solution {
            values: self.policy.evaluate(env, EVAL_TOLERANCE, EVAL_MAX_SWEEPS),
            policy: self.policy.greedy_policy(env),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::aview1;
    use rand::{rngs::StdRng, SeedableRng};
    use tabrl_core::TrajectoryStep;
    use tabrl_gridworld::{GridWorld, GridWorldConfig};

    fn batch(action: usize, prob: f64, total_return: f64) -> Vec<Trajectory> {
        vec![Trajectory {
            steps: vec![TrajectoryStep {
                state: (0, 0),
                action,
                reward: 0.0,
                prob,
                next_state: (0, 1),
            }],
            total_return,
            terminated: false,
        }]
    }

    #[test]
    fn test_natural_gradient_only_on_taken_pairs() {
        let policy = SoftmaxPolicy::new(1, 2, 4);
        let trs = batch(1, 0.25, 2.0);
        let grad = policy_gradient(&policy, &trs);
        let fisher = fisher_diagonal(&policy, &trs);
        assert!((fisher[(0, 0, 1)] - 1.0 / (0.25 + 1e-8)).abs() < 1e-9);
        assert_eq!(fisher[(0, 0, 0)], 0.0);

        let ngrad = natural_gradient(&grad, &fisher, 0.1);
        // grad of the taken pair is (1 - 0.25) * 2
        assert!((ngrad[(0, 0, 1)] - 1.5 / (fisher[(0, 0, 1)] + 0.1)).abs() < 1e-12);
        assert_eq!(ngrad[(0, 0, 0)], 0.0);
        assert_eq!(ngrad[(0, 0, 2)], 0.0);
        assert_eq!(ngrad.row((0, 1)), aview1(&[0.0; 4]));
    }

    #[test]
    fn test_kl_is_zero_without_step() {
        let policy = SoftmaxPolicy::new(1, 2, 4);
        let trs = batch(2, 0.25, 1.0);
        let mut ngrad = policy.logits().zeros_like();
        ngrad[(0, 0, 2)] = 3.0;
        assert!(kl_divergence(&policy, &trs, &ngrad, 0.0).abs() < 1e-12);
        // moving probability away from the taken action is penalized
        assert!(kl_divergence(&policy, &trs, &ngrad, -1.0) > 0.0);
    }

    #[test]
    fn test_line_search_accepts_first_step() {
        let policy = SoftmaxPolicy::new(1, 2, 4);
        let trs = batch(2, 0.25, 1.0);
        let ngrad = policy.logits().zeros_like();
        let search = line_search(&policy, &trs, &ngrad, 0.01, 1.0, 0.5, 10);
        assert_eq!(search.step_size, 1.0);
        assert_eq!(search.n_candidates, 1);
        assert!(search.accepted);
    }

    #[test]
    fn test_line_search_fallback() {
        let policy = SoftmaxPolicy::new(1, 2, 4);
        let trs = batch(2, 0.25, 1.0);
        let mut ngrad = policy.logits().zeros_like();
        ngrad[(0, 0, 2)] = -10.0;

        // every candidate lowers the probability of the taken action, so its KL
        // term is positive and never below a zero limit
        let search = line_search(&policy, &trs, &ngrad, 0.0, 1.0, 0.5, 10);
        assert!(!search.accepted);
        assert_eq!(search.n_candidates, 10);
        assert_eq!(search.step_size, 0.5f64.powi(10));
        assert!(search.kl > 0.0);
    }

    #[test]
    fn test_opt_records_rejected_search() -> Result<()> {
        let env = GridWorld::build(&GridWorldConfig::default())?;
        let config = TrpoConfig::default()
            .episodes_per_update(1)
            .max_kl(0.0)
            .max_backtracks(2);
        let mut agent = Trpo::build(config, &env)?;
        let rng = &mut StdRng::seed_from_u64(0);

        // a negative return lowers the probability of the taken action, so every
        // candidate has a positive KL divergence
        let mut trs = batch(1, 0.25, -1.0);
        Agent::<GridWorld>::push_episode(&mut agent, trs.remove(0))?;
        let record = Agent::<GridWorld>::opt_with_record(&mut agent, rng).unwrap();
        assert_eq!(record.get_scalar("accepted")?, 0.0);
        assert_eq!(record.get_scalar("line_search_steps")?, 2.0);
        assert_eq!(record.get_scalar("step_size")?, 0.25);
        Ok(())
    }

    #[test]
    fn test_opt_records() -> Result<()> {
        let env = GridWorld::build(&GridWorldConfig::default())?;
        let config = TrpoConfig::default().episodes_per_update(1);
        let mut agent = Trpo::build(config, &env)?;
        let rng = &mut StdRng::seed_from_u64(0);

        let mut trs = batch(1, 0.25, 1.0);
        Agent::<GridWorld>::push_episode(&mut agent, trs.remove(0))?;
        let record = Agent::<GridWorld>::opt_with_record(&mut agent, rng).unwrap();
        assert!(record.get_scalar("kl")? <= 0.01);
        assert!(record.get_scalar("step_size")? > 0.0);
        assert!(record.get_scalar("line_search_steps")? >= 1.0);
        assert_eq!(record.get_scalar("accepted")?, 1.0);
        assert_eq!(record.get_scalar("mean_return")?, 1.0);
        assert!(agent.policy.prob((0, 0), 1) > 0.25);
        Ok(())
    }
}
