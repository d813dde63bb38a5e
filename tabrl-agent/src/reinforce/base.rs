//! REINFORCE agent.
use super::ReinforceConfig;
use crate::util::{mean_return, policy_gradient, EVAL_MAX_SWEEPS, EVAL_TOLERANCE};
use anyhow::Result;
use log::debug;
use rand::Rng;
use tabrl_core::{
    record::{Record, RecordValue},
    ActionSelection, Agent, Env, Solution, SoftmaxPolicy, Trajectory,
};

/// Monte-Carlo policy gradient with a tabular softmax policy.
///
/// Every `episodes_per_update` episodes, the logits move along
/// `sum_t (e_a - pi(.|s_t)) * G`, where `G` is the discounted return of the whole
/// episode containing step `t`.
pub struct Reinforce {
    policy: SoftmaxPolicy,
    episodes_per_update: usize,
    learning_rate: f64,
    trajectories: Vec<Trajectory>,
    n_opts: usize,
}

impl Reinforce {
    /// Constructs the agent with a uniform policy over the actions of `env`.
    pub fn build<E: Env>(config: ReinforceConfig, env: &E) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            policy: SoftmaxPolicy::uniform(env),
            episodes_per_update: config.episodes_per_update,
            learning_rate: config.learning_rate,
            trajectories: Vec::with_capacity(config.episodes_per_update),
            n_opts: 0,
        })
    }

    fn opt_(&mut self) -> Record {
        let grad = policy_gradient(&self.policy, &self.trajectories);
        self.policy.apply(&grad, self.learning_rate);
        self.n_opts += 1;

        let mean_return = mean_return(&self.trajectories);
        let n_steps: usize = self.trajectories.iter().map(|tr| tr.len()).sum();
        debug!(
            "REINFORCE update {}: mean return {:.4} over {} steps",
            self.n_opts, mean_return, n_steps
        );
        self.trajectories.clear();

        Record::from_slice(&[
            ("mean_return", RecordValue::Scalar(mean_return)),
            ("batch_steps", RecordValue::Scalar(n_steps as f64)),
        ])
    }
}

impl<E: Env> Agent<E> for Reinforce {
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
        if self.trajectories.len() < self.episodes_per_update {
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
