//! PPO agent.
use super::{PpoConfig, ValueFunction};
use crate::util::{add_score, pin_absorbing};
use anyhow::Result;
use log::debug;
use ndarray::Array1;
use rand::Rng;
use tabrl_core::{
    record::{Record, RecordValue},
    ActionSelection, Agent, Env, Solution, SoftmaxPolicy, Trajectory, TrajectoryStep,
};

/// An episode with the advantage of each step.
#[derive(Debug, Clone)]
pub struct PpoEpisode {
    /// Steps with their sampling-time probabilities.
    pub steps: Vec<TrajectoryStep>,

    /// Advantage of each step.
    pub advantages: Vec<f64>,

    /// Discounted return of the episode.
    pub total_return: f64,
}

impl PpoEpisode {
    /// Computes advantages with the current value estimates.
    ///
    /// Starting from the discounted return of the episode, the advantage of step `t`
    /// is `running - V(s_t)`, after which the reward of step `t` is subtracted
    /// from `running`.
    pub fn new(trajectory: Trajectory, value: &ValueFunction) -> Self {
        let mut running = trajectory.total_return;
        let advantages = trajectory
            .steps
            .iter()
            .map(|step| {
                let adv = running - value.get(step.state);
                running -= step.reward;
                adv
            })
            .collect();
        Self {
            steps: trajectory.steps,
            advantages,
            total_return: trajectory.total_return,
        }
    }
}

/// Contribution of a step to the clipped surrogate gradient.
///
/// With `ratio = probs[action] / (old_prob + 1e-8)`, returns
/// `(e_action - probs) * advantage` if `ratio` lies in
/// `[1 - epsilon, 1 + epsilon]` and zeros otherwise.
pub fn gated_score(
    probs: &Array1<f64>,
    action: usize,
    old_prob: f64,
    advantage: f64,
    epsilon: f64,
) -> Array1<f64> {
    let ratio = probs[action] / (old_prob + 1e-8);
    if ratio < 1.0 - epsilon || ratio > 1.0 + epsilon {
        return Array1::zeros(probs.len());
    }
    let mut score = probs.mapv(|p| -p * advantage);
    score[action] += advantage;
    score
}

/// PPO agent with a tabular softmax policy and a state-value table.
pub struct Ppo {
    policy: SoftmaxPolicy,
    value: ValueFunction,
    config: PpoConfig,
    episodes: Vec<PpoEpisode>,
    n_opts: usize,
}

impl Ppo {
    /// Constructs the agent with a uniform policy and zero values.
    pub fn build<E: Env>(config: PpoConfig, env: &E) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            policy: SoftmaxPolicy::uniform(env),
            value: ValueFunction::new(env),
            episodes: Vec::with_capacity(config.episodes_per_update),
            config,
            n_opts: 0,
        })
    }

    /// The value table.
    pub fn value(&self) -> &ValueFunction {
        &self.value
    }

    /// Performs an epoch over the batch and returns the fraction of gated steps.
    fn epoch(&mut self) -> f64 {
        let mut grad = self.policy.logits().zeros_like();
        let mut n_steps = 0;
        let mut n_clipped = 0;

        for ep in self.episodes.iter() {
            for (step, adv) in ep.steps.iter().zip(ep.advantages.iter()) {
                let probs = self.policy.probs(step.state);
                let score = gated_score(
                    &probs,
                    step.action,
                    step.prob,
                    *adv,
                    self.config.clip_epsilon,
                );
                n_steps += 1;
                if score.iter().all(|g| *g == 0.0) && *adv != 0.0 {
                    n_clipped += 1;
                }
                let mut row = grad.row_mut(step.state);
                row += &score;
            }
        }
        self.policy.apply(&grad, self.config.learning_rate);

        if n_steps > 0 {
            n_clipped as f64 / n_steps as f64
        } else {
            0.0
        }
    }

    fn opt_(&mut self) -> Record {
        self.value.update(&self.episodes, self.config.learning_rate);

        let mut clip_fraction = 0.0;
        for _ in 0..self.config.n_epochs {
            clip_fraction = self.epoch();
        }
        self.n_opts += 1;

        let n_steps: usize = self.episodes.iter().map(|ep| ep.steps.len()).sum();
        let mean_advantage = if n_steps > 0 {
            self.episodes
                .iter()
                .flat_map(|ep| ep.advantages.iter())
                .sum::<f64>()
                / n_steps as f64
        } else {
            0.0
        };
        let mean_return = self.episodes.iter().map(|ep| ep.total_return).sum::<f64>()
            / self.episodes.len() as f64;
        debug!(
            "PPO update {}: mean return {:.4}, clip fraction {:.3}",
            self.n_opts, mean_return, clip_fraction
        );
        self.episodes.clear();

        Record::from_slice(&[
            ("clip_fraction", RecordValue::Scalar(clip_fraction)),
            ("mean_advantage", RecordValue::Scalar(mean_advantage)),
            ("mean_return", RecordValue::Scalar(mean_return)),
        ])
    }
}

impl<E: Env> Agent<E> for Ppo {
    fn policy(&self) -> &SoftmaxPolicy {
        &self.policy
    }

    fn selection(&self) -> ActionSelection {
        ActionSelection::Stochastic
    }

    fn push_episode(&mut self, trajectory: Trajectory) -> Result<()> {
        let episode = PpoEpisode::new(trajectory, &self.value);
        self.episodes.push(episode);
        Ok(())
    }

    fn opt_with_record<R: Rng>(&mut self, _rng: &mut R) -> Option<Record> {
        if self.episodes.len() < self.config.episodes_per_update {
            None
        } else {
            Some(self.opt_())
        }
    }

    fn solution(&self, env: &E) -> Solution {
        let mut values = self.value.values().clone();
        pin_absorbing(env, &mut values);
        Solution {
            values,
            policy: self.policy.greedy_policy(env),
        }
    }
}
