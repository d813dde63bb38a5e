//! DDPG agent.
use super::{Actor, Critic, DdpgConfig};
use crate::util::pin_absorbing;
use anyhow::Result;
use log::{debug, warn};
use rand::Rng;
use tabrl_core::{
    record::{Record, RecordValue},
    replay_buffer::SimpleReplayBuffer,
    ActionSelection, Agent, Env, Experience, ExperienceBufferBase, ReplayBufferBase, Solution,
    SoftmaxPolicy, Trajectory, ValueTable,
};

/// DDPG-style actor-critic with experience replay.
///
/// An optimization step samples a batch from the replay buffer, updates the critic
/// on the whole batch, then the actor on each sampled transition with the updated
/// action values, and finally soft-updates both target tables.
pub struct Ddpg {
    actor: Actor,
    critic: Critic,
    buffer: SimpleReplayBuffer<Experience>,
    batch_size: usize,
    actor_lr: f64,
    critic_lr: f64,
    tau: f64,
    epsilon: f64,
    discount_factor: f64,
    n_opts: usize,
}

impl Ddpg {
    /// Constructs the agent for the shape and discount factor of `env`.
    pub fn build<E: Env>(config: DdpgConfig, env: &E) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            actor: Actor::new(env),
            critic: Critic::new(env),
            buffer: SimpleReplayBuffer::build(&config.replay_buffer),
            batch_size: config.batch_size,
            actor_lr: config.actor_lr,
            critic_lr: config.critic_lr,
            tau: config.tau,
            epsilon: config.epsilon,
            discount_factor: env.discount_factor(),
            n_opts: 0,
        })
    }

    /// The actor.
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// The critic.
    pub fn critic(&self) -> &Critic {
        &self.critic
    }

    /// The replay buffer.
    pub fn buffer(&self) -> &SimpleReplayBuffer<Experience> {
        &self.buffer
    }

    fn opt_<R: Rng>(&mut self, rng: &mut R) -> Result<Record> {
        let batch = self.buffer.batch(self.batch_size, rng)?;
        let td_error = self
            .critic
            .update(&batch, self.critic_lr, self.discount_factor);

        for exp in batch.iter() {
            self.actor
                .update(exp, self.critic.q().row(exp.state), self.actor_lr);
        }

        self.actor.track(self.tau);
        self.critic.track(self.tau);
        self.n_opts += 1;

        let mean_q = batch
            .iter()
            .map(|exp| self.critic.q()[(exp.state.0, exp.state.1, exp.action)])
            .sum::<f64>()
            / batch.len().max(1) as f64;
        debug!(
            "DDPG update {}: td error {:.4}, mean q {:.4}",
            self.n_opts, td_error, mean_q
        );

        Ok(Record::from_slice(&[
            ("critic_td_error", RecordValue::Scalar(td_error)),
            ("mean_q", RecordValue::Scalar(mean_q)),
            ("buffer_len", RecordValue::Scalar(self.buffer.len() as f64)),
        ]))
    }
}

impl<E: Env> Agent<E> for Ddpg {
    fn policy(&self) -> &SoftmaxPolicy {
        self.actor.policy()
    }

    fn selection(&self) -> ActionSelection {
        ActionSelection::EpsilonGreedy(self.epsilon)
    }

    fn push_episode(&mut self, trajectory: Trajectory) -> Result<()> {
        for exp in trajectory.experiences() {
            self.buffer.push(exp)?;
        }
        Ok(())
    }

    fn opt_with_record<R: Rng>(&mut self, rng: &mut R) -> Option<Record> {
        if self.buffer.len() < self.batch_size {
            return None;
        }
        match self.opt_(rng) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipped a DDPG update: {}", e);
                None
            }
        }
    }

    fn solution(&self, env: &E) -> Solution {
        let mut values = ValueTable::zeros_like_env(env);
        for s in env.states() {
            values[s] = self.critic.q().max(s);
        }
        pin_absorbing(env, &mut values);
        Solution {
            values,
            policy: self.actor.policy().greedy_policy(env),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::aview1;
    use rand::{rngs::StdRng, SeedableRng};
    use tabrl_core::TrajectoryStep;
    use tabrl_gridworld::{Action, GridWorld, GridWorldConfig};

    fn env() -> GridWorld {
        GridWorld::build(&GridWorldConfig::default()).unwrap()
    }

    #[test]
    fn test_critic_target() {
        let env = env();
        let mut critic = Critic::new(&env);
        let exp = Experience {
            state: (0, 1),
            action: Action::Right.index(),
            reward: 0.0,
            next_state: (0, 2),
            done: false,
        };
        let done = Experience {
            state: (0, 2),
            action: Action::Right.index(),
            reward: 1.0,
            next_state: (0, 3),
            done: true,
        };

        // the target table is still zero
        assert_eq!(critic.target(&exp, 0.9), 0.0);
        assert_eq!(critic.target(&done, 0.9), 1.0);

        critic.update(&[done], 0.5, 0.9);
        assert_eq!(critic.q()[(0, 2, 1)], 0.5);
        critic.track(1.0);
        assert_eq!(critic.q_tgt()[(0, 2, 1)], 0.5);
        assert!((critic.target(&exp, 0.9) - 0.45).abs() < 1e-12);
        // no bootstrapping on done, whatever the target table holds
        assert_eq!(critic.target(&done, 0.9), 1.0);
    }

    #[test]
    fn test_actor_update() {
        let env = env();
        let mut actor = Actor::new(&env);
        let exp = Experience {
            state: (2, 0),
            action: 0,
            reward: 0.0,
            next_state: (1, 0),
            done: false,
        };
        actor.update(&exp, aview1(&[1.0, 0.0, -1.0, 2.0]), 0.1);
        let row = actor.policy().logits().row((2, 0));
        let expected = [0.1 * 1.0 * 0.75, 0.0, 0.1 * -1.0 * -0.25, 0.1 * 2.0 * -0.25];
        for (x, y) in row.iter().zip(expected.iter()) {
            assert!((x - y).abs() < 1e-12);
        }

        actor.track(0.5);
        assert!((actor.logits_tgt()[(2, 0, 0)] - 0.5 * expected[0]).abs() < 1e-12);
    }

    #[test]
    fn test_optimization_waits_for_batch() -> Result<()> {
        let env = env();
        let config = DdpgConfig::default().batch_size(3).critic_lr(0.5);
        let mut agent = Ddpg::build(config, &env)?;
        let rng = &mut StdRng::seed_from_u64(0);
        assert_eq!(
            Agent::<GridWorld>::selection(&agent),
            ActionSelection::EpsilonGreedy(0.1)
        );

        let step = TrajectoryStep {
            state: (0, 2),
            action: Action::Right.index(),
            reward: 1.0,
            prob: 0.25,
            next_state: (0, 3),
        };
        let tr = Trajectory {
            steps: vec![step.clone(), step],
            total_return: 1.0,
            terminated: true,
        };

        Agent::<GridWorld>::push_episode(&mut agent, tr.clone())?;
        assert_eq!(agent.buffer().len(), 2);
        assert!(Agent::<GridWorld>::opt_with_record(&mut agent, rng).is_none());

        Agent::<GridWorld>::push_episode(&mut agent, tr)?;
        let record = Agent::<GridWorld>::opt_with_record(&mut agent, rng).unwrap();
        assert_eq!(record.get_scalar("buffer_len")?, 4.0);
        assert!(record.get_scalar("critic_td_error")? > 0.0);
        assert!(agent.critic().q()[(0, 2, 1)] > 0.0);

        let solution = agent.solution(&env);
        assert_eq!(solution.values[(0, 3)], 1.0);
        assert_eq!(solution.values[(2, 2)], -0.5);
        assert_eq!(solution.values[(1, 1)], 0.0);
        assert!(solution.values[(0, 2)] > 0.0);
        Ok(())
    }
}
