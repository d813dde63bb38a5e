//! Train [`Agent`].
mod config;
use crate::{
    record::{AggregateRecorder, Record, RecordValue::Scalar},
    terminates_episode, Agent, Env, Rollout, RolloutConfig, Solution,
};
use anyhow::Result;
pub use config::TrainerConfig;
use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};

/// Manages the training loop of an [`Agent`].
///
/// # Training loop
///
/// 0. Given an environment implementing [`Env`], an agent implementing [`Agent`] and
///    a recorder implementing [`AggregateRecorder`].
/// 1. Seed a random number generator with `seed`. Reset a counter of the
///    optimization steps: `opt_steps = 0`.
/// 2. Roll out an episode with [`Agent::policy`] and [`Agent::selection`]. The
///    episode return and length are added to the record of the episode as
///    `"episode_return"` and `"episode_len"`.
/// 3. Hand over the trajectory with [`Agent::push_episode`].
/// 4. Call [`Agent::opt_with_record`]. The agent may skip the optimization step,
///    for example while a batch of episodes is being collected. Otherwise
///    `opt_steps += 1` and the returned record is merged into the episode record.
/// 5. Store the record. If an optimization step was done and
///    `opt_steps % flush_record_interval == 0`, flush the recorder.
/// 6. Back to step 2 until `n_episodes` episodes have been rolled out.
/// 7. Return [`Agent::solution`].
///
/// All randomness flows from the single seeded generator, so two runs with the
/// same configuration produce the same solution.
pub struct Trainer {
    /// The number of episodes.
    n_episodes: usize,

    /// Runs the episodes.
    rollout: Rollout,

    /// Random seed.
    seed: u64,

    /// Interval of flushing records in optimization steps.
    flush_record_interval: usize,
}

impl Trainer {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            n_episodes: config.n_episodes,
            rollout: Rollout::build(&RolloutConfig::default().max_steps(config.max_steps)),
            seed: config.seed,
            flush_record_interval: config.flush_record_interval,
        })
    }

    /// Trains the agent and returns its solution.
    pub fn train<E, A>(
        &mut self,
        env: &E,
        agent: &mut A,
        recorder: &mut dyn AggregateRecorder,
    ) -> Result<Solution>
    where
        E: Env,
        A: Agent<E>,
    {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut opt_steps: usize = 0;
        info!(
            "Starts training for {} episodes of at most {} steps",
            self.n_episodes,
            self.rollout.max_steps()
        );

        for episode in 0..self.n_episodes {
            let trajectory = self.rollout.run(
                env,
                agent.policy(),
                agent.selection(),
                terminates_episode,
                &mut rng,
            );
            let mut record = Record::from_slice(&[
                ("episode_return", Scalar(trajectory.total_return)),
                ("episode_len", Scalar(trajectory.len() as f64)),
            ]);
            agent.push_episode(trajectory)?;

            let is_opt = match agent.opt_with_record(&mut rng) {
                Some(record_agent) => {
                    opt_steps += 1;
                    debug!("Optimization step {} after episode {}", opt_steps, episode + 1);
                    record.merge_inplace(record_agent);
                    true
                }
                None => false,
            };

            recorder.store(record);

            if is_opt && opt_steps % self.flush_record_interval == 0 {
                recorder.flush(opt_steps as _);
            }
        }

        recorder.flush(opt_steps as _);
        info!(
            "Finished training: {} episodes, {} optimization steps",
            self.n_episodes, opt_steps
        );

        Ok(agent.solution(env))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        record::BufferedRecorder, ActionSelection, CellKind, PolicyTable, SoftmaxPolicy, State,
        Trajectory, ValueTable,
    };
    use rand::Rng;

    struct Line;

    impl Env for Line {
        fn n_rows(&self) -> usize {
            1
        }

        fn n_cols(&self) -> usize {
            2
        }

        fn n_actions(&self) -> usize {
            2
        }

        fn kind(&self, s: State) -> CellKind {
            if s == (0, 1) {
                CellKind::Terminal
            } else {
                CellKind::Normal
            }
        }

        fn reward(&self, s: State) -> f64 {
            if s == (0, 1) {
                1.0
            } else {
                0.0
            }
        }

        fn transition(&self, s: State, a: usize) -> State {
            if a == 1 {
                (0, 1)
            } else {
                s
            }
        }

        fn discount_factor(&self) -> f64 {
            0.9
        }
    }

    /// Counts episodes and optimizes every other one.
    struct CountingAgent {
        policy: SoftmaxPolicy,
        n_episodes: usize,
        draws: Vec<u32>,
    }

    impl Agent<Line> for CountingAgent {
        fn policy(&self) -> &SoftmaxPolicy {
            &self.policy
        }

        fn selection(&self) -> ActionSelection {
            ActionSelection::Stochastic
        }

        fn push_episode(&mut self, _trajectory: Trajectory) -> Result<()> {
            self.n_episodes += 1;
            Ok(())
        }

        fn opt_with_record<R: Rng>(&mut self, rng: &mut R) -> Option<Record> {
            if self.n_episodes % 2 == 0 {
                self.draws.push(rng.gen());
                Some(Record::from_scalar("n_episodes", self.n_episodes as f64))
            } else {
                None
            }
        }

        fn solution(&self, env: &Line) -> Solution {
            Solution {
                values: ValueTable::zeros_like_env(env),
                policy: PolicyTable::empty(env.n_rows(), env.n_cols()),
            }
        }
    }

    fn agent() -> CountingAgent {
        CountingAgent {
            policy: SoftmaxPolicy::uniform(&Line),
            n_episodes: 0,
            draws: vec![],
        }
    }

    #[test]
    fn test_train_loop() -> Result<()> {
        let config = TrainerConfig::default()
            .n_episodes(10)
            .max_steps(20)
            .flush_record_interval(2);
        let mut trainer = Trainer::build(config)?;
        let mut agent = agent();
        let mut recorder = BufferedRecorder::new();

        let solution = trainer.train(&Line, &mut agent, &mut recorder)?;
        assert_eq!(solution.values.shape(), (1, 2));
        assert_eq!(agent.n_episodes, 10);
        assert_eq!(recorder.len(), 10);
        assert_eq!(recorder.scalars("episode_return").len(), 10);
        assert_eq!(recorder.scalars("n_episodes"), vec![2.0, 4.0, 6.0, 8.0, 10.0]);
        // Flushed at optimization steps 2 and 4, and once at the end.
        assert_eq!(recorder.n_flushes(), 3);
        Ok(())
    }

    #[test]
    fn test_seeded_runs_are_reproducible() -> Result<()> {
        let config = TrainerConfig::default().n_episodes(20).seed(3);

        let mut a1 = agent();
        Trainer::build(config.clone())?.train(&Line, &mut a1, &mut BufferedRecorder::new())?;
        let mut a2 = agent();
        Trainer::build(config)?.train(&Line, &mut a2, &mut BufferedRecorder::new())?;
        assert_eq!(a1.draws, a2.draws);
        Ok(())
    }
}
