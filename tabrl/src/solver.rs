//! Selection and execution of a solver.
use crate::SolversConfig;
use anyhow::{anyhow, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tabrl_agent::{
    ddpg::Ddpg,
    dp::{PolicyIteration, ValueIteration},
    ppo::Ppo,
    reinforce::Reinforce,
    trpo::Trpo,
};
use tabrl_core::{
    record::{AggregateRecorder, Record, RecordValue},
    Env, Solution, Solver, Trainer,
};

/// The available solvers.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
pub enum SolverKind {
    /// [`ValueIteration`].
    ValueIteration,

    /// [`PolicyIteration`].
    PolicyIteration,

    /// [`Reinforce`].
    Reinforce,

    /// [`Trpo`].
    Trpo,

    /// [`Ppo`].
    Ppo,

    /// [`Ddpg`].
    Ddpg,
}

impl SolverKind {
    /// All solvers, exact ones first.
    pub const ALL: [SolverKind; 6] = [
        SolverKind::ValueIteration,
        SolverKind::PolicyIteration,
        SolverKind::Reinforce,
        SolverKind::Trpo,
        SolverKind::Ppo,
        SolverKind::Ddpg,
    ];

    /// Short name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            SolverKind::ValueIteration => "vi",
            SolverKind::PolicyIteration => "pi",
            SolverKind::Reinforce => "reinforce",
            SolverKind::Trpo => "trpo",
            SolverKind::Ppo => "ppo",
            SolverKind::Ddpg => "ddpg",
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SolverKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        SolverKind::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s.to_lowercase())
            .ok_or_else(|| anyhow!("Unknown solver: {}", s))
    }
}

/// Runs a solver on `env`.
///
/// Exact solvers are built from `config.dp`; sampling solvers are built from their
/// own section and trained with `config.trainer`. Once done, a record holding the
/// solver name and the value table is written to `recorder`.
pub fn solve<E: Env>(
    kind: SolverKind,
    env: &E,
    config: &SolversConfig,
    recorder: &mut dyn AggregateRecorder,
) -> Result<Solution> {
    info!("Running {}", kind);
    let solution = match kind {
        SolverKind::ValueIteration => ValueIteration::build(config.dp.clone())?.solve(env, recorder),
        SolverKind::PolicyIteration => {
            PolicyIteration::build(config.dp.clone())?.solve(env, recorder)
        }
        SolverKind::Reinforce => {
            let mut agent = Reinforce::build(config.reinforce.clone(), env)?;
            Trainer::build(config.trainer.clone())?.train(env, &mut agent, recorder)
        }
        SolverKind::Trpo => {
            let mut agent = Trpo::build(config.trpo.clone(), env)?;
            Trainer::build(config.trainer.clone())?.train(env, &mut agent, recorder)
        }
        SolverKind::Ppo => {
            let mut agent = Ppo::build(config.ppo.clone(), env)?;
            Trainer::build(config.trainer.clone())?.train(env, &mut agent, recorder)
        }
        SolverKind::Ddpg => {
            let mut agent = Ddpg::build(config.ddpg.clone(), env)?;
            Trainer::build(config.trainer.clone())?.train(env, &mut agent, recorder)
        }
    }?;

    let (n_rows, n_cols) = solution.values.shape();
    recorder.write(Record::from_slice(&[
        ("solver", RecordValue::String(kind.name().to_string())),
        (
            "values",
            RecordValue::Array2(
                solution.values.as_array().iter().cloned().collect(),
                [n_rows, n_cols],
            ),
        ),
    ]));
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() -> Result<()> {
        for kind in SolverKind::ALL {
            assert_eq!(kind.name().parse::<SolverKind>()?, kind);
        }
        assert_eq!("PPO".parse::<SolverKind>()?, SolverKind::Ppo);
        assert!("sarsa".parse::<SolverKind>().is_err());
        Ok(())
    }
}
