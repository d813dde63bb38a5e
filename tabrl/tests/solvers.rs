use anyhow::Result;
use tabrl::{solve, SolverKind, SolversConfig};
use tabrl_core::{
    record::{BufferedRecorder, NullRecorder},
    CellKind, Env, TrainerConfig,
};
use tabrl_gridworld::{Action, GridWorld, GridWorldConfig};

fn env() -> Result<GridWorld> {
    GridWorld::build(&GridWorldConfig::default())
}

fn config(n_episodes: usize, seed: u64) -> SolversConfig {
    SolversConfig::default().trainer(
        TrainerConfig::default()
            .n_episodes(n_episodes)
            .max_steps(100)
            .seed(seed),
    )
}

#[test]
fn test_value_iteration_on_canonical_grid() -> Result<()> {
    let env = env()?;
    let solution = solve(
        SolverKind::ValueIteration,
        &env,
        &config(0, 0),
        &mut NullRecorder::new(),
    )?;
    assert_eq!(solution.values[(0, 3)], 1.0);
    assert_eq!(solution.values[(1, 3)], -1.0);
    assert_eq!(solution.policy[(0, 2)], Some(Action::Right.index()));
    Ok(())
}

#[test]
fn test_every_solver_returns_full_tables() -> Result<()> {
    let env = env()?;
    let config = config(200, 1);

    for kind in SolverKind::ALL {
        let mut recorder = BufferedRecorder::new();
        let solution = solve(kind, &env, &config, &mut recorder)?;
        assert_eq!(solution.values.shape(), (3, 4), "{}", kind);
        assert_eq!(solution.policy.shape(), (3, 4), "{}", kind);

        let summary = recorder.iter().last().unwrap();
        assert_eq!(summary.get_string("solver")?, kind.name());
        let (values, shape) = summary.get_array2("values")?;
        assert_eq!(shape, [3, 4]);
        assert_eq!(values[3], solution.values[(0, 3)]);
        assert_eq!(values[2 * 4 + 1], solution.values[(2, 1)]);

        for s in env.states() {
            let v = solution.values[s];
            assert!(v.is_finite(), "{}: V{:?} = {}", kind, s, v);
            match env.kind(s) {
                CellKind::Terminal | CellKind::Forbidden => {
                    assert_eq!(v, env.reward(s), "{}", kind);
                    assert_eq!(solution.policy[s], None, "{}", kind);
                }
                CellKind::Wall => {
                    assert_eq!(v, 0.0, "{}", kind);
                    assert_eq!(solution.policy[s], None, "{}", kind);
                }
                CellKind::Normal => {
                    let a = solution.policy[s];
                    assert!(matches!(a, Some(a) if a < env.n_actions()), "{}", kind);
                }
            }
        }
        assert!(!recorder.is_empty(), "{} recorded nothing", kind);
    }
    Ok(())
}

#[test]
fn test_seeded_training_is_reproducible() -> Result<()> {
    let env = env()?;
    let config = config(100, 7);

    for kind in [
        SolverKind::Reinforce,
        SolverKind::Trpo,
        SolverKind::Ppo,
        SolverKind::Ddpg,
    ] {
        let s1 = solve(kind, &env, &config, &mut NullRecorder::new())?;
        let s2 = solve(kind, &env, &config, &mut NullRecorder::new())?;
        assert_eq!(s1, s2, "{}", kind);
    }
    Ok(())
}

#[test]
fn test_records_of_sampling_solvers() -> Result<()> {
    let env = env()?;
    let config = config(60, 3);
    let expected = [
        (SolverKind::Reinforce, vec!["mean_return"]),
        (
            SolverKind::Trpo,
            vec!["kl", "step_size", "line_search_steps", "accepted", "mean_return"],
        ),
        (SolverKind::Ppo, vec!["clip_fraction", "mean_advantage", "mean_return"]),
        (SolverKind::Ddpg, vec!["critic_td_error", "mean_q", "buffer_len"]),
    ];

    for (kind, keys) in expected.iter() {
        let mut recorder = BufferedRecorder::new();
        solve(*kind, &env, &config, &mut recorder)?;
        // one record per episode and the summary
        assert_eq!(recorder.len(), 61);
        assert_eq!(recorder.scalars("episode_return").len(), 60);
        for key in keys.iter() {
            assert!(
                !recorder.scalars(key).is_empty(),
                "{} did not record {}",
                kind,
                key
            );
        }
    }

    // TRPO never exceeds the KL limit when a candidate is accepted
    let mut recorder = BufferedRecorder::new();
    solve(SolverKind::Trpo, &env, &config, &mut recorder)?;
    let accepted = recorder.scalars("accepted");
    assert!(!accepted.is_empty());
    for (kl, a) in recorder.scalars("kl").iter().zip(accepted.iter()) {
        assert!(*a == 0.0 || *a == 1.0);
        if *a == 1.0 {
            assert!(*kl <= 0.01);
        }
    }
    Ok(())
}

#[test]
fn test_policy_iteration_matches_value_iteration_on_larger_grid() -> Result<()> {
    let env = GridWorld::build(
        &GridWorldConfig::empty(4, 5)
            .cell(0, 4, CellKind::Terminal, 1.0)
            .cell(3, 0, CellKind::Terminal, 0.5)
            .cell(1, 1, CellKind::Wall, 0.0)
            .cell(1, 2, CellKind::Wall, 0.0)
            .cell(2, 3, CellKind::Forbidden, -1.0)
            .stay_action(true),
    )?;
    let config = SolversConfig::default().dp(tabrl_agent::dp::DpConfig::default().theta(1e-9));

    let vi = solve(SolverKind::ValueIteration, &env, &config, &mut NullRecorder::new())?;
    let pi = solve(SolverKind::PolicyIteration, &env, &config, &mut NullRecorder::new())?;
    assert!(vi.values.max_abs_diff(&pi.values) < 1e-5);
    Ok(())
}
