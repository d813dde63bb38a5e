use anyhow::Result;
use clap::Parser;
use tabrl::{solve, SolverKind, SolversConfig};
use tabrl_core::record::LogRecorder;
use tabrl_gridworld::{GridWorld, GridWorldConfig};

/// Solve a grid world with tabular RL solvers and print the results
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Solver to run (vi, pi, reinforce, trpo, ppo, ddpg), all when omitted
    #[arg(long)]
    solver: Option<SolverKind>,

    /// Number of training episodes of the sampling solvers
    #[arg(long)]
    episodes: Option<usize>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// YAML file of solver parameters
    #[arg(long)]
    config: Option<String>,

    /// YAML file of the grid layout, the 3x4 reference grid when omitted
    #[arg(long)]
    grid: Option<String>,
}

fn load_config(args: &Args) -> Result<SolversConfig> {
    let mut config = match &args.config {
        Some(path) => SolversConfig::load(path)?,
        None => SolversConfig::default(),
    };
    if let Some(n) = args.episodes {
        config.trainer = config.trainer.n_episodes(n);
    }
    if let Some(seed) = args.seed {
        config.trainer = config.trainer.seed(seed);
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let env = match &args.grid {
        Some(path) => GridWorld::build(&GridWorldConfig::load(path)?)?,
        None => GridWorld::build(&GridWorldConfig::default())?,
    };
    let kinds = match args.solver {
        Some(kind) => vec![kind],
        None => SolverKind::ALL.to_vec(),
    };

    for kind in kinds {
        let mut recorder = LogRecorder::new(kind.name());
        let solution = solve(kind, &env, &config, &mut recorder)?;
        println!("== {} ==", kind);
        println!("{}", env.render_values(&solution.values));
        println!("{}", env.render_policy(&solution.policy));
    }

    Ok(())
}
