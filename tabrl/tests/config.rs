use anyhow::Result;
use tabrl::SolversConfig;
use tabrl_agent::{dp::DpConfig, ppo::PpoConfig};
use tabrl_core::TrainerConfig;
use tabrl_gridworld::GridWorldConfig;
use tempdir::TempDir;

#[test]
fn test_serde_solvers_config() -> Result<()> {
    let mut config = SolversConfig::default()
        .trainer(TrainerConfig::default().n_episodes(500).seed(1))
        .dp(DpConfig::default().theta(1e-6));
    config.ppo = PpoConfig::default().clip_epsilon(0.1);

    let dir = TempDir::new("solvers_config")?;
    let path = dir.path().join("solvers.yaml");
    config.save(&path)?;
    assert_eq!(config, SolversConfig::load(&path)?);
    Ok(())
}

#[test]
fn test_partial_yaml_uses_defaults() -> Result<()> {
    let yaml = "---\ndp:\n  theta: 0.001\n  max_iterations: 10\n";
    let config: SolversConfig = serde_yaml::from_str(yaml)?;
    assert_eq!(config.dp, DpConfig::default().theta(0.001).max_iterations(10));
    assert_eq!(config.trainer, TrainerConfig::default());
    assert_eq!(config.ppo, PpoConfig::default());
    Ok(())
}

#[test]
fn test_grid_from_yaml() -> Result<()> {
    let yaml = r#"---
rows: 2
cols: 3
cells:
  - row: 0
    col: 2
    kind: Terminal
    reward: 1.0
  - row: 1
    col: 1
    kind: Wall
    reward: 0.0
stay_action: false
discount_factor: 0.8
"#;
    let config: GridWorldConfig = serde_yaml::from_str(yaml)?;
    assert_eq!(config.rows, 2);
    assert_eq!(config.cells.len(), 2);
    assert!(config.validate().is_ok());
    Ok(())
}
