use emsim::{RunSummary, Scenario, ScenarioConfig};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};
use log::info;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Charged particle tracking in electric and magnetic fields")]
struct Args {
    /// Scenario file; looked up under scenarios/ when not found as given
    #[arg(short, default_value = "cyclotron_bunch.yaml")]
    file_name: String,

    /// Override the RNG seed from the scenario
    #[arg(long)]
    seed: Option<u64>,
}

// load here to keep main clean
fn load_scenario_from_yaml(args: &Args) -> Result<ScenarioConfig> {
    let given = PathBuf::from(&args.file_name);
    let config_path = if given.exists() {
        given
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(&args.file_name)
    };

    let mut scenario_cfg = ScenarioConfig::from_yaml_file(&config_path)
        .with_context(|| format!("failed to load scenario {}", config_path.display()))?;
    if let Some(seed) = args.seed {
        scenario_cfg.parameters.seed = seed;
    }
    Ok(scenario_cfg)
}

fn log_summary(summary: &RunSummary) {
    info!("Stopped after {} steps ({:?})", summary.steps, summary.stop_reason);
    info!("Number of revolutions: {}", summary.revolutions);
    info!("Final bunch position (m):   {}", summary.final_position.fixed_width());
    info!("Final bunch velocity (m/s): {}", summary.final_velocity.fixed_width());

    if let Some(reference) = summary.reference {
        info!("Calculated period:          {:10.6} s", reference.period());
        info!("Calculated orbit radius:    {:10.6} m", reference.radius(summary.initial_speed));
    }
    if let Some(period) = summary.simulated_period() {
        info!("Simulated period:           {:10.6} s", period);
    }
    if let Some(diff) = summary.period_fractional_difference() {
        info!("Fractional difference:      {:10.6}", diff);
    }
}

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let scenario_cfg = load_scenario_from_yaml(&args)?;

    let mut scenario = Scenario::build_scenario(scenario_cfg)?;
    let summary = scenario.run()?;
    log_summary(&summary);

    Ok(())
}
