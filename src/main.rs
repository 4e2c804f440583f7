use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use popmodel::scenario::ScenarioLoader;

#[derive(Debug, Parser)]
#[command(author, version, about = "Annual birth, death and aging microsimulation")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/bristol.yaml")]
    scenario: PathBuf,

    /// Override the random seed (uses scenario seed when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Override the number of simulated years
    #[arg(long)]
    years: Option<u32>,

    /// Override the output path (.csv or .json)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let mut scenario = loader.load(&cli.scenario)?;
    if let Some(years) = cli.years {
        scenario = scenario.with_years(years)?;
    }
    if let Some(seed) = cli.seed {
        scenario.seed = seed;
    }
    if let Some(output) = cli.output {
        scenario.output = output;
    }

    let mut engine = loader.build_engine(&scenario)?;
    info!(
        "Scenario '{}' starting with {} persons, seed {}",
        scenario.name,
        engine.world().total_population(),
        scenario.seed
    );
    let table = engine.run()?;
    info!(
        "Scenario '{}' completed after {} years. Final population: {} ({} pyramid rows)",
        scenario.name,
        engine.current_tick(),
        engine.world().total_population(),
        table.len()
    );
    Ok(())
}
