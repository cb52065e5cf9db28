use puzzle_search::board::State;
use puzzle_search::common::{verify_path, Path};
use puzzle_search::config::{Cli, Config};
use puzzle_search::scenario::{Instance, Scenario};
use puzzle_search::solver::build;
use puzzle_search::stat::Stats;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct Record {
    solver: String,
    start: State,
    goal: State,
    verified: bool,
    path: Option<Path>,
    stats: Stats,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = if let Some(config_file) = cli.config.as_ref() {
        let config_str = std::fs::read_to_string(config_file)
            .with_context(|| format!("error reading config file: {config_file}"))?;
        Config::from_yaml_str(&config_str)
            .with_context(|| format!("error with config file: {config_file}"))?
    } else {
        info!("No config file specified, using default config");
        Config::default()
    }
    .override_from_command_line(&cli)?;

    if let Some(count) = cli.generate {
        let scenario_path = config
            .scenario_path
            .as_deref()
            .context("--generate needs --scenario-path to write to")?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let scenario = Scenario::generate(count, &config.goal, cli.scramble_depth, &mut rng);
        scenario.write_to_file(scenario_path)?;
        info!(
            "Wrote {} instances to {scenario_path}",
            scenario.instances.len()
        );
        return Ok(());
    }

    let instances = match config.scenario_path.as_deref() {
        Some(scenario_path) => Scenario::load_from_file(scenario_path)?.instances,
        None => vec![Instance {
            start: config.start.clone(),
            goal: config.goal.clone(),
        }],
    };

    // One solver for the whole batch, so a Q-learning agent keeps its table.
    let mut solver = build(&config);
    let mut records = Vec::with_capacity(instances.len());

    for instance in &instances {
        let path = solver.solve(&instance.start, &instance.goal);
        let verified = path.as_ref().map_or(false, |path| {
            verify_path(path, &instance.start, &instance.goal, config.moves)
        });

        match &path {
            Some(steps) if verified => {
                info!(
                    "{} solved {} in {} steps",
                    solver.name(),
                    instance.start,
                    steps.len() - 1
                );
                for (step, state) in steps.iter().enumerate() {
                    debug!("step {step}: {state}");
                }
            }
            Some(_) => error!(
                "{} returned an invalid path for {}",
                solver.name(),
                instance.start
            ),
            None => info!(
                "{} found no path from {} to {}",
                solver.name(),
                instance.start,
                instance.goal
            ),
        }

        records.push(Record {
            solver: solver.name().to_string(),
            start: instance.start.clone(),
            goal: instance.goal.clone(),
            verified,
            path,
            stats: solver.stats().clone(),
        });
    }

    if let Some(output_path) = config.output_path.as_deref() {
        let json = serde_json::to_string_pretty(&records)?;
        std::fs::write(output_path, json)
            .with_context(|| format!("error writing results to {output_path}"))?;
        info!("Wrote {} results to {output_path}", records.len());
    }

    Ok(())
}
