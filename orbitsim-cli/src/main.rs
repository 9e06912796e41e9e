mod viewer;

use clap::{Args, Parser, Subcommand};
use orbitsim_core::diagnostics::{format_parse_error, format_runtime_error};
use orbitsim_core::{parse_scenario, presets, run_parsed, RuntimeError, Scenario};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "orbitsim")]
#[command(about = "orbitsim - Newtonian orbits of a star and its planets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct ScenarioSource {
    /// Path to an .orbit scenario file
    #[arg(required_unless_present = "preset", conflicts_with = "preset")]
    file: Option<PathBuf>,

    /// Built-in scenario to use instead of a file (e.g. "solar")
    #[arg(long)]
    preset: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario headless and print distances to the reference body
    Run {
        #[command(flatten)]
        source: ScenarioSource,

        /// Override the number of steps
        #[arg(long)]
        steps: Option<u64>,

        /// Override the timestep in seconds
        #[arg(long)]
        dt: Option<f64>,
    },
    /// Open an interactive window
    View {
        #[command(flatten)]
        source: ScenarioSource,

        /// Override the number of steps before playback stops
        #[arg(long)]
        steps: Option<u64>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { source, steps, dt } => run(&source, steps, dt),
        Commands::View { source, steps } => viewer::launch(source, steps),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Load the scenario named by the command line
fn load_scenario(source: &ScenarioSource) -> Result<Scenario, Box<dyn std::error::Error>> {
    if let Some(name) = &source.preset {
        return presets::by_name(name).ok_or_else(|| format!("unknown preset '{}'", name).into());
    }

    let file = source.file.as_ref().ok_or("no scenario file given")?;
    let text = fs::read_to_string(file)?;
    log::info!("loaded scenario {}", file.display());
    parse_scenario(&text).map_err(|e| format_parse_error(&e, &text).into())
}

fn run(
    source: &ScenarioSource,
    steps: Option<u64>,
    dt: Option<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut scenario = load_scenario(source)?;
    if let Some(steps) = steps {
        scenario.simulate.steps = steps;
    }
    if let Some(dt) = dt {
        scenario.simulate.dt = dt;
    }

    let result = run_parsed(&scenario).map_err(|e| match e {
        RuntimeError::Analysis(messages) => messages.join("\n"),
        other => format_runtime_error(&other),
    })?;

    println!(
        "after {} steps ({:.1} days):",
        result.steps,
        result.elapsed / orbitsim_core::DAY
    );
    for body in &result.bodies {
        if body.is_reference {
            println!("{:<12} reference", body.name);
        } else {
            println!("{:<12} {:.1} km", body.name, body.reference_distance / 1000.0);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_requires_file_or_preset() {
        assert!(Cli::try_parse_from(["orbitsim", "run"]).is_err());
        assert!(Cli::try_parse_from(["orbitsim", "run", "--preset", "solar"]).is_ok());
        assert!(Cli::try_parse_from(["orbitsim", "run", "a.orbit", "--preset", "solar"]).is_err());
    }

    #[test]
    fn presets_load_by_name() {
        let source = ScenarioSource {
            file: None,
            preset: Some("solar".to_string()),
        };
        assert_eq!(load_scenario(&source).unwrap().bodies.len(), 9);

        let unknown = ScenarioSource {
            file: None,
            preset: Some("vega".to_string()),
        };
        assert!(load_scenario(&unknown).is_err());
    }
}
