//! The command line interface for the calculator.
use crate::lcoa;
use crate::log;
use crate::output::{create_output_directory, get_output_dir, write_results, write_sweep};
use crate::scenario::Scenario;
use crate::settings::Settings;
use crate::sweep::{DEFAULT_SWEEP_STEPS, SweepParameter, run_sweep};
use ::log::{info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;
pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for the calculator.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options shared by the run and sweep commands
#[derive(Args)]
pub struct RunOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Evaluate a scenario and write the cost breakdown.
    Run {
        /// Path to the scenario file.
        scenario_path: PathBuf,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Sweep one input over a range and write the results of each evaluation.
    Sweep {
        /// Path to the scenario file.
        scenario_path: PathBuf,
        /// The input to sweep.
        #[arg(value_enum)]
        parameter: SweepParameter,
        /// The first value of the swept range.
        #[arg(long)]
        from: f64,
        /// The last value of the swept range.
        #[arg(long)]
        to: f64,
        /// The number of evaluations, spaced linearly over the range.
        #[arg(long, default_value_t = DEFAULT_SWEEP_STEPS)]
        steps: u32,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Validate a scenario file.
    Validate {
        /// Path to the scenario file.
        scenario_path: PathBuf,
    },
    /// Manage example scenarios.
    Example {
        /// The available subcommands for managing example scenarios.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Manage the program settings file.
    Settings {
        /// The available subcommands for managing settings.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run {
                scenario_path,
                opts,
            } => handle_run_command(&scenario_path, &opts, None),
            Self::Sweep {
                scenario_path,
                parameter,
                from,
                to,
                steps,
                opts,
            } => handle_sweep_command(&scenario_path, parameter, from, to, steps, &opts, None),
            Self::Validate { scenario_path } => handle_validate_command(&scenario_path, None),
            Self::Example { subcommand } => subcommand.execute(),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and dispatch to the relevant command
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ amlevel --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Load program settings unless the caller has already provided them
fn load_settings(settings: Option<Settings>) -> Result<Settings> {
    match settings {
        Some(settings) => Ok(settings),
        None => Settings::load().context("Failed to load settings."),
    }
}

/// Prepare the output folder for a run and initialise logging into it
fn setup_output_directory(
    scenario_path: &Path,
    opts: &RunOpts,
    settings: &Settings,
) -> Result<PathBuf> {
    let output_path = match opts.output_dir.as_deref() {
        Some(p) => p.to_path_buf(),
        None => get_output_dir(scenario_path)?,
    };

    let overwrite =
        create_output_directory(&output_path, opts.overwrite || settings.overwrite)
            .with_context(|| {
                format!(
                    "Failed to create output directory: {}",
                    output_path.display()
                )
            })?;

    log::init(Some(&settings.log_level), Some(&output_path))
        .context("Failed to initialise logging.")?;

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    Ok(output_path)
}

/// Handle the `run` command.
pub fn handle_run_command(
    scenario_path: &Path,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;
    let output_path = setup_output_directory(scenario_path, opts, &settings)?;

    let scenario = Scenario::from_path(scenario_path)?;
    info!("Loaded scenario from {}", scenario_path.display());
    info!("Output folder: {}", output_path.display());

    let evaluation = lcoa::evaluate(&scenario);
    if evaluation.sizing.exceeds_nameplate() {
        warn!(
            "Required energy implies an electrolyzer utilisation of {:.3}, above nameplate \
            capacity",
            evaluation.sizing.utilisation.value()
        );
    }

    write_results(&output_path, &scenario, &evaluation)?;
    info!(
        "Levelized cost of ammonia: {:.2} $/t",
        evaluation.lcoa.final_cost_per_tonne.value()
    );

    Ok(())
}

/// Handle the `sweep` command.
pub fn handle_sweep_command(
    scenario_path: &Path,
    parameter: SweepParameter,
    from: f64,
    to: f64,
    steps: u32,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;
    let output_path = setup_output_directory(scenario_path, opts, &settings)?;

    let scenario = Scenario::from_path(scenario_path)?;
    info!("Loaded scenario from {}", scenario_path.display());
    info!("Output folder: {}", output_path.display());

    let points = run_sweep(&scenario, parameter, from, to, steps)?;
    write_sweep(&output_path, parameter, &points)?;
    info!("Swept {parameter} over {steps} points from {from} to {to}");

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(scenario_path: &Path, settings: Option<Settings>) -> Result<()> {
    let settings = load_settings(settings)?;

    // No log files are saved when running the validate command
    log::init(Some(&settings.log_level), None).context("Failed to initialise logging.")?;

    Scenario::from_path(scenario_path)?;
    info!("Scenario validation successful!");

    Ok(())
}
