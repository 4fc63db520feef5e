use clap::Parser;
use std::io;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

use grisk_cli::cli::{build_cli_command, Cli, Commands};

use crate::commands::{analyze, completions, datasets, simulate};

mod commands;

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Simulate { .. } => "Simulation",
        Commands::Analyze { .. } => "Analysis",
        Commands::Dataset { .. } => "Dataset command",
        Commands::Completions { .. } => "Completion generation",
    }
}

fn dispatch(command: &Commands) -> anyhow::Result<()> {
    match command {
        Commands::Simulate {
            scenarios,
            seed,
            config,
            out,
            threads,
            parallel,
            plots,
            report,
            skip_analysis,
        } => simulate::handle(&simulate::SimulateArgs {
            scenarios: *scenarios,
            seed: *seed,
            config: config.as_deref(),
            out,
            threads,
            parallel: *parallel,
            plots: plots.as_deref(),
            report: report.as_deref(),
            skip_analysis: *skip_analysis,
        }),
        Commands::Analyze {
            input,
            plots,
            report,
        } => analyze::handle(input, plots.as_deref(), report.as_deref()),
        Commands::Dataset { command } => datasets::handle(command),
        Commands::Completions { shell, dir } => completions::handle(*shell, dir.as_deref()),
    }
}

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {err}");
    }

    debug!(
        "grisk {} running with profile: {}",
        env!("CARGO_PKG_VERSION"),
        cli.profile
    );

    let Some(command) = &cli.command else {
        if let Err(err) = build_cli_command().print_help() {
            error!("printing help failed: {err}");
        }
        return;
    };

    let name = command_name(command);
    match dispatch(command) {
        Ok(()) => info!("{name} successful!"),
        Err(e) => {
            error!("{name} failed: {e:?}");
            std::process::exit(1);
        }
    }
}
