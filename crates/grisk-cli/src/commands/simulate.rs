use std::path::Path;

use anyhow::{Context, Result};
use grisk_algo::MonteCarlo;
use grisk_core::{load_config_from_path, AggregatedResult, SimulationConfig};
use grisk_io::{append_records, load_records};
use tracing::info;

use crate::commands::analyze::analyze_table;

pub struct SimulateArgs<'a> {
    pub scenarios: usize,
    pub seed: Option<u64>,
    pub config: Option<&'a Path>,
    pub out: &'a Path,
    pub threads: &'a str,
    pub parallel: bool,
    pub plots: Option<&'a Path>,
    pub report: Option<&'a Path>,
    pub skip_analysis: bool,
}

/// Draw, append, then (unless skipped) analyze the whole accumulated table.
pub fn handle(args: &SimulateArgs) -> Result<()> {
    let config = match args.config {
        Some(path) => load_config_from_path(path)
            .with_context(|| format!("loading simulation config {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    let mc = MonteCarlo::new(config, args.scenarios).context("invalid simulation parameters")?;

    info!(
        scenarios = args.scenarios,
        seed = ?args.seed,
        parallel = args.parallel,
        "starting simulation"
    );
    let result = draw(&mc, args);

    let summary = append_records(args.out, &result.records)
        .with_context(|| format!("appending to results table {}", args.out.display()))?;
    println!(
        "Appended {} scenario rows to {}",
        summary.rows_written,
        args.out.display()
    );

    if args.skip_analysis {
        return Ok(());
    }
    let records = load_records(args.out)
        .with_context(|| format!("reloading results table {}", args.out.display()))?;
    analyze_table(&records, args.plots, args.report)?;
    Ok(())
}

#[cfg(feature = "parallel")]
fn draw(mc: &MonteCarlo, args: &SimulateArgs) -> AggregatedResult {
    if args.parallel {
        crate::commands::util::configure_threads(args.threads);
        mc.run_parallel(args.seed)
    } else {
        mc.run_seeded(args.seed)
    }
}

#[cfg(not(feature = "parallel"))]
fn draw(mc: &MonteCarlo, args: &SimulateArgs) -> AggregatedResult {
    if args.parallel {
        tracing::warn!(
            threads = args.threads,
            "built without the parallel feature; running sequentially"
        );
    }
    mc.run_seeded(args.seed)
}
