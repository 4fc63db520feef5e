use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use grisk_algo::{analyze_segments, AnalysisReport, DistributionSummary};
use grisk_core::ScenarioRecord;
use grisk_io::load_records;
use grisk_viz::{render_segment_histograms, PlotOptions};
use tabwriter::TabWriter;
use tracing::info;

pub fn handle(input: &Path, plots: Option<&Path>, report: Option<&Path>) -> Result<()> {
    let records = load_records(input)
        .with_context(|| format!("loading results table {}", input.display()))?;
    analyze_table(&records, plots, report)?;
    Ok(())
}

/// Analyze `records`, print the per-segment table and write the optional
/// report and plots.
pub fn analyze_table(
    records: &[ScenarioRecord],
    plots: Option<&Path>,
    report: Option<&Path>,
) -> Result<AnalysisReport> {
    let analysis = analyze_segments(records).context("analyzing results table")?;
    print_segment_table(&analysis)?;

    if let Some(path) = report {
        write_report(&analysis, path)?;
        println!("Wrote analysis report to {}", path.display());
    }
    if let Some(dir) = plots {
        let written = render_segment_histograms(dir, records, &PlotOptions::default())
            .with_context(|| format!("rendering histograms into {}", dir.display()))?;
        for path in &written {
            println!("Wrote histogram {}", path.display());
        }
    }
    info!(scenarios = analysis.scenarios, "analysis complete");
    Ok(analysis)
}

fn sw_p(summary: &DistributionSummary) -> String {
    summary
        .shapiro_wilk
        .map(|sw| format!("{:.4}", sw.p_value))
        .unwrap_or_else(|| "n/a".to_string())
}

fn print_segment_table(analysis: &AnalysisReport) -> Result<()> {
    println!("Scenarios analyzed: {}", analysis.scenarios);
    let mut writer = TabWriter::new(io::stdout());
    writeln!(
        writer,
        "SEGMENT\tQ MEAN\tQ STD\tQ MEDIAN\tQ SW P\tRHO MEAN\tRHO STD\tRHO MEDIAN\tRHO SW P\tRHO>Q"
    )?;
    for segment in &analysis.segments {
        writeln!(
            writer,
            "{}\t{:.6}\t{:.6}\t{:.6}\t{}\t{:.6}\t{:.6}\t{:.6}\t{}\t{}",
            segment.segment,
            segment.q.mean,
            segment.q.std_dev,
            segment.q.median,
            sw_p(&segment.q),
            segment.rho.mean,
            segment.rho.std_dev,
            segment.rho.median,
            sw_p(&segment.rho),
            segment.rho_exceeds_q,
        )?;
    }
    writer.flush()?;
    Ok(())
}

fn write_report(analysis: &AnalysisReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(analysis)?;
    fs::write(path, json).with_context(|| format!("writing report {}", path.display()))?;
    Ok(())
}
