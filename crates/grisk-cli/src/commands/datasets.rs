use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use grisk_cli::cli::{DatasetCommands, ListFormat, UrlMode};
use grisk_io::sources::{
    default_dataset_dir, fetch, find_source, list_sources, FetchMode, FetchOutcome, FetchRequest,
    SourceFilter,
};
use grisk_io::webmap::{webmap_to_geojson, WebMapOptions};

use crate::commands::util::parse_header;

pub fn handle(command: &DatasetCommands) -> Result<()> {
    match command {
        DatasetCommands::List { tag, query, format } => list(tag.as_ref(), query.as_ref(), *format),
        DatasetCommands::Describe { id } => describe(id),
        DatasetCommands::Fetch {
            id,
            out,
            force,
            timeout_secs,
        } => fetch_source(id, out.as_deref(), *force, *timeout_secs),
        DatasetCommands::Url {
            url,
            out,
            mode,
            headers,
            force,
            timeout_secs,
        } => fetch_url(url, out, *mode, headers, *force, *timeout_secs),
        DatasetCommands::ToGeojson {
            input,
            out,
            layer,
            tolerance,
        } => to_geojson(input, out, layer, *tolerance),
    }
}

fn list(tag: Option<&String>, query: Option<&String>, format: ListFormat) -> Result<()> {
    let filter = SourceFilter {
        tag: tag.cloned(),
        query: query.cloned(),
    };
    let matches = list_sources(&filter);
    if let ListFormat::Json = format {
        serde_json::to_writer_pretty(io::stdout(), &matches)
            .map_err(|err| anyhow!("serializing dataset list to JSON: {err}"))?;
        println!();
        return Ok(());
    }
    if matches.is_empty() {
        println!("No datasets matched the provided filters.");
        return Ok(());
    }
    for source in matches {
        println!("{id} - {desc}", id = source.id, desc = source.description);
        println!("  source : {}", source.url);
        println!("  license: {}", source.license);
        if !source.tags.is_empty() {
            println!("  tags   : {}", source.tags.join(", "));
        }
        println!();
    }
    Ok(())
}

fn describe(id: &str) -> Result<()> {
    let source = find_source(id)?;
    println!("Dataset: {}", source.id);
    println!("Description: {}", source.description);
    println!("Source URL: {}", source.url);
    println!("License: {}", source.license);
    println!("Filename: {}", source.filename);
    if !source.tags.is_empty() {
        println!("Tags: {}", source.tags.join(", "));
    }
    let mode = match source.mode {
        FetchMode::Raw => "raw",
        FetchMode::ForecastZone => "forecast-zone",
    };
    println!("Fetch mode: {mode}");
    Ok(())
}

fn report(label: &str, outcome: FetchOutcome) -> Result<()> {
    match outcome {
        FetchOutcome::Downloaded { path, bytes } => {
            println!("{label} downloaded to {} ({bytes} bytes)", path.display());
            Ok(())
        }
        FetchOutcome::AlreadyPresent { path } => {
            println!(
                "{label} already downloaded to {}. Use --force to refresh.",
                path.display()
            );
            Ok(())
        }
        FetchOutcome::Failed { reason } => Err(anyhow!("fetching {label} failed: {reason}")),
    }
}

fn fetch_source(id: &str, out: Option<&Path>, force: bool, timeout_secs: u64) -> Result<()> {
    let source = find_source(id)?;
    let dir = out
        .map(Path::to_path_buf)
        .unwrap_or_else(default_dataset_dir);
    let request = FetchRequest::for_source(source, &dir)
        .with_force(force)
        .with_timeout(Duration::from_secs(timeout_secs));
    report(source.id, fetch(&request))
}

fn fetch_url(
    url: &str,
    out: &Path,
    mode: UrlMode,
    headers: &[String],
    force: bool,
    timeout_secs: u64,
) -> Result<()> {
    let mode = match mode {
        UrlMode::Raw => FetchMode::Raw,
        UrlMode::ForecastZone => FetchMode::ForecastZone,
    };
    let mut request = FetchRequest::new(url, out)
        .with_mode(mode)
        .with_force(force)
        .with_timeout(Duration::from_secs(timeout_secs));
    for raw in headers {
        let (name, value) = parse_header(raw)?;
        request = request.with_header(name, value);
    }
    report(url, fetch(&request))
}

fn to_geojson(input: &Path, out: &Path, layer: &str, tolerance: f64) -> Result<()> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(anyhow!("tolerance must be a non-negative number of metres"));
    }
    let options = WebMapOptions {
        layer: layer.to_string(),
        tolerance_m: tolerance,
    };
    let summary = webmap_to_geojson(input, out, &options)
        .with_context(|| format!("converting {}", input.display()))?;
    println!(
        "Wrote {} feature(s) to {} ({} skipped)",
        summary.converted,
        out.display(),
        summary.skipped
    );
    Ok(())
}
