use clap::{CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use clap_complete::Shell;
use grisk_algo::DEFAULT_SCENARIOS;
use grisk_io::webmap::{DEFAULT_LAYER, DEFAULT_TOLERANCE_M};
use std::path::PathBuf;

/// Default location of the accumulated results table.
pub const DEFAULT_RESULTS_PATH: &str = "out/simulation_results.csv";

#[derive(Parser, Debug)]
#[command(name = "grisk", author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    /// Set the profile (e.g., "dev", "release")
    #[arg(long, default_value = "dev")]
    pub profile: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the Monte Carlo simulation and append rows to the results table
    Simulate {
        /// Number of scenarios to draw
        #[arg(short = 'n', long, default_value_t = DEFAULT_SCENARIOS)]
        scenarios: usize,
        /// Seed for a reproducible run (entropy when omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Simulation parameters (TOML, YAML or JSON)
        #[arg(long, value_hint = ValueHint::FilePath)]
        config: Option<PathBuf>,
        /// Results table to append to
        #[arg(short, long, default_value = DEFAULT_RESULTS_PATH, value_hint = ValueHint::FilePath)]
        out: PathBuf,
        /// Worker threads for --parallel ("auto" = all cores)
        #[arg(long, default_value = "auto")]
        threads: String,
        /// Draw scenarios on the rayon pool with per-scenario seeds
        #[arg(long)]
        parallel: bool,
        /// Directory for per-segment histogram PNGs
        #[arg(long, value_hint = ValueHint::DirPath)]
        plots: Option<PathBuf>,
        /// Write the analysis report as JSON
        #[arg(long, value_hint = ValueHint::FilePath)]
        report: Option<PathBuf>,
        /// Only append rows; do not reload or analyze the table
        #[arg(long)]
        skip_analysis: bool,
    },
    /// Analyze an existing results table
    Analyze {
        /// Results table to read
        #[arg(short, long, default_value = DEFAULT_RESULTS_PATH, value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Directory for per-segment histogram PNGs
        #[arg(long, value_hint = ValueHint::DirPath)]
        plots: Option<PathBuf>,
        /// Write the analysis report as JSON
        #[arg(long, value_hint = ValueHint::FilePath)]
        report: Option<PathBuf>,
    },
    /// Input dataset catalog, downloads and conversions
    Dataset {
        #[command(subcommand)]
        command: DatasetCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
        /// Write `<dir>/<conventional name>` instead of printing to stdout
        #[arg(long, value_hint = ValueHint::DirPath)]
        dir: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum DatasetCommands {
    /// List catalog entries
    List {
        /// Only entries carrying this tag
        #[arg(long)]
        tag: Option<String>,
        /// Case-insensitive match against id and description
        #[arg(long)]
        query: Option<String>,
        #[arg(long, value_enum, default_value_t = ListFormat::Plain)]
        format: ListFormat,
    },
    /// Show one catalog entry
    Describe {
        /// Dataset id (see `grisk dataset list`)
        id: String,
    },
    /// Download a catalog entry into the dataset directory
    Fetch {
        /// Dataset id
        id: String,
        /// Staging directory (defaults to the user cache or $GRISK_DATASET_DIR)
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        out: Option<PathBuf>,
        /// Replace an existing download
        #[arg(long)]
        force: bool,
        /// Request timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
    },
    /// Download an arbitrary URL
    Url {
        url: String,
        /// Destination file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: PathBuf,
        #[arg(long, value_enum, default_value_t = UrlMode::Raw)]
        mode: UrlMode,
        /// Extra request header as NAME:VALUE (repeatable)
        #[arg(long = "header")]
        headers: Vec<String>,
        /// Replace an existing file
        #[arg(long)]
        force: bool,
        /// Request timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
    },
    /// Convert one layer of an ArcGIS web map to GeoJSON
    ToGeojson {
        /// Web-map JSON document
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// GeoJSON output path
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: PathBuf,
        /// Operational layer name
        #[arg(long, default_value = DEFAULT_LAYER)]
        layer: String,
        /// Simplification tolerance in metres
        #[arg(long, default_value_t = DEFAULT_TOLERANCE_M)]
        tolerance: f64,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum ListFormat {
    /// Human-readable listing
    Plain,
    /// JSON array of catalog entries
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum UrlMode {
    /// Save the response body unchanged
    Raw,
    /// Follow properties.forecastZone of a weather.gov point response
    ForecastZone,
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
