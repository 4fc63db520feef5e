//! Results table: one CSV row per scenario, accumulated across runs.
//!
//! The table is append-only. A header is written only when the destination
//! is missing or empty, so repeated runs grow one table with one header.

use std::fs::{self, File, OpenOptions};
use std::path::Path;

use grisk_core::{
    GriskError, GriskResult, GroupDraw, Probability, ScenarioOutput, ScenarioRecord,
    SegmentOutcome, SimMonth, MONTHS,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cell;

/// Column names in table order.
pub const COLUMNS: [&str; 17] = [
    "num_units_seg1_seg2",
    "num_units_seg3",
    "weather12",
    "weather3",
    "N12_original",
    "N12_after_rain",
    "N3_original",
    "N3_after_rain",
    "mrain",
    "gamma12",
    "gamma3",
    "q1",
    "q2",
    "q3",
    "rho1",
    "rho2",
    "rho3",
];

/// Serialized form of a [`ScenarioRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    #[serde(rename = "num_units_seg1_seg2")]
    pub units12: u32,
    #[serde(rename = "num_units_seg3")]
    pub units3: u32,
    #[serde(with = "cell::joined")]
    pub weather12: [u8; MONTHS],
    #[serde(with = "cell::joined")]
    pub weather3: [u8; MONTHS],
    #[serde(rename = "N12_original", with = "cell::joined")]
    pub events12_original: [u32; MONTHS],
    #[serde(rename = "N12_after_rain", with = "cell::joined")]
    pub events12_after_rain: [u32; MONTHS],
    #[serde(rename = "N3_original", with = "cell::joined")]
    pub events3_original: [u32; MONTHS],
    #[serde(rename = "N3_after_rain", with = "cell::joined")]
    pub events3_after_rain: [u32; MONTHS],
    /// Season-relative rain month (4 = October .. 9 = March)
    pub mrain: u8,
    #[serde(with = "cell::fixed5")]
    pub gamma12: [f64; MONTHS],
    #[serde(with = "cell::fixed5")]
    pub gamma3: [f64; MONTHS],
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
    pub rho1: f64,
    pub rho2: f64,
    pub rho3: f64,
}

impl From<&ScenarioRecord> for ResultRow {
    fn from(record: &ScenarioRecord) -> Self {
        let [s1, s2, s3] = record.output.segments;
        Self {
            units12: record.shared.units,
            units3: record.independent.units,
            weather12: record.shared.weather,
            weather3: record.independent.weather,
            events12_original: record.shared.events_original,
            events12_after_rain: record.shared.events_after_rain,
            events3_original: record.independent.events_original,
            events3_after_rain: record.independent.events_after_rain,
            mrain: record.rain_month.index(),
            gamma12: record.shared.gamma,
            gamma3: record.independent.gamma,
            q1: s1.q.value(),
            q2: s2.q.value(),
            q3: s3.q.value(),
            rho1: s1.rho.value(),
            rho2: s2.rho.value(),
            rho3: s3.rho.value(),
        }
    }
}

impl TryFrom<ResultRow> for ScenarioRecord {
    type Error = GriskError;

    fn try_from(row: ResultRow) -> GriskResult<Self> {
        let rain_month = SimMonth::new(row.mrain)
            .ok_or_else(|| GriskError::Parse(format!("mrain {} outside 1..={MONTHS}", row.mrain)))?;
        let outcome = |q: f64, rho: f64| SegmentOutcome {
            q: Probability::clamped(q),
            rho: Probability::clamped(rho),
        };
        Ok(ScenarioRecord {
            shared: GroupDraw {
                units: row.units12,
                weather: row.weather12,
                events_original: row.events12_original,
                events_after_rain: row.events12_after_rain,
                gamma: row.gamma12,
            },
            independent: GroupDraw {
                units: row.units3,
                weather: row.weather3,
                events_original: row.events3_original,
                events_after_rain: row.events3_after_rain,
                gamma: row.gamma3,
            },
            rain_month,
            output: ScenarioOutput {
                segments: [
                    outcome(row.q1, row.rho1),
                    outcome(row.q2, row.rho2),
                    outcome(row.q3, row.rho3),
                ],
            },
        })
    }
}

/// What an append wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendSummary {
    pub rows_written: usize,
    pub header_written: bool,
}

/// Append `records` to the table at `path`, creating it (and its parent
/// directories) when missing.
pub fn append_records(path: &Path, records: &[ScenarioRecord]) -> GriskResult<AppendSummary> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|source| GriskError::io("creating results directory", parent, source))?;
    }

    let needs_header = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| GriskError::io("opening results table", path, source))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_header)
        .from_writer(file);
    for record in records {
        writer
            .serialize(ResultRow::from(record))
            .map_err(|e| GriskError::table("writing results row", path, e))?;
    }
    writer
        .flush()
        .map_err(|source| GriskError::io("flushing results table", path, source))?;

    let summary = AppendSummary {
        rows_written: records.len(),
        header_written: needs_header && !records.is_empty(),
    };
    info!(
        path = %path.display(),
        rows = summary.rows_written,
        header = summary.header_written,
        "appended scenario rows"
    );
    Ok(summary)
}

/// Reload every row of the table at `path`.
pub fn load_records(path: &Path) -> GriskResult<Vec<ScenarioRecord>> {
    let file =
        File::open(path).map_err(|source| GriskError::io("opening results table", path, source))?;
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| GriskError::table("reading results header", path, e))?;
    if let Some(missing) = COLUMNS.iter().find(|c| !headers.iter().any(|h| h == **c)) {
        return Err(GriskError::table(
            "reading results header",
            path,
            format!("missing column '{missing}'"),
        ));
    }

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<ResultRow>().enumerate() {
        let row = row.map_err(|e| {
            GriskError::table("parsing results row", path, format!("row {}: {e}", index + 1))
        })?;
        let record = ScenarioRecord::try_from(row).map_err(|e| {
            GriskError::table("parsing results row", path, format!("row {}: {e}", index + 1))
        })?;
        records.push(record);
    }
    debug!(path = %path.display(), rows = records.len(), "loaded results table");
    Ok(records)
}
