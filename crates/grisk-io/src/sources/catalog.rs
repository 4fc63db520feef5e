//! Curated remote datasets used as simulation inputs.

use std::env;
use std::path::PathBuf;

use grisk_core::{GriskError, GriskResult};
use serde::Serialize;

use super::fetch::FetchMode;

/// Environment variable overriding the dataset cache directory.
pub const DATASET_DIR_ENV: &str = "GRISK_DATASET_DIR";

/// The weather.gov API rejects requests without an identifying User-Agent.
pub const NWS_USER_AGENT: &str = "(grisk segment risk toolkit, grisk@users.noreply.github.com)";

/// Metadata for one catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DataSource {
    pub id: &'static str,
    pub description: &'static str,
    pub url: &'static str,
    pub filename: &'static str,
    pub license: &'static str,
    pub tags: &'static [&'static str],
    pub mode: FetchMode,
    pub headers: &'static [(&'static str, &'static str)],
}

#[derive(Debug, Clone, Default)]
pub struct SourceFilter {
    pub tag: Option<String>,
    pub query: Option<String>,
}

const LANDFIRE_JOB_URL: &str = concat!(
    "https://lfps.usgs.gov/arcgis/rest/services/LandfireProductService/GPServer/",
    "LandfireProductService/submitJob?Output_Projection=6414&Resample_Resolution=90",
    "&Layer_List=ELEV2020%3BSLPD2020%3BASP2020%3B140FBFM40%3B140CC%3B140CH%3B140CBH%3B140CBD",
    "&Area_Of_Interest=-123.7835%2041.7534%20-123.6352%2041.8042",
    // Fuel model and canopy overrides by elevation band (<1100 m, 1100..1200 m)
    "&Edit_Rule=%7b%22edit%22%3A%5b%7b%22condition%22%3A%5b%7b%22product%22%3A%22ELEV2020",
    "%22%2C%22operator%22%3A%22lt%22%2C%22value%22%3A1100%7d%5d%2C%22change%22%3A%5b%7b%2",
    "2product%22%3A%22140FBFM40%22%2C%22operator%22%3A%22st%22%2C%22value%22%3A163%7d%2C%",
    "7b%22product%22%3A%22140CBH%22%2C%22operator%22%3A%22st%22%2C%22value%22%3A15%7d%2C%",
    "7b%22product%22%3A%22140CBD%22%2C%22operator%22%3A%22st%22%2C%22value%22%3A27%7d%2C%",
    "7b%22product%22%3A%22140CC%22%2C%22operator%22%3A%22st%22%2C%22value%22%3A66%7d%2C%7",
    "b%22product%22%3A%22140CH%22%2C%22operator%22%3A%22ib%22%2C%22value%22%3A50%7d%5d%7d",
    "%2C%7b%22condition%22%3A%5b%7b%22product%22%3A%22ELEV2020%22%2C%22operator%22%3A%22l",
    "t%22%2C%22value%22%3A1200%7d%2C%7b%22product%22%3A%22ELEV2020%22%2C%22operator%22%3A",
    "%22ge%22%2C%22value%22%3A1100%7d%5d%2C%22change%22%3A%5b%7b%22product%22%3A%22140FBF",
    "M40%22%2C%22operator%22%3A%22st%22%2C%22value%22%3A162%7d%2C%7b%22product%22%3A%2214",
    "0CBH%22%2C%22operator%22%3A%22st%22%2C%22value%22%3A8%7d%2C%7b%22product%22%3A%22140",
    "CBD%22%2C%22operator%22%3A%22st%22%2C%22value%22%3A17%7d%2C%7b%22product%22%3A%22140",
    "CC%22%2C%22operator%22%3A%22st%22%2C%22value%22%3A36%7d%2C%7b%22product%22%3A%22140C",
    "H%22%2C%22operator%22%3A%22db%22%2C%22value%22%3A50%7d%5d%7d%5d%7d",
);

pub const SOURCES: &[DataSource] = &[
    DataSource {
        id: "ca-transmission-lines",
        description: "California electric transmission lines (CEC ArcGIS FeatureServer, GeoJSON).",
        url: "https://services3.arcgis.com/bWPjFyq029ChCGur/arcgis/rest/services/Transmission_Line/FeatureServer/2/query?outFields=*&where=1%3D1&f=geojson",
        filename: "california_electric_transmission_lines.geojson",
        license: "California Energy Commission open data",
        tags: &["geometry", "transmission", "california"],
        mode: FetchMode::Raw,
        headers: &[],
    },
    DataSource {
        id: "landfire-fuel",
        description: "LANDFIRE fuel and canopy layers job submission (elevation, slope, aspect, FBFM40, canopy).",
        url: LANDFIRE_JOB_URL,
        filename: "landfire_fuel_job.json",
        license: "USGS public domain",
        tags: &["raster", "fuel", "wildfire"],
        mode: FetchMode::Raw,
        headers: &[],
    },
    DataSource {
        id: "nws-winds",
        description: "National Weather Service forecast zone for a Los Angeles point (follows properties.forecastZone).",
        url: "https://api.weather.gov/points/34.032929628409185,-118.29052093567063",
        filename: "winds.geojson",
        license: "NOAA public domain",
        tags: &["weather", "wind", "forecast"],
        mode: FetchMode::ForecastZone,
        headers: &[
            ("User-Agent", NWS_USER_AGENT),
            ("Accept", "application/geo+json"),
        ],
    },
];

/// Look up a catalog entry by id (case-insensitive).
pub fn find_source(id: &str) -> GriskResult<&'static DataSource> {
    SOURCES
        .iter()
        .find(|source| source.id.eq_ignore_ascii_case(id))
        .ok_or_else(|| {
            let available = SOURCES.iter().map(|s| s.id).collect::<Vec<_>>().join(", ");
            GriskError::Validation(format!(
                "Unknown dataset \"{id}\". Available ids: {available}"
            ))
        })
}

fn matches_filter(source: &DataSource, filter: &SourceFilter) -> bool {
    if let Some(tag) = &filter.tag {
        if !source.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            return false;
        }
    }
    if let Some(query) = &filter.query {
        let query = query.to_lowercase();
        if !source.id.to_lowercase().contains(&query)
            && !source.description.to_lowercase().contains(&query)
        {
            return false;
        }
    }
    true
}

pub fn list_sources(filter: &SourceFilter) -> Vec<&'static DataSource> {
    SOURCES
        .iter()
        .filter(|source| matches_filter(source, filter))
        .collect()
}

/// Cache directory for downloads (prefers `~/.cache/grisk/datasets`).
pub fn default_dataset_dir() -> PathBuf {
    if let Ok(dir) = env::var(DATASET_DIR_ENV) {
        return PathBuf::from(dir);
    }
    if let Some(cache) = dirs::cache_dir() {
        return cache.join("grisk").join("datasets");
    }
    PathBuf::from("data")
}
