//! Remote dataset catalog and retrieval.

pub mod catalog;
pub mod fetch;

pub use catalog::{
    default_dataset_dir, find_source, list_sources, DataSource, SourceFilter, DATASET_DIR_ENV,
    SOURCES,
};
pub use fetch::{fetch, forecast_zone_url, FetchMode, FetchOutcome, FetchRequest, DEFAULT_TIMEOUT};
