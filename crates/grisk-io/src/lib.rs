//! # grisk-io: Results Table & Dataset I/O
//!
//! Everything that touches the filesystem or the network:
//!
//! - [`results`]: the append-only CSV results table (`append_records`,
//!   `load_records`) with month sequences stored as comma-joined cells
//! - [`sources`]: catalog of remote datasets and a fetch collaborator that
//!   logs failures instead of propagating them
//! - [`webmap`]: ArcGIS web-map layer to GeoJSON conversion
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use grisk_io::results::{append_records, load_records};
//! use std::path::Path;
//!
//! fn main() -> grisk_core::GriskResult<()> {
//!     let path = Path::new("out/simulation_results.csv");
//!     let rows = load_records(path)?;
//!     append_records(path, &rows)?;
//!     Ok(())
//! }
//! ```

pub mod cell;
pub mod results;
pub mod sources;
pub mod webmap;

pub use results::{append_records, load_records, AppendSummary, ResultRow, COLUMNS};
pub use webmap::{convert_webmap, webmap_to_geojson, ConversionSummary, WebMapOptions};
