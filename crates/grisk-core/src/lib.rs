//! # grisk-core: Segment Risk Modeling Core
//!
//! Provides the data structures shared by the sampler, the results table and
//! the CLI for weather-stressed segment failure analysis.
//!
//! ## Model
//!
//! A study area has three segments observed over a nine-month season
//! (July..March):
//! - **Segments 1 and 2** share one weather regime: same unit count, weather
//!   types, hazard event counts and bad-outcome probabilities.
//! - **Segment 3** has its own independently drawn regime.
//!
//! Each scenario draws a [`ScenarioInput`], reduces it to per-segment
//! [`SegmentOutcome`]s (failure probability `q`, compound failure + bad
//! outcome probability `rho`) and keeps only the [`ScenarioRecord`] summary.
//!
//! ## Quick Start
//!
//! ```rust
//! use grisk_core::*;
//!
//! let month = SimMonth::from_calendar(10).unwrap();
//! assert_eq!(month, SimMonth::OCTOBER);
//! assert_eq!(month.offset(), 3);
//!
//! let config = SimulationConfig::default();
//! config.validate().unwrap();
//! assert_eq!(config.units_min..=config.units_max, 20..=30);
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod units;

pub use config::{load_config_from_path, SimulationConfig};
pub use error::{GriskError, GriskResult};
pub use model::{
    q_column, rho_column, AggregatedResult, FailureMatrix, GroupDraw, ScenarioInput,
    ScenarioOutput, ScenarioRecord, SegmentId, SegmentOutcome, SimMonth, WeatherGroup,
    CALENDAR_MONTHS, MONTHS, SEGMENTS,
};
pub use units::Probability;
