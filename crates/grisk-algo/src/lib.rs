//! # grisk-algo: Scenario Sampling and Analysis
//!
//! Monte Carlo estimation of weather-stressed segment failure probabilities.
//!
//! ## Scenario model
//!
//! - [`ScenarioSampler`]: draws unit counts, monthly weather, hazard event
//!   counts, bad-outcome probabilities, the rain month and per-unit failure
//!   probabilities, then reduces them to per-segment `q` and `rho`
//! - [`composition`]: closed-form probability composition and the rain rule
//! - [`MonteCarlo`]: sequential and parallel drivers
//!
//! ## Analysis
//!
//! - [`shapiro_wilk`]: Royston's Shapiro-Wilk normality test
//! - [`analyze_segments`]: per-segment summary statistics over a results table
//!
//! ## Example
//!
//! ```rust
//! use grisk_algo::MonteCarlo;
//! use grisk_core::SegmentId;
//!
//! let mc = MonteCarlo::with_defaults(100).unwrap();
//! let result = mc.run_seeded(Some(42));
//! assert_eq!(result.len(), 100);
//!
//! let q1 = result.q_column(SegmentId::new(1));
//! assert!(q1.iter().all(|q| (0.0..=1.0).contains(q)));
//! ```

pub mod analysis;
pub mod composition;
pub mod monte_carlo;
pub mod normality;
pub mod sampler;

pub use analysis::{analyze_segments, AnalysisReport, DistributionSummary, SegmentAnalysis};
pub use composition::{
    apply_rain_rule, compound_failure_probability, no_failure_probability, revise_event_counts,
    segment_failure_probability,
};
pub use monte_carlo::{seeded_rng, MonteCarlo, DEFAULT_SCENARIOS};
pub use normality::{shapiro_wilk, ShapiroWilk, ROYSTON_MAX_N};
pub use sampler::{evaluate, ScenarioSampler};
