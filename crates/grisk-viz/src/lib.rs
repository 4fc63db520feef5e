//! Histogram plots of per-segment failure probabilities.
//!
//! Each segment gets one PNG with the q and rho distributions overlaid on a
//! shared set of equal-width bins (q in blue, rho in orange).

pub mod histogram;
pub mod render;

pub use histogram::{shared_range, Histogram, DEFAULT_BINS};
pub use render::{
    histogram_file_name, render_overlay, render_segment_histograms, write_png, PlotOptions,
};
