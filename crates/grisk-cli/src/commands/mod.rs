pub mod analyze;
pub mod completions;
pub mod datasets;
pub mod simulate;
pub mod util;
