//! Probability newtype for model outputs.
//!
//! Segment failure and compound probabilities are reported as [`Probability`]
//! rather than raw `f64` so that every value leaving the sampler has already
//! been clamped to `[0, 1]`. Construction through [`Probability::clamped`] is
//! the only way to build one from arbitrary arithmetic.
//!
//! # Usage
//!
//! ```
//! use grisk_core::units::Probability;
//!
//! let p = Probability::clamped(1.2);
//! assert_eq!(p.value(), 1.0);
//! assert_eq!(Probability::clamped(0.25).complement().value(), 0.75);
//! ```

use serde::{Deserialize, Serialize};

/// A probability in `[0, 1]`.
///
/// NaN inputs clamp to 0 so that a degenerate product never leaks into the
/// results table.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Probability(f64);

impl Probability {
    pub const ZERO: Probability = Probability(0.0);
    pub const ONE: Probability = Probability(1.0);

    /// Clamp an arbitrary value into `[0, 1]`.
    #[inline]
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    /// Get the raw numeric value
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// `1 - p`
    #[inline]
    pub fn complement(self) -> Self {
        Self(1.0 - self.0)
    }
}

impl From<Probability> for f64 {
    fn from(p: Probability) -> f64 {
        p.0
    }
}

impl std::fmt::Display for Probability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
