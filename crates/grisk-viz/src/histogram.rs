use grisk_core::{GriskError, GriskResult};
use serde::Serialize;

/// Default bin count for probability histograms.
pub const DEFAULT_BINS: usize = 50;

/// Equal-width histogram over `[min, max]`; the last bin is closed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub min: f64,
    pub max: f64,
    pub counts: Vec<usize>,
}

/// Range covering every finite value of every series.
///
/// A degenerate range is widened by 0.5 on each side so a constant series
/// still lands in a middle bin.
pub fn shared_range(series: &[&[f64]]) -> Option<(f64, f64)> {
    let mut finite = series.iter().flat_map(|s| s.iter().copied()).filter(|v| v.is_finite());
    let first = finite.next()?;
    let (min, max) = finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if max > min {
        Some((min, max))
    } else {
        Some((min - 0.5, max + 0.5))
    }
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins over `range`.
    pub fn with_range(values: &[f64], bins: usize, range: (f64, f64)) -> GriskResult<Self> {
        let (min, max) = range;
        if bins == 0 {
            return Err(GriskError::Validation("histogram needs at least one bin".into()));
        }
        if !(min.is_finite() && max.is_finite()) || max <= min {
            return Err(GriskError::Validation(format!(
                "invalid histogram range [{min}, {max}]"
            )));
        }
        let width = (max - min) / bins as f64;
        let mut counts = vec![0; bins];
        for &v in values.iter().filter(|v| v.is_finite()) {
            if v < min || v > max {
                continue;
            }
            let idx = (((v - min) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }
        Ok(Self { min, max, counts })
    }

    /// Bin over the range of the values themselves.
    pub fn new(values: &[f64], bins: usize) -> GriskResult<Self> {
        let range = shared_range(&[values]).ok_or_else(|| {
            GriskError::Validation("histogram needs at least one finite value".into())
        })?;
        Self::with_range(values, bins, range)
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.bins() as f64
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_sum_to_len() {
        let values: Vec<f64> = (0..100).map(|i| i as f64 / 99.0).collect();
        let hist = Histogram::new(&values, 10).unwrap();
        assert_eq!(hist.total(), 100);
        assert_eq!(hist.counts, vec![10; 10]);
    }

    #[test]
    fn test_max_lands_in_last_bin() {
        let hist = Histogram::with_range(&[0.0, 1.0], 4, (0.0, 1.0)).unwrap();
        assert_eq!(hist.counts, vec![1, 0, 0, 1]);
    }

    #[test]
    fn test_constant_series_widened() {
        let hist = Histogram::new(&[0.2; 5], 5).unwrap();
        assert!((hist.min + 0.3).abs() < 1e-12);
        assert!((hist.max - 0.7).abs() < 1e-12);
        assert_eq!(hist.counts[2], 5);
    }

    #[test]
    fn test_shared_range_spans_series() {
        let q = [0.1, 0.4];
        let rho = [0.05, 0.3];
        assert_eq!(shared_range(&[&q, &rho]), Some((0.05, 0.4)));
        assert_eq!(shared_range(&[&[], &[f64::NAN]]), None);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(Histogram::new(&[], 10).is_err());
        assert!(Histogram::new(&[1.0, 2.0], 0).is_err());
    }
}
