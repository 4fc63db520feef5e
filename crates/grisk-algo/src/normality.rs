//! Shapiro-Wilk normality test.
//!
//! Coefficients and the p-value use Royston's approximation (Applied
//! Statistics algorithm AS R94), valid for 3 <= n <= 5000. Larger samples
//! are still evaluated with the same approximation, with a warning.

use grisk_core::{GriskError, GriskResult};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::warn;

/// Largest sample size the approximation was fitted for.
pub const ROYSTON_MAX_N: usize = 5000;

const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.071190, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const C3: [f64; 4] = [0.5440, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const GAMMA: [f64; 2] = [-2.273, 0.459];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapiroWilk {
    /// W statistic in (0, 1]
    pub statistic: f64,
    pub p_value: f64,
    pub n: usize,
}

impl ShapiroWilk {
    /// True when normality is rejected at significance `alpha`.
    pub fn rejects_normality(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// `c[0] + c[1] x + c[2] x^2 + ...`
fn poly(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

fn standard_normal() -> GriskResult<Normal> {
    Normal::new(0.0, 1.0).map_err(|e| GriskError::Statistics(e.to_string()))
}

/// Half of the antisymmetric coefficient vector, largest first.
fn coefficients(n: usize, std_normal: &Normal) -> Vec<f64> {
    let half = n / 2;
    if n == 3 {
        return vec![std::f64::consts::FRAC_1_SQRT_2];
    }

    let an = n as f64;
    let m: Vec<f64> = (1..=half)
        .map(|i| std_normal.inverse_cdf((i as f64 - 0.375) / (an + 0.25)))
        .collect();
    let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / an.sqrt();

    let a1 = poly(&C1, rsn) - m[0] / ssumm2;
    let mut a = Vec::with_capacity(half);
    a.push(a1);
    if n > 5 {
        let a2 = -m[1] / ssumm2 + poly(&C2, rsn);
        let fac = ((summ2 - 2.0 * m[0].powi(2) - 2.0 * m[1].powi(2))
            / (1.0 - 2.0 * a1.powi(2) - 2.0 * a2.powi(2)))
        .sqrt();
        a.push(a2);
        a.extend(m[2..].iter().map(|mi| -mi / fac));
    } else {
        let fac = ((summ2 - 2.0 * m[0].powi(2)) / (1.0 - 2.0 * a1.powi(2))).sqrt();
        a.extend(m[1..].iter().map(|mi| -mi / fac));
    }
    a
}

fn p_value(w: f64, n: usize, std_normal: &Normal) -> f64 {
    if n == 3 {
        let pw = 6.0 / std::f64::consts::PI * (w.sqrt().asin() - std::f64::consts::FRAC_PI_3);
        return pw.clamp(0.0, 1.0);
    }
    if w >= 1.0 {
        return 1.0;
    }

    let an = n as f64;
    let mut y = (1.0 - w).ln();
    let (mean, std) = if n <= 11 {
        let gamma = poly(&GAMMA, an);
        if y >= gamma {
            return 1e-99;
        }
        y = -(gamma - y).ln();
        (poly(&C3, an), poly(&C4, an).exp())
    } else {
        let xx = an.ln();
        (poly(&C5, xx), poly(&C6, xx).exp())
    };
    let z = (y - mean) / std;
    std_normal.sf(z)
}

/// Shapiro-Wilk test of the hypothesis that `sample` is normally distributed.
///
/// Errors when the sample has fewer than three values, contains a non-finite
/// value, or has (near) zero range.
pub fn shapiro_wilk(sample: &[f64]) -> GriskResult<ShapiroWilk> {
    let n = sample.len();
    if n < 3 {
        return Err(GriskError::Statistics(format!(
            "Shapiro-Wilk needs at least 3 values, got {n}"
        )));
    }
    if sample.iter().any(|v| !v.is_finite()) {
        return Err(GriskError::Statistics(
            "Shapiro-Wilk sample contains non-finite values".into(),
        ));
    }
    if n > ROYSTON_MAX_N {
        warn!(n, "Shapiro-Wilk p-value approximation is only calibrated up to n = 5000");
    }

    let mut sorted = sample.to_vec();
    sorted.sort_by(f64::total_cmp);
    let range = sorted[n - 1] - sorted[0];
    if range < 1e-19 {
        return Err(GriskError::Statistics(
            "Shapiro-Wilk sample has zero range".into(),
        ));
    }

    let std_normal = standard_normal()?;
    let a = coefficients(n, &std_normal);

    // Scale by range to keep the sums well conditioned for tiny probabilities.
    let scaled: Vec<f64> = sorted.iter().map(|x| x / range).collect();
    let mean = scaled.iter().sum::<f64>() / n as f64;
    let ssq: f64 = scaled.iter().map(|x| (x - mean).powi(2)).sum();
    let numerator: f64 = a
        .iter()
        .enumerate()
        .map(|(i, ai)| ai * (scaled[n - 1 - i] - scaled[i]))
        .sum();
    let statistic = (numerator.powi(2) / ssq).clamp(0.0, 1.0);

    Ok(ShapiroWilk {
        statistic,
        p_value: p_value(statistic, n, &std_normal),
        n,
    })
}
