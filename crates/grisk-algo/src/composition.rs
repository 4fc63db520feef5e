//! Closed-form probability composition over months and units.
//!
//! For segment `j` with unit failure probabilities `p[i][m]` (probability that
//! unit `i` fails when struck by one hazard event in month `m`) and `N[m]`
//! hazard events in month `m`:
//!
//! ```text
//! P_m   = Π_i (1 - p[i][m])^N[m]                 (no unit fails in month m)
//! q     = 1 - Π_m P_m                            (some unit fails at some point)
//! rho   = 1 - Π_m [ P_m + (1 - P_m)(1 - γ_m) ]   (a failure triggers a bad outcome)
//! ```
//!
//! A segment with no units has `P_m = 1` (empty product), so it never fails.
//! `rho <= q` is not implied by these formulas; see [`ScenarioOutput::rho_exceeds_q`].
//!
//! [`ScenarioOutput::rho_exceeds_q`]: grisk_core::ScenarioOutput::rho_exceeds_q

use grisk_core::{Probability, SimMonth, MONTHS};
use rand::Rng;

/// Probability that none of the `events` exposures in `month` fails any unit.
pub fn no_failure_probability(matrix: &[[f64; MONTHS]], month: usize, events: u32) -> f64 {
    let exponent = i32::try_from(events).unwrap_or(i32::MAX);
    matrix
        .iter()
        .map(|row| (1.0 - row[month]).powi(exponent))
        .product()
}

/// Segment failure probability `q`.
pub fn segment_failure_probability(
    matrix: &[[f64; MONTHS]],
    events: &[u32; MONTHS],
) -> Probability {
    let survival: f64 = (0..MONTHS)
        .map(|m| no_failure_probability(matrix, m, events[m]))
        .product();
    Probability::clamped(1.0 - survival)
}

/// Compound failure + bad-outcome probability `rho`.
pub fn compound_failure_probability(
    matrix: &[[f64; MONTHS]],
    events: &[u32; MONTHS],
    gamma: &[f64; MONTHS],
) -> Probability {
    let benign: f64 = (0..MONTHS)
        .map(|m| {
            let intact = no_failure_probability(matrix, m, events[m]);
            intact + (1.0 - intact) * (1.0 - gamma[m])
        })
        .product();
    Probability::clamped(1.0 - benign)
}

/// Apply the rain rule with a known dampening fraction `eta`.
///
/// Months before `rain_month` keep their counts, the rain month keeps
/// `floor(eta * N)`, and every later month drops to zero.
pub fn apply_rain_rule(events: &[u32; MONTHS], rain_month: SimMonth, eta: f64) -> [u32; MONTHS] {
    let eta = eta.clamp(0.0, 1.0);
    let mut revised = [0u32; MONTHS];
    for month in SimMonth::all() {
        let idx = month.offset();
        revised[idx] = match month.cmp(&rain_month) {
            std::cmp::Ordering::Less => events[idx],
            std::cmp::Ordering::Equal => (eta * f64::from(events[idx])).floor() as u32,
            std::cmp::Ordering::Greater => 0,
        };
    }
    revised
}

/// Draw `eta ~ U[0, 1)` and apply the rain rule.
pub fn revise_event_counts<R: Rng + ?Sized>(
    events: &[u32; MONTHS],
    rain_month: SimMonth,
    rng: &mut R,
) -> [u32; MONTHS] {
    let eta: f64 = rng.gen();
    apply_rain_rule(events, rain_month, eta)
}
