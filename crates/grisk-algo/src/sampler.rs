use grisk_core::{
    FailureMatrix, GriskError, GriskResult, GroupDraw, ScenarioInput, ScenarioOutput,
    ScenarioRecord, SegmentId, SegmentOutcome, SimMonth, SimulationConfig, MONTHS,
};
use rand::Rng;
use rand_distr::{Distribution, Normal, Poisson};

use crate::composition::{
    compound_failure_probability, revise_event_counts, segment_failure_probability,
};

/// Draws one scenario of stochastic inputs and reduces it to per-segment outcomes.
///
/// The sampler holds no mutable state: every draw comes from the caller's RNG,
/// so a seeded stream reproduces the same scenarios in the same order.
#[derive(Debug, Clone)]
pub struct ScenarioSampler {
    config: SimulationConfig,
    /// Event-count distributions indexed by `weather_type - 1`
    event_counts: Vec<Poisson<f64>>,
    gamma_noise: Normal<f64>,
    coupled_noise: Normal<f64>,
}

impl ScenarioSampler {
    pub fn new(config: SimulationConfig) -> GriskResult<Self> {
        config.validate()?;
        let event_counts = (1..=config.weather_types)
            .map(|w| {
                Poisson::new(f64::from(w))
                    .map_err(|e| GriskError::Config(format!("event rate for weather {w}: {e}")))
            })
            .collect::<GriskResult<Vec<_>>>()?;
        let gamma_noise = Normal::new(0.0, config.gamma_noise_std)
            .map_err(|e| GriskError::Config(format!("gamma noise: {e}")))?;
        let coupled_noise = Normal::new(0.0, config.coupled_noise_std)
            .map_err(|e| GriskError::Config(format!("coupled segment noise: {e}")))?;
        Ok(Self {
            config,
            event_counts,
            gamma_noise,
            coupled_noise,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Draw a scenario, evaluate it and keep the table summary.
    pub fn run_one_scenario<R: Rng + ?Sized>(&self, rng: &mut R) -> ScenarioRecord {
        let input = self.draw_input(rng);
        let output = evaluate(&input);
        input.summarize(output)
    }

    /// Draw every stochastic input of one scenario.
    ///
    /// Draw order is fixed: unit counts, weather, event counts, bad-outcome
    /// probabilities, rain month, rain revision, then failure matrices.
    pub fn draw_input<R: Rng + ?Sized>(&self, rng: &mut R) -> ScenarioInput {
        let shared_units = self.draw_units(rng);
        let independent_units = self.draw_units(rng);

        let shared_weather = self.draw_weather(rng);
        let independent_weather = self.draw_weather(rng);

        let shared_events = self.draw_event_counts(&shared_weather, rng);
        let independent_events = self.draw_event_counts(&independent_weather, rng);

        let shared_gamma = self.draw_gamma(&shared_weather, rng);
        let independent_gamma = self.draw_gamma(&independent_weather, rng);

        let rain_month = self.draw_rain_month(rng);
        let shared_after_rain = revise_event_counts(&shared_events, rain_month, rng);
        let independent_after_rain = revise_event_counts(&independent_events, rain_month, rng);

        let segment1 = self.draw_failure_matrix(shared_units, &shared_weather, rng);
        let segment3 = self.draw_failure_matrix(independent_units, &independent_weather, rng);
        let segment2 = self.perturb_failure_matrix(&segment1, rng);

        ScenarioInput {
            shared: GroupDraw {
                units: shared_units,
                weather: shared_weather,
                events_original: shared_events,
                events_after_rain: shared_after_rain,
                gamma: shared_gamma,
            },
            independent: GroupDraw {
                units: independent_units,
                weather: independent_weather,
                events_original: independent_events,
                events_after_rain: independent_after_rain,
                gamma: independent_gamma,
            },
            rain_month,
            failure_probability: [segment1, segment2, segment3],
        }
    }

    fn draw_units<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.gen_range(self.config.units_min..=self.config.units_max)
    }

    fn draw_weather<R: Rng + ?Sized>(&self, rng: &mut R) -> [u8; MONTHS] {
        let max = self.config.weather_types;
        std::array::from_fn(|_| rng.gen_range(1..=max))
    }

    /// Poisson event counts with rate equal to the month's weather type.
    fn draw_event_counts<R: Rng + ?Sized>(
        &self,
        weather: &[u8; MONTHS],
        rng: &mut R,
    ) -> [u32; MONTHS] {
        weather.map(|w| {
            let dist = &self.event_counts[usize::from(w.max(1)) - 1];
            let count: f64 = dist.sample(rng);
            count as u32
        })
    }

    /// `clip(base + slope * (w - 1) + N(0, σ), 0, 1)` per month.
    fn draw_gamma<R: Rng + ?Sized>(&self, weather: &[u8; MONTHS], rng: &mut R) -> [f64; MONTHS] {
        let base = self.config.gamma_base;
        let slope = self.config.gamma_slope;
        weather.map(|w| {
            let noise = self.gamma_noise.sample(rng);
            (base + slope * (f64::from(w) - 1.0) + noise).clamp(0.0, 1.0)
        })
    }

    fn draw_rain_month<R: Rng + ?Sized>(&self, rng: &mut R) -> SimMonth {
        let (first, last) = self.config.rain_window();
        let index = rng.gen_range(first.index()..=last.index());
        SimMonth::new(index).unwrap_or(first)
    }

    /// Independent segment: each unit draws `U[low * w, high * w)` per month.
    fn draw_failure_matrix<R: Rng + ?Sized>(
        &self,
        units: u32,
        weather: &[u8; MONTHS],
        rng: &mut R,
    ) -> FailureMatrix {
        let low = self.config.failure_low_per_weather;
        let high = self.config.failure_high_per_weather;
        (0..units)
            .map(|_| {
                weather.map(|w| {
                    let w = f64::from(w);
                    rng.gen_range(low * w..high * w)
                })
            })
            .collect()
    }

    /// Coupled segment: base matrix plus independent zero-mean noise, clamped.
    fn perturb_failure_matrix<R: Rng + ?Sized>(
        &self,
        base: &FailureMatrix,
        rng: &mut R,
    ) -> FailureMatrix {
        base.iter()
            .map(|row| row.map(|p| (p + self.coupled_noise.sample(rng)).clamp(0.0, 1.0)))
            .collect()
    }
}

/// Reduce a drawn scenario to `q` and `rho` per segment.
pub fn evaluate(input: &ScenarioInput) -> ScenarioOutput {
    let mut output = ScenarioOutput::default();
    for (slot, segment) in SegmentId::all().into_iter().enumerate() {
        let group = input.group(segment);
        let matrix = input.failure_matrix(segment);
        output.segments[slot] = SegmentOutcome {
            q: segment_failure_probability(matrix, &group.events_after_rain),
            rho: compound_failure_probability(matrix, &group.events_after_rain, &group.gamma),
        };
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn default_sampler() -> ScenarioSampler {
        ScenarioSampler::new(SimulationConfig::default()).unwrap()
    }

    #[test]
    fn test_draw_input_shapes() {
        let sampler = default_sampler();
        let mut rng = StdRng::seed_from_u64(1);
        let input = sampler.draw_input(&mut rng);

        let n12 = input.shared.units as usize;
        let n3 = input.independent.units as usize;
        assert!((20..=30).contains(&n12));
        assert!((20..=30).contains(&n3));
        assert_eq!(input.failure_probability[0].len(), n12);
        assert_eq!(input.failure_probability[1].len(), n12);
        assert_eq!(input.failure_probability[2].len(), n3);
    }

    #[test]
    fn test_failure_bounds_scale_with_weather() {
        let sampler = default_sampler();
        let mut rng = StdRng::seed_from_u64(2);
        let input = sampler.draw_input(&mut rng);
        for (matrix, weather) in [
            (&input.failure_probability[0], &input.shared.weather),
            (&input.failure_probability[2], &input.independent.weather),
        ] {
            for row in matrix {
                for m in 0..MONTHS {
                    let w = f64::from(weather[m]);
                    assert!(row[m] >= 1e-5 * w && row[m] < 1e-4 * w);
                }
            }
        }
    }

    #[test]
    fn test_coupled_segment_tracks_base() {
        let sampler = default_sampler();
        let mut rng = StdRng::seed_from_u64(3);
        let input = sampler.draw_input(&mut rng);
        for (base, coupled) in input.failure_probability[0]
            .iter()
            .zip(&input.failure_probability[1])
        {
            for m in 0..MONTHS {
                // 1e-6 noise: ten sigma is still far below the base magnitude
                assert!((base[m] - coupled[m]).abs() < 1e-5);
                assert!((0.0..=1.0).contains(&coupled[m]));
            }
        }
    }

    #[test]
    fn test_zero_noise_copies_base_exactly() {
        let config = SimulationConfig {
            coupled_noise_std: 0.0,
            ..SimulationConfig::default()
        };
        let sampler = ScenarioSampler::new(config).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        let input = sampler.draw_input(&mut rng);
        assert_eq!(input.failure_probability[0], input.failure_probability[1]);
        let output = evaluate(&input);
        assert_eq!(output.segments[0], output.segments[1]);
    }

    #[test]
    fn test_rain_month_in_window() {
        let sampler = default_sampler();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let input = sampler.draw_input(&mut rng);
            assert!(input.rain_month >= SimMonth::OCTOBER);
            assert!(input.rain_month <= SimMonth::MARCH);
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulationConfig {
            weather_types: 0,
            ..SimulationConfig::default()
        };
        assert!(ScenarioSampler::new(config).is_err());
    }
}
