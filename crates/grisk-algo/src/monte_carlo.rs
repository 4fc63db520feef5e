use grisk_core::{AggregatedResult, GriskResult, SimulationConfig};
use rand::{rngs::StdRng, Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::sampler::ScenarioSampler;

/// Default scenario count for a study run.
pub const DEFAULT_SCENARIOS: usize = 10_000;

/// Monte Carlo driver for segment failure scenarios
#[derive(Debug, Clone)]
pub struct MonteCarlo {
    /// Scenario sampler
    pub sampler: ScenarioSampler,
    /// Number of scenarios to run
    pub num_scenarios: usize,
}

impl MonteCarlo {
    pub fn new(config: SimulationConfig, num_scenarios: usize) -> GriskResult<Self> {
        Ok(Self {
            sampler: ScenarioSampler::new(config)?,
            num_scenarios,
        })
    }

    /// Driver with default parameters.
    pub fn with_defaults(num_scenarios: usize) -> GriskResult<Self> {
        Self::new(SimulationConfig::default(), num_scenarios)
    }

    /// Run `num_scenarios` scenarios sequentially from `rng`, in draw order.
    ///
    /// Scenarios are independent; nothing leaks between them except the RNG
    /// stream position.
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> AggregatedResult {
        if self.num_scenarios == 0 {
            warn!("zero scenarios requested; result table will be empty");
        }
        let mut result = AggregatedResult::with_capacity(self.num_scenarios);
        for index in 0..self.num_scenarios {
            result.push(self.sampler.run_one_scenario(rng));
            if (index + 1) % 1000 == 0 {
                debug!(completed = index + 1, total = self.num_scenarios, "scenarios");
            }
        }
        info!(scenarios = result.len(), "Monte Carlo run complete");
        result
    }

    /// Sequential run from a fixed seed, or from OS entropy when `seed` is `None`.
    pub fn run_seeded(&self, seed: Option<u64>) -> AggregatedResult {
        let mut rng = seeded_rng(seed);
        self.run(&mut rng)
    }

    /// Parallel run across the rayon pool.
    ///
    /// A master RNG hands each scenario its own seed up front, so the result
    /// for a given `seed` does not depend on the thread count. It does differ
    /// from [`MonteCarlo::run_seeded`] with the same seed.
    #[cfg(feature = "parallel")]
    pub fn run_parallel(&self, seed: Option<u64>) -> AggregatedResult {
        if self.num_scenarios == 0 {
            warn!("zero scenarios requested; result table will be empty");
        }
        let mut master = seeded_rng(seed);
        let seeds: Vec<u64> = (0..self.num_scenarios).map(|_| master.gen()).collect();
        let records = seeds
            .par_iter()
            .map(|&scenario_seed| {
                let mut rng = StdRng::seed_from_u64(scenario_seed);
                self.sampler.run_one_scenario(&mut rng)
            })
            .collect::<Vec<_>>();
        info!(
            scenarios = records.len(),
            threads = rayon::current_num_threads(),
            "parallel Monte Carlo run complete"
        );
        AggregatedResult { records }
    }
}

pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    seed.map(StdRng::seed_from_u64)
        .unwrap_or_else(StdRng::from_entropy)
}
