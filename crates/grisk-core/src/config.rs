//! Simulation parameters.
//!
//! Every field has a default matching the reference study (W = 5 weather
//! types, 20..=30 units per segment, rain window October..March). A config
//! file only needs to name the fields it overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{GriskError, GriskResult};
use crate::model::{SimMonth, MONTHS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of weather severity levels; weather types are drawn from 1..=W.
    #[serde(default = "default_weather_types")]
    pub weather_types: u8,
    #[serde(default = "default_units_min")]
    pub units_min: u32,
    #[serde(default = "default_units_max")]
    pub units_max: u32,
    /// First season month (1 = July) eligible for the rain event.
    #[serde(default = "default_rain_first")]
    pub rain_first_month: u8,
    #[serde(default = "default_rain_last")]
    pub rain_last_month: u8,
    /// Per-unit failure probability lower bound, multiplied by weather type.
    #[serde(default = "default_failure_low")]
    pub failure_low_per_weather: f64,
    #[serde(default = "default_failure_high")]
    pub failure_high_per_weather: f64,
    /// Standard deviation of the noise added to derive the coupled segment.
    #[serde(default = "default_coupled_noise")]
    pub coupled_noise_std: f64,
    #[serde(default = "default_gamma_base")]
    pub gamma_base: f64,
    #[serde(default = "default_gamma_slope")]
    pub gamma_slope: f64,
    #[serde(default = "default_gamma_noise")]
    pub gamma_noise_std: f64,
}

fn default_weather_types() -> u8 {
    5
}

fn default_units_min() -> u32 {
    20
}

fn default_units_max() -> u32 {
    30
}

fn default_rain_first() -> u8 {
    SimMonth::OCTOBER.index()
}

fn default_rain_last() -> u8 {
    SimMonth::MARCH.index()
}

fn default_failure_low() -> f64 {
    1e-5
}

fn default_failure_high() -> f64 {
    1e-4
}

fn default_coupled_noise() -> f64 {
    1e-6
}

fn default_gamma_base() -> f64 {
    0.3
}

fn default_gamma_slope() -> f64 {
    0.1
}

fn default_gamma_noise() -> f64 {
    0.05
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            weather_types: default_weather_types(),
            units_min: default_units_min(),
            units_max: default_units_max(),
            rain_first_month: default_rain_first(),
            rain_last_month: default_rain_last(),
            failure_low_per_weather: default_failure_low(),
            failure_high_per_weather: default_failure_high(),
            coupled_noise_std: default_coupled_noise(),
            gamma_base: default_gamma_base(),
            gamma_slope: default_gamma_slope(),
            gamma_noise_std: default_gamma_noise(),
        }
    }
}

impl SimulationConfig {
    /// Reject parameter sets under which a sampling distribution is undefined.
    pub fn validate(&self) -> GriskResult<()> {
        if self.weather_types == 0 {
            return Err(GriskError::Config("weather_types must be >= 1".into()));
        }
        if self.units_min > self.units_max {
            return Err(GriskError::Config(format!(
                "units_min ({}) exceeds units_max ({})",
                self.units_min, self.units_max
            )));
        }
        let first = self.rain_first_month;
        let last = self.rain_last_month;
        if SimMonth::new(first).is_none() || SimMonth::new(last).is_none() || first > last {
            return Err(GriskError::Config(format!(
                "rain window {first}..={last} must lie within 1..={MONTHS} and be ordered"
            )));
        }
        let low = self.failure_low_per_weather;
        let high = self.failure_high_per_weather;
        if !(low.is_finite() && high.is_finite()) || low < 0.0 || low >= high {
            return Err(GriskError::Config(format!(
                "failure probability bounds must satisfy 0 <= low < high (got {low}, {high})"
            )));
        }
        if high * f64::from(self.weather_types) > 1.0 {
            return Err(GriskError::Config(format!(
                "failure_high_per_weather ({high}) x weather_types ({}) exceeds 1",
                self.weather_types
            )));
        }
        for (name, std) in [
            ("coupled_noise_std", self.coupled_noise_std),
            ("gamma_noise_std", self.gamma_noise_std),
        ] {
            if !std.is_finite() || std < 0.0 {
                return Err(GriskError::Config(format!("{name} must be >= 0 (got {std})")));
            }
        }
        if !(self.gamma_base.is_finite() && self.gamma_slope.is_finite()) {
            return Err(GriskError::Config("gamma_base and gamma_slope must be finite".into()));
        }
        Ok(())
    }

    pub fn rain_window(&self) -> (SimMonth, SimMonth) {
        let first = SimMonth::new(self.rain_first_month).unwrap_or(SimMonth::OCTOBER);
        let last = SimMonth::new(self.rain_last_month).unwrap_or(SimMonth::MARCH);
        (first, last)
    }
}

/// Load a config file; format follows the extension (toml, yaml/yml, json).
pub fn load_config_from_path(path: &Path) -> GriskResult<SimulationConfig> {
    let data = fs::read_to_string(path)
        .map_err(|source| GriskError::io("reading simulation config", path, source))?;
    let config: SimulationConfig = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            serde_yaml::from_str(&data).map_err(|e| GriskError::Parse(e.to_string()))?
        }
        Some(ext) if ext.eq_ignore_ascii_case("json") => serde_json::from_str(&data)?,
        _ => toml::from_str(&data).map_err(|e| GriskError::Parse(e.to_string()))?,
    };
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_validate() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.rain_window(), (SimMonth::OCTOBER, SimMonth::MARCH));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "units_min = 5\nunits_max = 8").unwrap();
        let config = load_config_from_path(file.path()).unwrap();
        assert_eq!(config.units_min, 5);
        assert_eq!(config.units_max, 8);
        assert_eq!(config.weather_types, 5);
        assert_eq!(config.gamma_noise_std, 0.05);
    }

    #[test]
    fn test_yaml_config() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "weather_types: 3\nrain_first_month: 6").unwrap();
        let config = load_config_from_path(file.path()).unwrap();
        assert_eq!(config.weather_types, 3);
        assert_eq!(config.rain_first_month, 6);
    }

    #[test]
    fn test_inverted_unit_range_rejected() {
        let config = SimulationConfig {
            units_min: 30,
            units_max: 20,
            ..SimulationConfig::default()
        };
        assert!(matches!(config.validate(), Err(GriskError::Config(_))));
    }

    #[test]
    fn test_rain_window_outside_season_rejected() {
        let config = SimulationConfig {
            rain_last_month: 10,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_config_from_path(Path::new("/nonexistent/grisk.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/grisk.toml"));
    }
}
