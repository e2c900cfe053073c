/// Monitor configuration loader - parses monitor.toml
///
/// Separates alarm thresholds, simulator bounds, UI timings and sensor
/// metadata from code, so a different river gauge can be described without
/// recompiling. Every section is optional and falls back to the Marikina
/// River defaults.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::alert::thresholds::{
    ThresholdProfile, DEFAULT_CRITICAL_M, DEFAULT_FIRST_ALARM_M, DEFAULT_MAX_GAUGE_M,
    DEFAULT_NORMAL_M, DEFAULT_SECOND_ALARM_M,
};
use crate::floodgate::ACTUATION_DELAY;
use crate::logging::{self, Component};
use crate::model::MonitorError;
use crate::monitor::{REFRESH_LATENCY, SEED_LEVEL_M};
use crate::refresh::SETTLE_DELAY;
use crate::sensor::SensorInfo;
use crate::simulator::SimulatorConfig;

/// Default configuration file, relative to the working directory.
pub const CONFIG_PATH: &str = "monitor.toml";

/// River alarm thresholds as written in monitor.toml, in meters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub normal_m: f64,
    pub first_alarm_m: f64,
    pub second_alarm_m: f64,
    pub critical_m: f64,
    pub max_gauge_m: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            normal_m: DEFAULT_NORMAL_M,
            first_alarm_m: DEFAULT_FIRST_ALARM_M,
            second_alarm_m: DEFAULT_SECOND_ALARM_M,
            critical_m: DEFAULT_CRITICAL_M,
            max_gauge_m: DEFAULT_MAX_GAUGE_M,
        }
    }
}

/// Converts ThresholdConfig from TOML to the validated ThresholdProfile.
impl TryFrom<&ThresholdConfig> for ThresholdProfile {
    type Error = MonitorError;

    fn try_from(config: &ThresholdConfig) -> Result<Self, Self::Error> {
        ThresholdProfile::new(
            config.normal_m,
            config.first_alarm_m,
            config.second_alarm_m,
            config.critical_m,
            config.max_gauge_m,
        )
    }
}

/// Random-walk settings for the simulated sensor
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulatorSection {
    pub floor_m: f64,
    pub ceiling_m: f64,
    pub jitter_m: f64,
    /// Fixed seed for reproducible sessions; clock-seeded otherwise.
    pub seed: Option<u64>,
    pub initial_level_m: f64,
}

impl Default for SimulatorSection {
    fn default() -> Self {
        let bounds = SimulatorConfig::default();
        Self {
            floor_m: bounds.floor,
            ceiling_m: bounds.ceiling,
            jitter_m: bounds.jitter,
            seed: None,
            initial_level_m: SEED_LEVEL_M,
        }
    }
}

impl From<&SimulatorSection> for SimulatorConfig {
    fn from(section: &SimulatorSection) -> Self {
        SimulatorConfig {
            floor: section.floor_m,
            ceiling: section.ceiling_m,
            jitter: section.jitter_m,
        }
    }
}

/// Simulated delays, in milliseconds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub refresh_latency_ms: u64,
    pub refresh_settle_ms: u64,
    pub actuation_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            refresh_latency_ms: REFRESH_LATENCY.as_millis() as u64,
            refresh_settle_ms: SETTLE_DELAY.as_millis() as u64,
            actuation_delay_ms: ACTUATION_DELAY.as_millis() as u64,
        }
    }
}

impl TimingConfig {
    pub fn refresh_latency(&self) -> Duration {
        Duration::from_millis(self.refresh_latency_ms)
    }

    pub fn refresh_settle(&self) -> Duration {
        Duration::from_millis(self.refresh_settle_ms)
    }

    pub fn actuation_delay(&self) -> Duration {
        Duration::from_millis(self.actuation_delay_ms)
    }
}

/// Monitoring station shown in the dashboard footer
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    pub name: String,
    pub zone: String,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            name: "Marikina Riverbanks, Marikina City".to_string(),
            zone: "Monitoring Station - Zone 1".to_string(),
        }
    }
}

/// Root configuration structure for TOML parsing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub thresholds: ThresholdConfig,
    pub simulator: SimulatorSection,
    pub timing: TimingConfig,
    pub sensor: SensorInfo,
    pub station: StationConfig,
}

impl MonitorConfig {
    pub fn threshold_profile(&self) -> Result<ThresholdProfile, MonitorError> {
        ThresholdProfile::try_from(&self.thresholds)
    }

    pub fn simulator_config(&self) -> Result<SimulatorConfig, MonitorError> {
        let config = SimulatorConfig::from(&self.simulator);
        config.validate()?;
        Ok(config)
    }

    /// Checks every section; the first problem found is returned.
    pub fn validate(&self) -> Result<(), MonitorError> {
        self.threshold_profile()?;
        let bounds = self.simulator_config()?;

        let seed = self.simulator.initial_level_m;
        if !seed.is_finite() || seed < bounds.floor || seed > bounds.ceiling {
            return Err(MonitorError::Configuration(format!(
                "initial level {} outside simulator bounds [{}, {}]",
                seed, bounds.floor, bounds.ceiling
            )));
        }

        if self.sensor.battery_percent > 100 || self.sensor.signal_percent > 100 {
            return Err(MonitorError::Configuration(
                "sensor battery and signal are percentages (0-100)".to_string(),
            ));
        }

        Ok(())
    }
}

/// Parses and validates configuration from a TOML string.
pub fn parse_config(contents: &str) -> Result<MonitorConfig, MonitorError> {
    let config: MonitorConfig =
        toml::from_str(contents).map_err(|e| MonitorError::ConfigParse(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Loads configuration from an explicit path.
pub fn load_config_from<P: AsRef<Path>>(path: P) -> Result<MonitorConfig, MonitorError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .map_err(|e| MonitorError::ConfigRead(format!("{}: {}", path.display(), e)))?;

    match parse_config(&contents) {
        Ok(config) => {
            logging::debug(Component::Config, &format!("loaded {}", path.display()));
            Ok(config)
        }
        Err(e) => {
            logging::log_rejection(Component::Config, &format!("{}", path.display()), &e);
            Err(e)
        }
    }
}

/// Loads monitor.toml from the current working directory (project root
/// when running via `cargo run`).
pub fn load_config() -> Result<MonitorConfig, MonitorError> {
    load_config_from(CONFIG_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_succeeds() {
        let config = load_config().expect("monitor.toml should load");
        let profile = config.threshold_profile().unwrap();
        assert_eq!(profile, ThresholdProfile::default());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.threshold_profile().unwrap(), ThresholdProfile::default());
        assert_eq!(config.simulator_config().unwrap(), SimulatorConfig::default());
        assert_eq!(config.simulator.initial_level_m, 15.2);
        assert_eq!(config.timing.actuation_delay(), Duration::from_millis(2500));
        assert_eq!(config.timing.refresh_latency(), Duration::from_millis(1500));
        assert_eq!(config.sensor.name, "Home Sensor #1");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = parse_config(
            r#"
            [thresholds]
            first_alarm_m = 14.5
            "#,
        )
        .unwrap();
        let profile = config.threshold_profile().unwrap();
        assert_eq!(profile.first_alarm(), 14.5);
        assert_eq!(profile.second_alarm(), 16.0);
    }

    #[test]
    fn test_non_monotonic_thresholds_rejected() {
        let result = parse_config(
            r#"
            [thresholds]
            normal_m = 12.0
            first_alarm_m = 10.0
            "#,
        );
        assert!(matches!(result, Err(MonitorError::Configuration(_))));
    }

    #[test]
    fn test_oversized_jitter_rejected_at_load() {
        let result = parse_config("[simulator]\njitter_m = 1e308\n");
        assert!(matches!(result, Err(MonitorError::Configuration(_))));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let result = parse_config("[thresholds\nnormal_m = ");
        assert!(matches!(result, Err(MonitorError::ConfigParse(_))));
    }

    #[test]
    fn test_initial_level_outside_bounds_rejected() {
        let result = parse_config(
            r#"
            [simulator]
            initial_level_m = 25.0
            "#,
        );
        assert!(matches!(result, Err(MonitorError::Configuration(_))));
    }

    #[test]
    fn test_sensor_section_parses_dates() {
        let config = parse_config(
            r#"
            [sensor]
            id = 2
            name = "Garage Sensor"
            location = "Tumana"
            battery_percent = 50
            signal_percent = 60
            installed = "2025-11-30"
            status = "offline"
            "#,
        )
        .unwrap();
        assert_eq!(config.sensor.name, "Garage Sensor");
        assert_eq!(config.sensor.installed_label(), "Nov 30, 2025");
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let result = load_config_from("does-not-exist.toml");
        assert!(matches!(result, Err(MonitorError::ConfigRead(_))));
    }
}
