//! Stand-in for a real sensor feed: a bounded random walk on the river level.
//!
//! The generator is injected so that identical seeds produce identical
//! level sequences. Production code uses `ChaCha8Rng`; tests can pass any
//! `rand::Rng`.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::logging::{self, Component};
use crate::model::MonitorError;

/// Seed used when no explicit seed is configured.
pub const DEFAULT_SEED: u64 = 42;

/// Bounds and step size of the random walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatorConfig {
    /// Lowest level a refresh can produce, in meters.
    pub floor: f64,
    /// Highest level a refresh can produce, in meters.
    pub ceiling: f64,
    /// Perturbations are drawn uniformly from `[-jitter, +jitter]`.
    pub jitter: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            floor: 12.0,
            ceiling: 20.0,
            jitter: 0.15,
        }
    }
}

impl SimulatorConfig {
    pub fn validate(&self) -> Result<(), MonitorError> {
        if !self.floor.is_finite() || !self.ceiling.is_finite() || !self.jitter.is_finite() {
            return Err(MonitorError::Configuration(
                "simulator bounds and jitter must be finite".to_string(),
            ));
        }
        if self.floor >= self.ceiling {
            return Err(MonitorError::Configuration(format!(
                "simulator floor ({}) must be below ceiling ({})",
                self.floor, self.ceiling
            )));
        }
        if self.jitter < 0.0 {
            return Err(MonitorError::Configuration(format!(
                "simulator jitter must not be negative, got {}",
                self.jitter
            )));
        }
        // A step wider than the whole range is meaningless, and the sampling
        // range [-jitter, +jitter] must stay representable
        let span = self.ceiling - self.floor;
        if !span.is_finite() || self.jitter > span {
            return Err(MonitorError::Configuration(format!(
                "simulator jitter ({}) must not exceed ceiling - floor ({})",
                self.jitter, span
            )));
        }
        Ok(())
    }
}

/// Rounds to one decimal place, the precision the gauge displays.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Clone)]
pub struct LevelSimulator<R: Rng = ChaCha8Rng> {
    rng: R,
    config: SimulatorConfig,
}

impl LevelSimulator<ChaCha8Rng> {
    /// Deterministic simulator with default bounds.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            config: SimulatorConfig::default(),
        }
    }
}

impl Default for LevelSimulator<ChaCha8Rng> {
    fn default() -> Self {
        Self::seeded(DEFAULT_SEED)
    }
}

impl<R: Rng> LevelSimulator<R> {
    pub fn new(rng: R, config: SimulatorConfig) -> Result<Self, MonitorError> {
        config.validate()?;
        Ok(Self { rng, config })
    }

    pub fn with_config(self, config: SimulatorConfig) -> Result<Self, MonitorError> {
        Self::new(self.rng, config)
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// One jitter sample in `[-jitter, +jitter]`.
    pub fn perturbation(&mut self) -> f64 {
        let jitter = self.config.jitter;
        if jitter == 0.0 {
            return 0.0;
        }
        self.rng.gen_range(-jitter..=jitter)
    }

    /// Next level after one sensor tick: perturb, round to a tenth, clamp to
    /// `[floor, ceiling]`. Always in range, whatever `current` is.
    pub fn refresh(&mut self, current: f64) -> f64 {
        let perturbation = self.perturbation();
        self.step(current, perturbation)
    }

    fn step(&self, current: f64, perturbation: f64) -> f64 {
        let SimulatorConfig { floor, ceiling, .. } = self.config;
        if current.is_nan() {
            logging::warn(Component::Simulator, "non-numeric level, restarting at floor");
            return floor;
        }
        // Rounding first keeps a bound that is itself not a tenth in range
        round_tenth(current + perturbation).clamp(floor, ceiling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_stays_in_bounds_over_many_trials() {
        let mut sim = LevelSimulator::seeded(7);
        let mut level = 15.2;
        for _ in 0..10_000 {
            level = sim.refresh(level);
            assert!((12.0..=20.0).contains(&level), "out of range: {}", level);
        }
    }

    #[test]
    fn test_refresh_from_arbitrary_inputs_is_in_bounds() {
        let mut sim = LevelSimulator::seeded(99);
        let mut seed_rng = ChaCha8Rng::seed_from_u64(1234);
        for _ in 0..10_000 {
            let current: f64 = seed_rng.gen_range(-100.0..100.0);
            let next = sim.refresh(current);
            assert!((12.0..=20.0).contains(&next), "{} -> {}", current, next);
        }
    }

    #[test]
    fn test_refresh_handles_non_finite_input() {
        let mut sim = LevelSimulator::seeded(1);
        assert_eq!(sim.refresh(f64::NAN), 12.0);
        assert_eq!(sim.refresh(f64::INFINITY), 20.0);
        assert_eq!(sim.refresh(f64::NEG_INFINITY), 12.0);
    }

    #[test]
    fn test_refresh_moves_at_most_one_jitter_step() {
        let mut sim = LevelSimulator::seeded(3);
        for _ in 0..1_000 {
            let next = sim.refresh(15.0);
            // 0.15 jitter rounds to at most 0.2 after the tenth rounding
            assert!((next - 15.0).abs() <= 0.2 + 1e-9, "jumped to {}", next);
        }
    }

    #[test]
    fn test_refresh_output_has_one_decimal() {
        let mut sim = LevelSimulator::seeded(5);
        let mut level = 15.2;
        for _ in 0..500 {
            level = sim.refresh(level);
            assert!((level * 10.0 - (level * 10.0).round()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = LevelSimulator::seeded(2024);
        let mut b = LevelSimulator::seeded(2024);
        let mut la = 15.2;
        let mut lb = 15.2;
        for _ in 0..100 {
            la = a.refresh(la);
            lb = b.refresh(lb);
            assert_eq!(la, lb);
        }
    }

    #[test]
    fn test_perturbation_within_jitter() {
        let mut sim = LevelSimulator::seeded(11);
        for _ in 0..1_000 {
            let p = sim.perturbation();
            assert!((-0.15..=0.15).contains(&p));
        }
    }

    #[test]
    fn test_zero_jitter_only_rounds_and_clamps() {
        let config = SimulatorConfig {
            jitter: 0.0,
            ..SimulatorConfig::default()
        };
        let mut sim = LevelSimulator::new(ChaCha8Rng::seed_from_u64(0), config).unwrap();
        assert_eq!(sim.refresh(15.24), 15.2);
        assert_eq!(sim.refresh(25.0), 20.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let inverted = SimulatorConfig {
            floor: 20.0,
            ceiling: 12.0,
            jitter: 0.15,
        };
        let result = LevelSimulator::new(ChaCha8Rng::seed_from_u64(0), inverted);
        assert!(matches!(result, Err(MonitorError::Configuration(_))));

        let negative = SimulatorConfig {
            jitter: -0.1,
            ..SimulatorConfig::default()
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_oversized_jitter_rejected() {
        let huge = SimulatorConfig {
            jitter: 1e308,
            ..SimulatorConfig::default()
        };
        assert!(matches!(huge.validate(), Err(MonitorError::Configuration(_))));

        let wider_than_range = SimulatorConfig {
            jitter: 8.5,
            ..SimulatorConfig::default()
        };
        assert!(wider_than_range.validate().is_err());

        let full_range = SimulatorConfig {
            jitter: 8.0,
            ..SimulatorConfig::default()
        };
        let mut sim = LevelSimulator::new(ChaCha8Rng::seed_from_u64(3), full_range).unwrap();
        for _ in 0..1_000 {
            assert!((12.0..=20.0).contains(&sim.refresh(15.0)));
        }
    }

    #[test]
    fn test_unbounded_span_rejected() {
        let wide = SimulatorConfig {
            floor: -f64::MAX,
            ceiling: f64::MAX,
            jitter: 1.0,
        };
        assert!(wide.validate().is_err());
    }
}
