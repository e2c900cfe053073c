/// River level monitor: the single owner of the current reading.
///
/// ## Flow
///
/// 1. A session creates the monitor with a seed level (15.2 m by default)
/// 2. `begin_refresh()` starts a simulated sensor fetch
/// 3. `tick()` advances the logical clock; once the refresh latency has
///    elapsed the simulator draws a new level and the reading is replaced
/// 4. Risk level, gauge fraction and alarm band are derived on demand,
///    never cached, so they can never disagree with the reading
///
/// Only one refresh may be in flight. A second request is rejected with
/// `MonitorError::AlreadyRefreshing` rather than queued.

use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::alert::thresholds::{
    alarm_band, classify, gauge_fraction, AlarmBand, GaugeFraction, ThresholdProfile,
};
use crate::logging::{self, Component};
use crate::model::{MonitorError, RiskLevel, RiverLevelReading};
use crate::simulator::LevelSimulator;

/// Simulated latency of a sensor fetch.
pub const REFRESH_LATENCY: Duration = Duration::from_millis(1500);

/// Level shown when a session starts.
pub const SEED_LEVEL_M: f64 = 15.2;

// ---------------------------------------------------------------------------
// Refresh outcome
// ---------------------------------------------------------------------------

/// Result of a resolved refresh, with the risk level on both sides so callers
/// can react to threshold crossings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefreshOutcome {
    pub previous_level: f64,
    pub new_level: f64,
    pub previous_risk: RiskLevel,
    pub new_risk: RiskLevel,
}

impl RefreshOutcome {
    pub fn new(previous_level: f64, new_level: f64, profile: &ThresholdProfile) -> Self {
        Self {
            previous_level,
            new_level,
            previous_risk: classify(previous_level, profile),
            new_risk: classify(new_level, profile),
        }
    }

    pub fn delta(&self) -> f64 {
        self.new_level - self.previous_level
    }

    pub fn escalated(&self) -> bool {
        self.new_risk > self.previous_risk
    }

    pub fn deescalated(&self) -> bool {
        self.new_risk < self.previous_risk
    }
}

// ---------------------------------------------------------------------------
// Monitor
// ---------------------------------------------------------------------------

pub struct RiverLevelMonitor<R: Rng = ChaCha8Rng> {
    profile: ThresholdProfile,
    simulator: LevelSimulator<R>,
    reading: RiverLevelReading,
    refresh_latency: Duration,
    /// Time spent on the in-flight refresh, if any.
    in_flight: Option<Duration>,
}

impl RiverLevelMonitor<ChaCha8Rng> {
    /// Default thresholds and seed level, with a deterministic simulator.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ThresholdProfile::default(), LevelSimulator::seeded(seed), SEED_LEVEL_M)
    }
}

impl Default for RiverLevelMonitor<ChaCha8Rng> {
    fn default() -> Self {
        Self::seeded(crate::simulator::DEFAULT_SEED)
    }
}

impl<R: Rng> RiverLevelMonitor<R> {
    pub fn new(profile: ThresholdProfile, simulator: LevelSimulator<R>, seed_level: f64) -> Self {
        Self {
            profile,
            simulator,
            reading: RiverLevelReading::new(seed_level, Utc::now()),
            refresh_latency: REFRESH_LATENCY,
            in_flight: None,
        }
    }

    pub fn with_refresh_latency(mut self, latency: Duration) -> Self {
        self.refresh_latency = latency;
        self
    }

    pub fn profile(&self) -> &ThresholdProfile {
        &self.profile
    }

    pub fn reading(&self) -> &RiverLevelReading {
        &self.reading
    }

    pub fn level(&self) -> f64 {
        self.reading.level_meters
    }

    pub fn risk(&self) -> RiskLevel {
        classify(self.reading.level_meters, &self.profile)
    }

    pub fn gauge(&self) -> GaugeFraction {
        gauge_fraction(self.reading.level_meters, &self.profile)
    }

    pub fn band(&self) -> AlarmBand {
        alarm_band(self.reading.level_meters, &self.profile)
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start a simulated fetch. Rejected while another one is resolving.
    pub fn begin_refresh(&mut self) -> Result<(), MonitorError> {
        if self.in_flight.is_some() {
            let err = MonitorError::AlreadyRefreshing;
            logging::log_rejection(Component::Monitor, "refresh", &err);
            return Err(err);
        }
        self.in_flight = Some(Duration::ZERO);
        logging::debug(Component::Monitor, "refresh started");
        Ok(())
    }

    /// Advance the logical clock. Returns the outcome on the tick where the
    /// in-flight refresh resolves, `None` otherwise.
    pub fn tick(&mut self, elapsed: Duration) -> Option<RefreshOutcome> {
        let spent = self.in_flight.as_mut()?;
        *spent += elapsed;
        if *spent < self.refresh_latency {
            return None;
        }
        self.in_flight = None;
        Some(self.resolve_refresh())
    }

    /// Abandon the in-flight refresh without touching the reading.
    /// Returns false if nothing was in flight.
    pub fn fail_refresh(&mut self) -> bool {
        if self.in_flight.take().is_some() {
            logging::warn(Component::Monitor, "refresh abandoned; keeping previous reading");
            true
        } else {
            false
        }
    }

    fn resolve_refresh(&mut self) -> RefreshOutcome {
        let previous = self.reading.level_meters;
        let next = self.simulator.refresh(previous);
        self.reading = RiverLevelReading::new(next, Utc::now());

        let outcome = RefreshOutcome::new(previous, next, &self.profile);
        logging::info(
            Component::Monitor,
            &format!(
                "Data refreshed: {:.1}m -> {:.1}m ({})",
                previous, next, outcome.new_risk
            ),
        );
        if outcome.new_risk != outcome.previous_risk {
            logging::warn(
                Component::Monitor,
                &format!(
                    "risk level changed: {} -> {}",
                    outcome.previous_risk, outcome.new_risk
                ),
            );
        }
        outcome
    }
}
