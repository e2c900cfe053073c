//! One user session: the single owner of all dashboard state.
//!
//! The session holds exactly one monitor, one floodgate controller, the
//! pull gesture, the alert feed and the active screen. Presentation code
//! calls the methods here and renders `snapshot()`; it never keeps derived
//! state of its own.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::alert::feed::{alert_for_transition, AlertFeed};
use crate::config::{MonitorConfig, StationConfig};
use crate::floodgate::{FloodgateControl, FloodgateEvent};
use crate::logging::{self, Component};
use crate::model::MonitorError;
use crate::monitor::{RefreshOutcome, RiverLevelMonitor};
use crate::refresh::{PullGesture, PullRelease};
use crate::sensor::SensorInfo;
use crate::simulator::{LevelSimulator, DEFAULT_SEED};
use crate::snapshot::DashboardSnapshot;

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// Screens in bottom-navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Dashboard,
    Alerts,
    Sensors,
    Settings,
}

/// Which way the page transition slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideDirection {
    Forward,
    Back,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Something the presentation layer should react to after a `tick`.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Refreshed(RefreshOutcome),
    /// A threshold crossing was recorded in the alert feed under this id.
    AlertRaised(u32),
    Floodgate(FloodgateEvent),
    /// The pull indicator finished settling back.
    GestureSettled,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

pub struct Session<R: Rng = ChaCha8Rng> {
    monitor: RiverLevelMonitor<R>,
    floodgate: FloodgateControl,
    gesture: PullGesture,
    alerts: AlertFeed,
    sensor: SensorInfo,
    station: StationConfig,
    screen: Screen,
}

impl Session<ChaCha8Rng> {
    /// Builds a session from validated configuration. Without a configured
    /// seed the simulator is seeded from the clock.
    pub fn from_config(config: &MonitorConfig) -> Result<Self, MonitorError> {
        let seed = config
            .simulator
            .seed
            .unwrap_or_else(|| Utc::now().timestamp_micros() as u64);
        Self::from_config_seeded(config, seed)
    }

    pub fn from_config_seeded(config: &MonitorConfig, seed: u64) -> Result<Self, MonitorError> {
        config.validate()?;
        let profile = config.threshold_profile()?;
        let simulator = LevelSimulator::seeded(seed).with_config(config.simulator_config()?)?;
        let monitor = RiverLevelMonitor::new(profile, simulator, config.simulator.initial_level_m)
            .with_refresh_latency(config.timing.refresh_latency());

        Ok(Self::new(
            monitor,
            FloodgateControl::new(config.timing.actuation_delay()),
            PullGesture::new(config.timing.refresh_settle()),
            AlertFeed::with_samples(Utc::now()),
            config.sensor.clone(),
            config.station.clone(),
        ))
    }

    /// Default configuration with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(
            RiverLevelMonitor::seeded(seed),
            FloodgateControl::default(),
            PullGesture::default(),
            AlertFeed::with_samples(Utc::now()),
            SensorInfo::default(),
            StationConfig::default(),
        )
    }
}

impl Default for Session<ChaCha8Rng> {
    fn default() -> Self {
        Self::seeded(DEFAULT_SEED)
    }
}

impl<R: Rng> Session<R> {
    pub fn new(
        monitor: RiverLevelMonitor<R>,
        floodgate: FloodgateControl,
        gesture: PullGesture,
        alerts: AlertFeed,
        sensor: SensorInfo,
        station: StationConfig,
    ) -> Self {
        Self {
            monitor,
            floodgate,
            gesture,
            alerts,
            sensor,
            station,
            screen: Screen::Dashboard,
        }
    }

    pub fn monitor(&self) -> &RiverLevelMonitor<R> {
        &self.monitor
    }

    pub fn floodgate(&self) -> &FloodgateControl {
        &self.floodgate
    }

    pub fn gesture(&self) -> &PullGesture {
        &self.gesture
    }

    pub fn alerts(&self) -> &AlertFeed {
        &self.alerts
    }

    /// Returns false if no alert has this id.
    pub fn mark_alert_read(&mut self, id: u32) -> bool {
        self.alerts.mark_read(id)
    }

    pub fn mark_all_alerts_read(&mut self) {
        self.alerts.mark_all_read();
    }

    pub fn sensor(&self) -> &SensorInfo {
        &self.sensor
    }

    pub fn station(&self) -> &StationConfig {
        &self.station
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    // --- Navigation ---------------------------------------------------------

    pub fn navigate(&mut self, screen: Screen) -> SlideDirection {
        let direction = if screen > self.screen {
            SlideDirection::Forward
        } else {
            SlideDirection::Back
        };
        self.screen = screen;
        direction
    }

    pub fn logout(&mut self) {
        logging::info(Component::Session, "logged out");
        self.screen = Screen::Dashboard;
    }

    // --- Refresh ------------------------------------------------------------

    /// Refresh button: start a fetch unless one is already in flight.
    pub fn request_refresh(&mut self) -> Result<(), MonitorError> {
        self.monitor.begin_refresh()
    }

    pub fn touch_start(&mut self, y: f64, at_top: bool) {
        self.gesture.touch_start(y, at_top);
    }

    pub fn touch_move(&mut self, y: f64, at_top: bool) -> bool {
        self.gesture.touch_move(y, at_top)
    }

    /// Finger lifted. A triggered pull starts a refresh; if that is
    /// rejected the gesture is resolved straight away so it does not stick.
    pub fn touch_end(&mut self) -> Result<PullRelease, MonitorError> {
        let release = self.gesture.touch_end();
        if release == PullRelease::Triggered {
            if let Err(e) = self.monitor.begin_refresh() {
                self.gesture.resolve();
                logging::log_rejection(Component::Refresh, "pull refresh", &e);
                return Err(e);
            }
            logging::debug(Component::Refresh, "pull released past trigger, refreshing");
        }
        Ok(release)
    }

    /// Failure path of a refresh: drop it and release the gesture.
    pub fn fail_refresh(&mut self) -> bool {
        let abandoned = self.monitor.fail_refresh();
        if self.gesture.resolve() {
            logging::debug(Component::Refresh, "gesture released after failed refresh");
        }
        abandoned
    }

    // --- Floodgate ----------------------------------------------------------

    pub fn toggle_floodgate(&mut self) -> Result<FloodgateEvent, MonitorError> {
        self.floodgate.request_toggle()
    }

    pub fn confirm_floodgate(&mut self) -> Result<FloodgateEvent, MonitorError> {
        self.floodgate.confirm()
    }

    pub fn cancel_floodgate(&mut self) -> Result<FloodgateEvent, MonitorError> {
        self.floodgate.cancel()
    }

    // --- Clock --------------------------------------------------------------

    /// Advance every timer in the session by `elapsed`.
    pub fn tick(&mut self, elapsed: Duration) -> Vec<SessionEvent> {
        let mut events = Vec::new();

        // Settle before resolving so a resolution tick does not also count
        // toward the settle delay
        if self.gesture.tick(elapsed) {
            events.push(SessionEvent::GestureSettled);
        }

        if let Some(outcome) = self.monitor.tick(elapsed) {
            if self.gesture.resolve() {
                logging::debug(Component::Refresh, "gesture settling");
            }
            events.push(SessionEvent::Refreshed(outcome));

            let now = Utc::now();
            if let Some(alert) =
                alert_for_transition(&outcome, self.monitor.profile(), &self.station.name, now)
            {
                let id = self.alerts.push_alert(alert);
                logging::info(Component::Alerts, &format!("alert {} raised", id));
                events.push(SessionEvent::AlertRaised(id));
            }
        }

        if let Some(event) = self.floodgate.tick(elapsed) {
            events.push(SessionEvent::Floodgate(event));
        }

        events
    }

    /// Serializable view model of the dashboard at `now`.
    pub fn snapshot(&self, now: DateTime<Utc>) -> DashboardSnapshot {
        DashboardSnapshot::capture(self, now)
    }
}
