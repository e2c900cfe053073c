/// RiverLevelReading, RiskLevel, GatePosition, MonitorError
///
/// Core data types for the home flood monitoring and floodgate control core.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no I/O and no behaviour beyond small conversions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Reading types
// ---------------------------------------------------------------------------

/// The current river level as last measured (or simulated) at the home sensor.
///
/// Created at session start with a seed value and replaced only by a
/// resolved refresh. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiverLevelReading {
    pub level_meters: f64,
    pub timestamp: DateTime<Utc>,
}

impl RiverLevelReading {
    pub fn new(level_meters: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            level_meters,
            timestamp,
        }
    }

    /// Human-readable "last updated" marker, as shown under the gauge.
    pub fn updated_label(&self, now: DateTime<Utc>) -> String {
        let minutes = (now - self.timestamp).num_minutes();
        match minutes {
            m if m < 1 => "Just now".to_string(),
            1 => "1 minute ago".to_string(),
            m if m < 60 => format!("{} minutes ago", m),
            m => format!("{} hours ago", m / 60),
        }
    }
}

// ---------------------------------------------------------------------------
// Risk classification
// ---------------------------------------------------------------------------

/// Coarse flood danger derived from the water level. Never stored on its
/// own; always recomputed from the level and the threshold profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Label shown on the risk status card.
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
        }
    }

    /// One-line advisory shown beneath the risk label.
    pub fn advisory(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Water levels are normal. No immediate threat.",
            RiskLevel::Medium => "Water levels are elevated. Stay alert and monitor updates.",
            RiskLevel::High => "Critical water levels detected. Prepare for evacuation.",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

// ---------------------------------------------------------------------------
// Floodgate types
// ---------------------------------------------------------------------------

/// A settled floodgate position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatePosition {
    Open,
    Closed,
}

impl GatePosition {
    pub fn opposite(self) -> Self {
        match self {
            GatePosition::Open => GatePosition::Closed,
            GatePosition::Closed => GatePosition::Open,
        }
    }
}

impl std::fmt::Display for GatePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatePosition::Open => write!(f, "Open"),
            GatePosition::Closed => write!(f, "Closed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Why a request was refused while the floodgate was not idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyReason {
    /// A toggle is waiting for the user to confirm or cancel.
    AwaitingConfirmation,
    /// The gate is moving; actuation runs to completion.
    Actuating,
}

impl std::fmt::Display for BusyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BusyReason::AwaitingConfirmation => write!(f, "awaiting confirmation"),
            BusyReason::Actuating => write!(f, "actuating"),
        }
    }
}

/// Errors raised by configuration loading and by the monitor's state machines.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorError {
    /// The configuration file could not be read.
    ConfigRead(String),
    /// The configuration file is not valid TOML or has the wrong shape.
    ConfigParse(String),
    /// Configuration values are inconsistent (e.g. non-monotonic thresholds).
    Configuration(String),
    /// A floodgate toggle was requested while a previous one is still in flight.
    Busy(BusyReason),
    /// A refresh was requested while another refresh is still resolving.
    AlreadyRefreshing,
    /// Confirm or cancel was issued with no toggle pending.
    NoPendingAction,
}

impl MonitorError {
    /// True for both kinds of "come back later" rejection.
    pub fn is_busy(&self) -> bool {
        matches!(self, MonitorError::Busy(_) | MonitorError::AlreadyRefreshing)
    }
}

impl std::fmt::Display for MonitorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonitorError::ConfigRead(msg) => write!(f, "Failed to read configuration: {}", msg),
            MonitorError::ConfigParse(msg) => write!(f, "Failed to parse configuration: {}", msg),
            MonitorError::Configuration(msg) => write!(f, "Invalid configuration: {}", msg),
            MonitorError::Busy(reason) => write!(f, "Floodgate busy: {}", reason),
            MonitorError::AlreadyRefreshing => write!(f, "A refresh is already in progress"),
            MonitorError::NoPendingAction => write!(f, "No floodgate action is pending"),
        }
    }
}

impl std::error::Error for MonitorError {}
