/// Home sensor registry entry and health evaluation.
///
/// The homeowner has a single water level sensor. Its metadata comes from
/// the `[sensor]` section of monitor.toml; health is derived from battery
/// and signal readings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Below this battery level the sensor is reported as degraded.
pub const LOW_BATTERY_PERCENT: u8 = 20;

/// Below this signal strength the sensor is reported as degraded.
pub const WEAK_SIGNAL_PERCENT: u8 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorStatus {
    Online,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorHealth {
    Healthy,
    /// Online, but battery or signal is low
    Degraded,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorInfo {
    pub id: u32,
    pub name: String,
    pub location: String,
    pub battery_percent: u8,
    pub signal_percent: u8,
    pub installed: NaiveDate,
    pub status: SensorStatus,
}

impl Default for SensorInfo {
    fn default() -> Self {
        Self {
            id: 1,
            name: "Home Sensor #1".to_string(),
            location: "Marikina Riverbanks, Marikina City".to_string(),
            battery_percent: 87,
            signal_percent: 95,
            installed: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap_or_default(),
            status: SensorStatus::Online,
        }
    }
}

impl SensorInfo {
    pub fn health(&self) -> SensorHealth {
        match self.status {
            SensorStatus::Offline => SensorHealth::Offline,
            SensorStatus::Online
                if self.battery_percent < LOW_BATTERY_PERCENT
                    || self.signal_percent < WEAK_SIGNAL_PERCENT =>
            {
                SensorHealth::Degraded
            }
            SensorStatus::Online => SensorHealth::Healthy,
        }
    }

    /// e.g. "Jan 5, 2026"
    pub fn installed_label(&self) -> String {
        self.installed.format("%b %-d, %Y").to_string()
    }
}
