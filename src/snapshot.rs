/// Serializable dashboard view model.
///
/// Everything a renderer needs for one frame, derived from a `Session` at a
/// given instant. The console driver prints it as JSON with `--json`.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

use crate::alert::thresholds::{
    gauge_zones, scale_marks, AlarmBand, GaugeZone, ThresholdProfile,
};
use crate::analysis::trend::{
    chart_domain, generate_history, reference_line, summarize, TrendPoint, TrendSummary,
};
use crate::floodgate::{ConfirmationPrompt, FloodgateState, GateAction};
use crate::model::{GatePosition, RiskLevel};
use crate::refresh::GesturePhase;
use crate::sensor::SensorHealth;
use crate::session::{Screen, Session};

// ---------------------------------------------------------------------------
// Response Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub screen: Screen,
    pub captured_at: DateTime<Utc>,

    pub level: LevelData,
    pub gauge: GaugeData,
    pub floodgate: FloodgateData,
    pub refresh: RefreshData,
    pub trend: TrendData,

    pub unread_alerts: usize,
    pub sensor_health: SensorHealth,
    pub station_name: String,
    pub station_zone: String,
}

/// Current reading and what it means
#[derive(Debug, Clone, Serialize)]
pub struct LevelData {
    pub meters: f64,
    /// e.g. "15.2m"
    pub display: String,
    pub risk: RiskLevel,
    pub risk_label: &'static str,
    pub advisory: &'static str,
    pub band: AlarmBand,
    pub updated: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GaugeData {
    /// Fill height, 0-100
    pub percent: f64,
    /// Unclamped fraction, may fall outside [0, 1]
    pub raw_fraction: f64,
    pub out_of_range: bool,
    pub zones: Vec<GaugeZone>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FloodgateData {
    pub state: FloodgateState,
    pub stable: GatePosition,
    pub description: &'static str,
    pub prompt: Option<ConfirmationPrompt>,
    pub progress: Option<&'static str>,
    pub last_action: Option<GateAction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshData {
    pub in_flight: bool,
    pub gesture: GesturePhase,
    pub pull_distance: f64,
    pub indicator_rotation: f64,
    pub indicator_scale: f64,
}

/// 24-hour chart series with its axis range and alarm reference line
#[derive(Debug, Clone, Serialize)]
pub struct TrendData {
    pub history: Vec<TrendPoint>,
    /// (min, max) of the y-axis, in meters
    pub domain: (f64, f64),
    pub reference_line: f64,
    pub summary: Option<TrendSummary>,
}

impl TrendData {
    fn capture(now: DateTime<Utc>, profile: &ThresholdProfile) -> Self {
        let history = generate_history(now);
        let summary = summarize(&history);
        TrendData {
            history,
            domain: chart_domain(),
            reference_line: reference_line(profile),
            summary,
        }
    }
}

// ---------------------------------------------------------------------------
// Capture
// ---------------------------------------------------------------------------

impl DashboardSnapshot {
    pub fn capture<R: Rng>(session: &Session<R>, now: DateTime<Utc>) -> Self {
        let monitor = session.monitor();
        let profile = monitor.profile();
        let risk = monitor.risk();
        let gauge = monitor.gauge();
        let floodgate = session.floodgate();
        let gesture = session.gesture();

        DashboardSnapshot {
            screen: session.screen(),
            captured_at: now,
            level: LevelData {
                meters: monitor.level(),
                display: format!("{:.1}m", monitor.level()),
                risk,
                risk_label: risk.label(),
                advisory: risk.advisory(),
                band: monitor.band(),
                updated: monitor.reading().updated_label(now),
            },
            gauge: GaugeData {
                percent: gauge.percent(),
                raw_fraction: gauge.raw(),
                out_of_range: gauge.is_out_of_range(),
                zones: gauge_zones(profile),
                scale: scale_marks(profile),
            },
            floodgate: FloodgateData {
                state: floodgate.state(),
                stable: floodgate.stable_state(),
                description: floodgate.description(),
                prompt: floodgate.prompt(),
                progress: floodgate.progress_message(),
                last_action: floodgate.last_action(),
            },
            refresh: RefreshData {
                in_flight: monitor.is_refreshing(),
                gesture: gesture.phase(),
                pull_distance: gesture.pull_distance(),
                indicator_rotation: gesture.indicator_rotation(),
                indicator_scale: gesture.indicator_scale(),
            },
            trend: TrendData::capture(now, profile),
            unread_alerts: session.alerts().unread_count(),
            sensor_health: session.sensor().health(),
            station_name: session.station().name.clone(),
            station_zone: session.station().zone.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
