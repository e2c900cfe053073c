//! In-memory alert feed shown on the Alerts screen.
//!
//! Alerts come from two places: the seeded sample notifications a fresh
//! session starts with, and risk-level transitions observed by the monitor
//! when a refresh resolves.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::alert::thresholds::ThresholdProfile;
use crate::model::RiskLevel;
use crate::monitor::RefreshOutcome;

/// Alert category, which also drives its badge colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    High,
    Medium,
    Low,
    Info,
}

impl From<RiskLevel> for AlertKind {
    fn from(risk: RiskLevel) -> Self {
        match risk {
            RiskLevel::High => AlertKind::High,
            RiskLevel::Medium => AlertKind::Medium,
            RiskLevel::Low => AlertKind::Low,
        }
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertKind::High => write!(f, "HIGH"),
            AlertKind::Medium => write!(f, "MEDIUM"),
            AlertKind::Low => write!(f, "LOW"),
            AlertKind::Info => write!(f, "INFO"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub id: u32,
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    pub location: String,
    pub raised_at: DateTime<Utc>,
    pub read: bool,
}

impl Alert {
    /// Relative age, e.g. "10 minutes ago" or "1 day ago".
    pub fn age_label(&self, now: DateTime<Utc>) -> String {
        let age = now - self.raised_at;
        let minutes = age.num_minutes();
        let hours = age.num_hours();
        let days = age.num_days();

        if minutes < 1 {
            "Just now".to_string()
        } else if minutes < 60 {
            plural(minutes, "minute")
        } else if hours < 24 {
            plural(hours, "hour")
        } else {
            plural(days, "day")
        }
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

/// Unread-tracking list of alerts. Ids are assigned in insertion order.
#[derive(Debug, Default)]
pub struct AlertFeed {
    alerts: Vec<Alert>,
    next_id: u32,
}

impl AlertFeed {
    pub fn new() -> Self {
        Self {
            alerts: Vec::new(),
            next_id: 1,
        }
    }

    /// Feed pre-populated with the notifications a new session shows.
    pub fn with_samples(now: DateTime<Utc>) -> Self {
        let mut feed = Self::new();
        feed.push(
            AlertKind::High,
            "High Water Level Alert",
            "Water level reached 15.2m at Marikina River. First alarm threshold reached. \
             Prepare for possible evacuation.",
            "Marikina River - Tumana Bridge",
            now - Duration::minutes(10),
        );
        feed.push(
            AlertKind::Medium,
            "Rising Water Level",
            "Water level increasing at 0.3m/hour. Continue monitoring.",
            "Pasig River - C5 Bridge Area",
            now - Duration::hours(1),
        );
        feed.push(
            AlertKind::Info,
            "Weather Advisory",
            "Heavy rainfall expected in the next 6 hours. Monitor water levels closely.",
            "PAGASA Weather Bureau",
            now - Duration::hours(2),
        );
        feed.push(
            AlertKind::Low,
            "Water Level Stable",
            "Manggahan Floodway levels stable at 6.5m. Normal operations.",
            "Manggahan Floodway",
            now - Duration::hours(5),
        );
        feed.push(
            AlertKind::Info,
            "System Update",
            "New sensor installed at Napindan Channel. Now monitoring water levels in real-time.",
            "Taguig - C6 near Napindan Channel",
            now - Duration::days(1),
        );
        feed
    }

    /// Adds an unread alert and returns its id.
    pub fn push(
        &mut self,
        kind: AlertKind,
        title: &str,
        message: &str,
        location: &str,
        at: DateTime<Utc>,
    ) -> u32 {
        // Default-constructed feeds start the counter at 0
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.alerts.push(Alert {
            id,
            kind,
            title: title.to_string(),
            message: message.to_string(),
            location: location.to_string(),
            raised_at: at,
            read: false,
        });
        id
    }

    pub fn push_alert(&mut self, mut alert: Alert) -> u32 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        alert.id = id;
        self.alerts.push(alert);
        id
    }

    /// All alerts, newest first.
    pub fn alerts(&self) -> Vec<&Alert> {
        let mut sorted: Vec<&Alert> = self.alerts.iter().collect();
        sorted.sort_by(|a, b| b.raised_at.cmp(&a.raised_at).then(b.id.cmp(&a.id)));
        sorted
    }

    pub fn get(&self, id: u32) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn unread_count(&self) -> usize {
        self.alerts.iter().filter(|a| !a.read).count()
    }

    /// Returns false if no alert has this id.
    pub fn mark_read(&mut self, id: u32) -> bool {
        match self.alerts.iter_mut().find(|a| a.id == id) {
            Some(alert) => {
                alert.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&mut self) {
        for alert in &mut self.alerts {
            alert.read = true;
        }
    }
}

/// Builds the alert raised when a refresh moves the river into a different
/// risk level. Returns `None` when the risk level did not change.
///
/// The returned alert has id 0; `AlertFeed::push_alert` assigns the real one.
pub fn alert_for_transition(
    outcome: &RefreshOutcome,
    profile: &ThresholdProfile,
    location: &str,
    at: DateTime<Utc>,
) -> Option<Alert> {
    if outcome.previous_risk == outcome.new_risk {
        return None;
    }

    let level = outcome.new_level;
    let (title, message) = if outcome.escalated() {
        match outcome.new_risk {
            RiskLevel::High => (
                "High Water Level Alert",
                format!(
                    "Water level reached {:.1}m. Second alarm threshold ({:.1}m) reached. \
                     Prepare for evacuation.",
                    level,
                    profile.second_alarm()
                ),
            ),
            _ => (
                "Rising Water Level",
                format!(
                    "Water level reached {:.1}m. First alarm threshold ({:.1}m) reached. \
                     Prepare for possible evacuation.",
                    level,
                    profile.first_alarm()
                ),
            ),
        }
    } else {
        match outcome.new_risk {
            RiskLevel::Low => (
                "Water Level Stable",
                format!(
                    "Water level dropped to {:.1}m, below the first alarm ({:.1}m). \
                     Normal operations.",
                    level,
                    profile.first_alarm()
                ),
            ),
            _ => (
                "Water Level Receding",
                format!(
                    "Water level dropped to {:.1}m, below the second alarm ({:.1}m). \
                     Continue monitoring.",
                    level,
                    profile.second_alarm()
                ),
            ),
        }
    };

    Some(Alert {
        id: 0,
        kind: AlertKind::from(outcome.new_risk),
        title: title.to_string(),
        message,
        location: location.to_string(),
        raised_at: at,
        read: false,
    })
}
