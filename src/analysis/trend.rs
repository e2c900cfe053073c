/// 24-hour water level trend for the dashboard chart.
///
/// There is no historical store behind this; `generate_history` produces the
/// same synthetic rising curve every session, anchored at the current time.
/// `summarize` works on any series, so a real history could replace it.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::Serialize;

use crate::alert::thresholds::ThresholdProfile;
use crate::simulator::round_tenth;

/// Number of hourly points shown on the chart.
pub const HISTORY_HOURS: i64 = 24;

/// Axis labels are drawn on every Nth hour.
pub const TICK_EVERY_HOURS: u32 = 4;

/// Fixed y-axis range of the chart, in meters.
pub const CHART_DOMAIN: (f64, f64) = (12.0, 16.0);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub at: DateTime<Utc>,
    /// "HH:00"
    pub label: String,
    pub hour: u32,
    pub level: f64,
}

impl TrendPoint {
    pub fn shows_tick(&self) -> bool {
        self.hour % TICK_EVERY_HOURS == 0
    }
}

/// Hourly history for the last 24 hours, oldest first, ending at `now`.
///
/// The curve rises slowly over the first half of the window and faster
/// over the last twelve hours.
pub fn generate_history(now: DateTime<Utc>) -> Vec<TrendPoint> {
    (0..HISTORY_HOURS)
        .rev()
        .map(|hours_ago| {
            let at = now - Duration::hours(hours_ago);
            let hour = at.hour();
            let level = if hours_ago < 12 {
                13.5 + (12 - hours_ago) as f64 * 0.15
            } else {
                13.0 + (23 - hours_ago) as f64 * 0.05
            };
            TrendPoint {
                at,
                label: format!("{:02}:00", hour),
                hour,
                level: round_tenth(level),
            }
        })
        .collect()
}

pub fn chart_domain() -> (f64, f64) {
    CHART_DOMAIN
}

/// Dashed reference line drawn across the chart.
pub fn reference_line(profile: &ThresholdProfile) -> f64 {
    profile.first_alarm()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendSummary {
    pub min: f64,
    pub max: f64,
    pub latest: f64,
    /// Average change per hour between the first and last point.
    pub rise_per_hour: f64,
}

/// Returns `None` for an empty series.
pub fn summarize(points: &[TrendPoint]) -> Option<TrendSummary> {
    let first = points.first()?;
    let last = points.last()?;

    let min = points.iter().map(|p| p.level).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p.level).fold(f64::NEG_INFINITY, f64::max);

    let hours = (last.at - first.at).num_minutes() as f64 / 60.0;
    let rise_per_hour = if hours > 0.0 {
        (last.level - first.level) / hours
    } else {
        0.0
    };

    Some(TrendSummary {
        min,
        max,
        latest: last.level,
        rise_per_hour,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 20, 14, 0, 0).unwrap()
    }

    #[test]
    fn test_history_has_24_hourly_points_ending_now() {
        let now = fixed_now();
        let history = generate_history(now);
        assert_eq!(history.len(), 24);
        assert_eq!(history.last().unwrap().at, now);
        assert_eq!(history.first().unwrap().at, now - Duration::hours(23));
        assert_eq!(history.last().unwrap().label, "14:00");
        assert_eq!(history.first().unwrap().label, "15:00");
    }

    #[test]
    fn test_history_curve_endpoints() {
        let history = generate_history(fixed_now());
        assert_eq!(history.first().unwrap().level, 13.0);
        assert_eq!(history.last().unwrap().level, 15.3);
    }

    #[test]
    fn test_history_never_decreases() {
        let history = generate_history(fixed_now());
        for pair in history.windows(2) {
            assert!(pair[1].level >= pair[0].level, "{:?}", pair);
        }
    }

    #[test]
    fn test_history_stays_inside_chart_domain() {
        let (lo, hi) = chart_domain();
        for point in generate_history(fixed_now()) {
            assert!(point.level >= lo && point.level <= hi);
        }
    }

    #[test]
    fn test_ticks_every_fourth_hour() {
        let history = generate_history(fixed_now());
        let ticks: Vec<u32> = history.iter().filter(|p| p.shows_tick()).map(|p| p.hour).collect();
        assert_eq!(ticks.len(), 6);
        assert!(ticks.iter().all(|h| h % 4 == 0));
    }

    #[test]
    fn test_summary() {
        let history = generate_history(fixed_now());
        let summary = summarize(&history).unwrap();
        assert_eq!(summary.min, 13.0);
        assert_eq!(summary.max, 15.3);
        assert_eq!(summary.latest, 15.3);
        assert!((summary.rise_per_hour - 2.3 / 23.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_of_empty_series() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn test_reference_line_is_first_alarm() {
        assert_eq!(reference_line(&ThresholdProfile::default()), 15.0);
    }
}
