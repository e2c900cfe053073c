//! Water-level threshold profile, risk classification and gauge mapping.
//!
//! Everything here is a pure function of a level and a `ThresholdProfile`.
//! The profile is validated once at construction, so none of the
//! classification or mapping functions can fail at call time.

use serde::{Deserialize, Serialize};

use crate::model::{MonitorError, RiskLevel};

// ---------------------------------------------------------------------------
// Threshold profile
// ---------------------------------------------------------------------------

pub const DEFAULT_NORMAL_M: f64 = 12.0;
pub const DEFAULT_FIRST_ALARM_M: f64 = 15.0;
pub const DEFAULT_SECOND_ALARM_M: f64 = 16.0;
pub const DEFAULT_CRITICAL_M: f64 = 18.0;
pub const DEFAULT_MAX_GAUGE_M: f64 = 20.0;

/// River alarm thresholds, in meters.
///
/// Stage levels in ascending order:
///   normal < first_alarm < second_alarm < critical <= max_gauge
///
/// Fields are private: a profile that violates the ordering cannot be built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdProfile {
    normal: f64,
    first_alarm: f64,
    second_alarm: f64,
    critical: f64,
    max_gauge: f64,
}

impl ThresholdProfile {
    /// Builds a validated profile.
    ///
    /// Fails with `MonitorError::Configuration` if any value is not finite or
    /// the thresholds are not strictly ascending (critical may equal the gauge
    /// ceiling). A zero-height gauge (`max_gauge == normal`) is rejected here
    /// by the same ordering rule.
    pub fn new(
        normal: f64,
        first_alarm: f64,
        second_alarm: f64,
        critical: f64,
        max_gauge: f64,
    ) -> Result<Self, MonitorError> {
        let values = [
            ("normal", normal),
            ("first_alarm", first_alarm),
            ("second_alarm", second_alarm),
            ("critical", critical),
            ("max_gauge", max_gauge),
        ];
        if let Some((name, v)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(MonitorError::Configuration(format!(
                "threshold {} must be finite, got {}",
                name, v
            )));
        }

        if normal >= first_alarm {
            return Err(MonitorError::Configuration(format!(
                "normal ({}) must be below first_alarm ({})",
                normal, first_alarm
            )));
        }
        if first_alarm >= second_alarm {
            return Err(MonitorError::Configuration(format!(
                "first_alarm ({}) must be below second_alarm ({})",
                first_alarm, second_alarm
            )));
        }
        if second_alarm >= critical {
            return Err(MonitorError::Configuration(format!(
                "second_alarm ({}) must be below critical ({})",
                second_alarm, critical
            )));
        }
        if critical > max_gauge {
            return Err(MonitorError::Configuration(format!(
                "critical ({}) must not exceed max_gauge ({})",
                critical, max_gauge
            )));
        }

        Ok(Self {
            normal,
            first_alarm,
            second_alarm,
            critical,
            max_gauge,
        })
    }

    pub fn normal(&self) -> f64 {
        self.normal
    }

    pub fn first_alarm(&self) -> f64 {
        self.first_alarm
    }

    pub fn second_alarm(&self) -> f64 {
        self.second_alarm
    }

    pub fn critical(&self) -> f64 {
        self.critical
    }

    pub fn max_gauge(&self) -> f64 {
        self.max_gauge
    }

    /// Height of the gauge between the normal floor and the ceiling. Always > 0.
    pub fn span(&self) -> f64 {
        self.max_gauge - self.normal
    }
}

impl Default for ThresholdProfile {
    /// Marikina River alert levels.
    fn default() -> Self {
        Self {
            normal: DEFAULT_NORMAL_M,
            first_alarm: DEFAULT_FIRST_ALARM_M,
            second_alarm: DEFAULT_SECOND_ALARM_M,
            critical: DEFAULT_CRITICAL_M,
            max_gauge: DEFAULT_MAX_GAUGE_M,
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Maps a level to a risk level. Boundaries are inclusive on the upper band:
/// exactly `second_alarm` is already `High`.
///
/// Total over all inputs; NaN compares false everywhere and lands in `Low`.
pub fn classify(level: f64, profile: &ThresholdProfile) -> RiskLevel {
    if level >= profile.second_alarm {
        RiskLevel::High
    } else if level >= profile.first_alarm {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// The four painted zones of the gauge pillar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmBand {
    Normal,
    FirstAlarm,
    SecondAlarm,
    Critical,
}

impl AlarmBand {
    pub fn label(&self) -> &'static str {
        match self {
            AlarmBand::Normal => "NORMAL",
            AlarmBand::FirstAlarm => "1ST",
            AlarmBand::SecondAlarm => "2ND",
            AlarmBand::Critical => "CRITICAL",
        }
    }
}

/// Finer-grained alarm band, including the critical (third alarm) zone that
/// `classify` folds into `High`.
pub fn alarm_band(level: f64, profile: &ThresholdProfile) -> AlarmBand {
    if level >= profile.critical {
        AlarmBand::Critical
    } else if level >= profile.second_alarm {
        AlarmBand::SecondAlarm
    } else if level >= profile.first_alarm {
        AlarmBand::FirstAlarm
    } else {
        AlarmBand::Normal
    }
}

// ---------------------------------------------------------------------------
// Gauge mapping
// ---------------------------------------------------------------------------

/// Position of a level on the gauge, relative to the normal floor (0.0) and
/// the ceiling (1.0). The raw value is kept so callers can see out-of-range
/// readings; `clamped` is what gets drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GaugeFraction {
    raw: f64,
}

impl GaugeFraction {
    pub fn raw(&self) -> f64 {
        self.raw
    }

    pub fn clamped(&self) -> f64 {
        if self.raw.is_nan() {
            0.0
        } else {
            self.raw.clamp(0.0, 1.0)
        }
    }

    /// Clamped fill as a percentage of gauge height.
    pub fn percent(&self) -> f64 {
        self.clamped() * 100.0
    }

    pub fn is_out_of_range(&self) -> bool {
        !(0.0..=1.0).contains(&self.raw)
    }
}

/// `(level - normal) / (max_gauge - normal)`, unclamped.
pub fn gauge_fraction(level: f64, profile: &ThresholdProfile) -> GaugeFraction {
    GaugeFraction {
        raw: (level - profile.normal) / profile.span(),
    }
}

/// Geometry of one painted alarm zone, as fractions of gauge height measured
/// from the top of the pillar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GaugeZone {
    pub band: AlarmBand,
    pub top: f64,
    pub height: f64,
}

/// Alarm zones top-down (critical first). Heights sum to 1.0.
pub fn gauge_zones(profile: &ThresholdProfile) -> Vec<GaugeZone> {
    let span = profile.span();
    let from_top = |level: f64| (profile.max_gauge - level) / span;

    let critical_top = 0.0;
    let second_top = from_top(profile.critical);
    let first_top = from_top(profile.second_alarm);
    let normal_top = from_top(profile.first_alarm);

    vec![
        GaugeZone {
            band: AlarmBand::Critical,
            top: critical_top,
            height: second_top - critical_top,
        },
        GaugeZone {
            band: AlarmBand::SecondAlarm,
            top: second_top,
            height: first_top - second_top,
        },
        GaugeZone {
            band: AlarmBand::FirstAlarm,
            top: first_top,
            height: normal_top - first_top,
        },
        GaugeZone {
            band: AlarmBand::Normal,
            top: normal_top,
            height: 1.0 - normal_top,
        },
    ]
}

/// Labelled scale ticks on the pillar, top-down.
pub fn scale_marks(profile: &ThresholdProfile) -> Vec<f64> {
    vec![
        profile.max_gauge,
        profile.critical,
        profile.second_alarm,
        profile.first_alarm,
        profile.normal,
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn defaults() -> ThresholdProfile {
        ThresholdProfile::default()
    }

    // --- Profile construction -----------------------------------------------

    #[test]
    fn test_default_profile_matches_explicit_construction() {
        let built = ThresholdProfile::new(12.0, 15.0, 16.0, 18.0, 20.0).unwrap();
        assert_eq!(built, defaults());
    }

    #[test]
    fn test_non_monotonic_profile_rejected() {
        let result = ThresholdProfile::new(12.0, 10.0, 16.0, 18.0, 20.0);
        assert!(matches!(result, Err(MonitorError::Configuration(_))));
    }

    #[test]
    fn test_zero_height_gauge_rejected() {
        let result = ThresholdProfile::new(12.0, 12.0, 12.0, 12.0, 12.0);
        assert!(matches!(result, Err(MonitorError::Configuration(_))));
    }

    #[test]
    fn test_critical_may_equal_ceiling() {
        let profile = ThresholdProfile::new(12.0, 15.0, 16.0, 20.0, 20.0);
        assert!(profile.is_ok());
    }

    #[test]
    fn test_critical_above_ceiling_rejected() {
        let result = ThresholdProfile::new(12.0, 15.0, 16.0, 21.0, 20.0);
        assert!(matches!(result, Err(MonitorError::Configuration(_))));
    }

    #[test]
    fn test_nan_threshold_rejected() {
        let result = ThresholdProfile::new(12.0, f64::NAN, 16.0, 18.0, 20.0);
        assert!(matches!(result, Err(MonitorError::Configuration(_))));
    }

    // --- Classification -------------------------------------------------------

    #[test]
    fn test_classify_below_first_alarm_is_low() {
        let p = defaults();
        for level in [-5.0, 0.0, 11.9, 12.0, 14.0, 14.99] {
            assert_eq!(classify(level, &p), RiskLevel::Low, "level {}", level);
        }
    }

    #[test]
    fn test_classify_between_alarms_is_medium() {
        let p = defaults();
        for level in [15.0, 15.2, 15.5, 15.99] {
            assert_eq!(classify(level, &p), RiskLevel::Medium, "level {}", level);
        }
    }

    #[test]
    fn test_classify_at_or_above_second_alarm_is_high() {
        let p = defaults();
        for level in [16.0, 17.0, 18.0, 20.0, 35.0] {
            assert_eq!(classify(level, &p), RiskLevel::High, "level {}", level);
        }
    }

    #[test]
    fn test_classify_is_total_for_nan() {
        assert_eq!(classify(f64::NAN, &defaults()), RiskLevel::Low);
    }

    #[test]
    fn test_alarm_bands() {
        let p = defaults();
        assert_eq!(alarm_band(13.0, &p), AlarmBand::Normal);
        assert_eq!(alarm_band(15.0, &p), AlarmBand::FirstAlarm);
        assert_eq!(alarm_band(16.0, &p), AlarmBand::SecondAlarm);
        assert_eq!(alarm_band(17.9, &p), AlarmBand::SecondAlarm);
        assert_eq!(alarm_band(18.0, &p), AlarmBand::Critical);
    }

    // --- Gauge mapping --------------------------------------------------------

    #[test]
    fn test_gauge_fraction_endpoints() {
        let p = defaults();
        assert!((gauge_fraction(12.0, &p).raw() - 0.0).abs() < EPS);
        assert!((gauge_fraction(20.0, &p).raw() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_gauge_fraction_at_current_reading() {
        let g = gauge_fraction(15.2, &defaults());
        assert!((g.raw() - 0.4).abs() < EPS);
        assert!((g.percent() - 40.0).abs() < 1e-6);
        assert!(!g.is_out_of_range());
    }

    #[test]
    fn test_gauge_fraction_is_monotonic() {
        let p = defaults();
        let mut previous = f64::NEG_INFINITY;
        for step in 0..=200 {
            let level = 10.0 + step as f64 * 0.06;
            let raw = gauge_fraction(level, &p).raw();
            assert!(raw > previous, "not increasing at {}", level);
            previous = raw;
        }
    }

    #[test]
    fn test_gauge_fraction_out_of_range_is_clamped_but_visible() {
        let p = defaults();
        let below = gauge_fraction(10.0, &p);
        assert!(below.raw() < 0.0);
        assert!(below.is_out_of_range());
        assert_eq!(below.clamped(), 0.0);

        let above = gauge_fraction(22.0, &p);
        assert!(above.raw() > 1.0);
        assert_eq!(above.clamped(), 1.0);
    }

    #[test]
    fn test_gauge_zones_cover_the_pillar() {
        let zones = gauge_zones(&defaults());
        assert_eq!(zones.len(), 4);
        assert_eq!(zones[0].band, AlarmBand::Critical);
        assert_eq!(zones[3].band, AlarmBand::Normal);

        let total: f64 = zones.iter().map(|z| z.height).sum();
        assert!((total - 1.0).abs() < EPS);

        // 18-20 m on a 12-20 m gauge is the top quarter
        assert!((zones[0].height - 0.25).abs() < EPS);
        // Normal zone starts at 15 m, 5/8 of the way down
        assert!((zones[3].top - 0.625).abs() < EPS);
    }

    #[test]
    fn test_scale_marks_descend() {
        let marks = scale_marks(&defaults());
        assert_eq!(marks, vec![20.0, 18.0, 16.0, 15.0, 12.0]);
    }
}
