//! Pull-to-refresh gesture state.
//!
//! Tracks a downward drag from the top of the dashboard. Pulling past the
//! trigger distance and releasing starts a refresh; the indicator stays
//! pinned at the trigger distance until the refresh resolves, then lingers
//! for a short settle delay before snapping back.
//!
//! The gesture is reset on both the success and the failure path: the
//! owner calls `resolve()` either way.

use std::time::Duration;

use serde::Serialize;

/// Pull distance (px) needed to trigger a refresh.
pub const TRIGGER_DISTANCE: f64 = 80.0;
/// Maximum indicator travel (px).
pub const MAX_PULL: f64 = 120.0;
/// Finger travel is scaled by this factor to give the pull some weight.
pub const RESISTANCE: f64 = 0.5;
/// Pulls beyond this suppress native scrolling.
pub const SCROLL_LOCK_DISTANCE: f64 = 10.0;
/// How long the indicator lingers after a refresh resolves.
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GesturePhase {
    Idle,
    Pulling,
    Refreshing,
    Settling,
}

/// What happened when the finger lifted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRelease {
    /// Pulled far enough: the owner should start a refresh.
    Triggered,
    /// Not far enough (or already refreshing): nothing to do.
    Released,
}

#[derive(Debug, Clone)]
pub struct PullGesture {
    phase: GesturePhase,
    start_y: Option<f64>,
    pull: f64,
    settle_delay: Duration,
    settle_elapsed: Duration,
}

impl Default for PullGesture {
    fn default() -> Self {
        Self::new(SETTLE_DELAY)
    }
}

impl PullGesture {
    pub fn new(settle_delay: Duration) -> Self {
        Self {
            phase: GesturePhase::Idle,
            start_y: None,
            pull: 0.0,
            settle_delay,
            settle_elapsed: Duration::ZERO,
        }
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// Current indicator offset in px.
    pub fn pull_distance(&self) -> f64 {
        self.pull
    }

    /// True from trigger until the settle delay has run out.
    pub fn is_refreshing(&self) -> bool {
        matches!(self.phase, GesturePhase::Refreshing | GesturePhase::Settling)
    }

    /// Arms the gesture if the content is scrolled to the top.
    pub fn touch_start(&mut self, y: f64, at_top: bool) {
        if at_top && !self.is_refreshing() {
            self.start_y = Some(y);
        }
    }

    /// Tracks the finger. Returns true when native scrolling should be
    /// suppressed.
    pub fn touch_move(&mut self, y: f64, at_top: bool) -> bool {
        if self.is_refreshing() {
            return false;
        }
        let Some(start) = self.start_y else {
            return false;
        };

        let distance = y - start;
        if distance > 0.0 && at_top {
            self.pull = (distance * RESISTANCE).min(MAX_PULL);
            self.phase = GesturePhase::Pulling;
            return self.pull > SCROLL_LOCK_DISTANCE;
        }
        false
    }

    pub fn touch_end(&mut self) -> PullRelease {
        self.start_y = None;

        if self.is_refreshing() {
            return PullRelease::Released;
        }

        if self.pull >= TRIGGER_DISTANCE {
            self.phase = GesturePhase::Refreshing;
            self.pull = TRIGGER_DISTANCE;
            PullRelease::Triggered
        } else {
            self.phase = GesturePhase::Idle;
            self.pull = 0.0;
            PullRelease::Released
        }
    }

    /// The refresh finished, successfully or not. Returns false if the
    /// gesture was not refreshing.
    pub fn resolve(&mut self) -> bool {
        if self.phase != GesturePhase::Refreshing {
            return false;
        }
        self.phase = GesturePhase::Settling;
        self.settle_elapsed = Duration::ZERO;
        true
    }

    /// Advance the settle timer. Returns true on the tick the gesture
    /// returns to idle.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if self.phase != GesturePhase::Settling {
            return false;
        }
        self.settle_elapsed += elapsed;
        if self.settle_elapsed < self.settle_delay {
            return false;
        }
        self.phase = GesturePhase::Idle;
        self.pull = 0.0;
        self.settle_elapsed = Duration::ZERO;
        true
    }

    /// Indicator rotation in degrees.
    pub fn indicator_rotation(&self) -> f64 {
        if self.is_refreshing() {
            360.0
        } else {
            self.pull / TRIGGER_DISTANCE * 180.0
        }
    }

    /// Indicator scale, reaching 1.0 at the trigger distance.
    pub fn indicator_scale(&self) -> f64 {
        (self.pull / TRIGGER_DISTANCE).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pull_to(gesture: &mut PullGesture, finger_travel: f64) {
        gesture.touch_start(100.0, true);
        gesture.touch_move(100.0 + finger_travel, true);
    }

    #[test]
    fn test_short_pull_releases_without_refresh() {
        let mut g = PullGesture::default();
        pull_to(&mut g, 100.0);
        assert_eq!(g.pull_distance(), 50.0);
        assert_eq!(g.touch_end(), PullRelease::Released);
        assert_eq!(g.pull_distance(), 0.0);
        assert_eq!(g.phase(), GesturePhase::Idle);
    }

    #[test]
    fn test_long_pull_triggers_and_pins_indicator() {
        let mut g = PullGesture::default();
        pull_to(&mut g, 200.0);
        assert_eq!(g.pull_distance(), 100.0);
        assert_eq!(g.touch_end(), PullRelease::Triggered);
        assert_eq!(g.pull_distance(), TRIGGER_DISTANCE);
        assert!(g.is_refreshing());
        assert_eq!(g.indicator_rotation(), 360.0);
    }

    #[test]
    fn test_pull_is_capped() {
        let mut g = PullGesture::default();
        pull_to(&mut g, 1000.0);
        assert_eq!(g.pull_distance(), MAX_PULL);
        assert_eq!(g.indicator_scale(), 1.0);
    }

    #[test]
    fn test_not_armed_unless_at_top() {
        let mut g = PullGesture::default();
        g.touch_start(100.0, false);
        assert!(!g.touch_move(400.0, true));
        assert_eq!(g.pull_distance(), 0.0);
    }

    #[test]
    fn test_upward_drag_ignored() {
        let mut g = PullGesture::default();
        g.touch_start(300.0, true);
        assert!(!g.touch_move(200.0, true));
        assert_eq!(g.phase(), GesturePhase::Idle);
    }

    #[test]
    fn test_scroll_lock_past_ten_px() {
        let mut g = PullGesture::default();
        g.touch_start(0.0, true);
        assert!(!g.touch_move(20.0, true));
        assert!(g.touch_move(22.0, true));
    }

    #[test]
    fn test_resolve_then_settle_resets() {
        let mut g = PullGesture::default();
        pull_to(&mut g, 200.0);
        g.touch_end();

        assert!(g.resolve());
        assert_eq!(g.phase(), GesturePhase::Settling);
        assert!(g.is_refreshing());
        assert!(!g.tick(Duration::from_millis(300)));
        assert!(g.tick(Duration::from_millis(200)));
        assert_eq!(g.phase(), GesturePhase::Idle);
        assert_eq!(g.pull_distance(), 0.0);
    }

    #[test]
    fn test_moves_ignored_while_refreshing() {
        let mut g = PullGesture::default();
        pull_to(&mut g, 200.0);
        g.touch_end();

        g.touch_start(0.0, true);
        assert!(!g.touch_move(500.0, true));
        assert_eq!(g.pull_distance(), TRIGGER_DISTANCE);
        assert_eq!(g.touch_end(), PullRelease::Released);
        assert!(g.is_refreshing());
    }

    #[test]
    fn test_resolve_when_idle_is_noop() {
        let mut g = PullGesture::default();
        assert!(!g.resolve());
        assert!(!g.tick(SETTLE_DELAY));
    }

    #[test]
    fn test_indicator_follows_pull() {
        let mut g = PullGesture::default();
        pull_to(&mut g, 80.0);
        assert_eq!(g.pull_distance(), 40.0);
        assert_eq!(g.indicator_rotation(), 90.0);
        assert_eq!(g.indicator_scale(), 0.5);
    }
}
