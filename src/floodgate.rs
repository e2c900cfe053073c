//! Home floodgate control: a confirm-then-actuate state machine.
//!
//! ```text
//!            request_toggle()              confirm()
//!  Open ──────────────────► Pending(Closed) ──────────► Actuating(Closed)
//!   ▲                           │ cancel()                     │
//!   │◄──────────────────────────┘                              │ tick() >= delay
//!   │                                                          ▼
//!   │         Actuating(Open) ◄──── Pending(Open) ◄────────  Closed
//!   └──────────────────┘  tick() >= delay      confirm()  request_toggle()
//! ```
//!
//! Every mutation goes through the transition methods. Presentation reads
//! `state()` and the returned `FloodgateEvent`s; it never flips the gate
//! directly. A toggle while a previous one is pending or actuating is
//! rejected with `MonitorError::Busy`. Actuation cannot be cancelled.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::logging::{self, Component};
use crate::model::{BusyReason, GatePosition, MonitorError};

/// Time the gate takes to physically open or close.
pub const ACTUATION_DELAY: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "target", rename_all = "snake_case")]
pub enum FloodgateState {
    Open,
    Closed,
    PendingConfirmation(GatePosition),
    Actuating(GatePosition),
}

impl FloodgateState {
    fn settled(position: GatePosition) -> Self {
        match position {
            GatePosition::Open => FloodgateState::Open,
            GatePosition::Closed => FloodgateState::Closed,
        }
    }
}

/// What changed as a result of a transition; drives the confirmation prompt
/// and the progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloodgateEvent {
    ConfirmationRequested(GatePosition),
    ActuationStarted(GatePosition),
    Cancelled(GatePosition),
    Settled(GatePosition),
}

/// The most recent completed actuation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GateAction {
    pub position: GatePosition,
    pub at: DateTime<Utc>,
}

/// Copy for the confirmation dialog shown while a toggle is pending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfirmationPrompt {
    pub title: &'static str,
    pub message: &'static str,
    pub action: &'static str,
    /// Opening the gate while water is high is the risky direction.
    pub is_warning: bool,
}

impl ConfirmationPrompt {
    fn for_target(target: GatePosition) -> Self {
        match target {
            GatePosition::Closed => ConfirmationPrompt {
                title: "Close Floodgate?",
                message: "This will activate your home floodgate to protect against flooding. \
                          Make sure you are ready to close the floodgate.",
                action: "Close Gate",
                is_warning: false,
            },
            GatePosition::Open => ConfirmationPrompt {
                title: "Open Floodgate?",
                message: "This will open your home floodgate. Only do this when water levels \
                          are safe and flooding risk is low.",
                action: "Open Gate",
                is_warning: true,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct FloodgateControl {
    state: FloodgateState,
    stable: GatePosition,
    actuation_delay: Duration,
    actuation_elapsed: Duration,
    last_action: Option<GateAction>,
}

impl Default for FloodgateControl {
    fn default() -> Self {
        Self::new(ACTUATION_DELAY)
    }
}

impl FloodgateControl {
    /// Starts open, with no recorded action.
    pub fn new(actuation_delay: Duration) -> Self {
        Self {
            state: FloodgateState::Open,
            stable: GatePosition::Open,
            actuation_delay,
            actuation_elapsed: Duration::ZERO,
            last_action: None,
        }
    }

    pub fn state(&self) -> FloodgateState {
        self.state
    }

    /// Last settled position. During pending/actuating this is still the
    /// position the gate is physically in.
    pub fn stable_state(&self) -> GatePosition {
        self.stable
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, FloodgateState::Open | FloodgateState::Closed)
    }

    pub fn last_action(&self) -> Option<GateAction> {
        self.last_action
    }

    pub fn actuation_delay(&self) -> Duration {
        self.actuation_delay
    }

    /// Ask to move the gate to the opposite position.
    pub fn request_toggle(&mut self) -> Result<FloodgateEvent, MonitorError> {
        match self.state {
            FloodgateState::Open | FloodgateState::Closed => {
                let target = self.stable.opposite();
                self.state = FloodgateState::PendingConfirmation(target);
                logging::debug(
                    Component::Floodgate,
                    &format!("toggle requested: {} -> {}", self.stable, target),
                );
                Ok(FloodgateEvent::ConfirmationRequested(target))
            }
            FloodgateState::PendingConfirmation(_) => {
                let err = MonitorError::Busy(BusyReason::AwaitingConfirmation);
                logging::log_rejection(Component::Floodgate, "toggle", &err);
                Err(err)
            }
            FloodgateState::Actuating(_) => {
                let err = MonitorError::Busy(BusyReason::Actuating);
                logging::log_rejection(Component::Floodgate, "toggle", &err);
                Err(err)
            }
        }
    }

    pub fn confirm(&mut self) -> Result<FloodgateEvent, MonitorError> {
        match self.state {
            FloodgateState::PendingConfirmation(target) => {
                self.state = FloodgateState::Actuating(target);
                self.actuation_elapsed = Duration::ZERO;
                logging::info(
                    Component::Floodgate,
                    &format!("actuation started: {} -> {}", self.stable, target),
                );
                Ok(FloodgateEvent::ActuationStarted(target))
            }
            FloodgateState::Actuating(_) => Err(MonitorError::Busy(BusyReason::Actuating)),
            FloodgateState::Open | FloodgateState::Closed => Err(MonitorError::NoPendingAction),
        }
    }

    /// Abandon a pending toggle; the gate stays where it is.
    pub fn cancel(&mut self) -> Result<FloodgateEvent, MonitorError> {
        match self.state {
            FloodgateState::PendingConfirmation(_) => {
                self.state = FloodgateState::settled(self.stable);
                logging::debug(Component::Floodgate, "toggle cancelled");
                Ok(FloodgateEvent::Cancelled(self.stable))
            }
            FloodgateState::Actuating(_) => Err(MonitorError::Busy(BusyReason::Actuating)),
            FloodgateState::Open | FloodgateState::Closed => Err(MonitorError::NoPendingAction),
        }
    }

    /// Advance the logical clock. Returns `Settled` exactly once, on the tick
    /// where accumulated actuation time reaches the delay.
    pub fn tick(&mut self, elapsed: Duration) -> Option<FloodgateEvent> {
        let FloodgateState::Actuating(target) = self.state else {
            return None;
        };

        self.actuation_elapsed += elapsed;
        if self.actuation_elapsed < self.actuation_delay {
            return None;
        }

        self.actuation_elapsed = Duration::ZERO;
        self.stable = target;
        self.state = FloodgateState::settled(target);
        self.last_action = Some(GateAction {
            position: target,
            at: Utc::now(),
        });
        logging::info(Component::Floodgate, &format!("floodgate {}", target));
        Some(FloodgateEvent::Settled(target))
    }

    /// Remaining actuation time, if the gate is moving.
    pub fn remaining(&self) -> Option<Duration> {
        match self.state {
            FloodgateState::Actuating(_) => {
                Some(self.actuation_delay.saturating_sub(self.actuation_elapsed))
            }
            _ => None,
        }
    }

    /// Dialog copy while a toggle is pending.
    pub fn prompt(&self) -> Option<ConfirmationPrompt> {
        match self.state {
            FloodgateState::PendingConfirmation(target) => {
                Some(ConfirmationPrompt::for_target(target))
            }
            _ => None,
        }
    }

    /// Progress indicator text while the gate is moving.
    pub fn progress_message(&self) -> Option<&'static str> {
        match self.state {
            FloodgateState::Actuating(GatePosition::Closed) => Some("Closing Floodgate..."),
            FloodgateState::Actuating(GatePosition::Open) => Some("Opening Floodgate..."),
            _ => None,
        }
    }

    /// Status line under the gate card.
    pub fn description(&self) -> &'static str {
        match self.stable {
            GatePosition::Closed => {
                "Your home floodgate is currently closed and protecting your property."
            }
            GatePosition::Open => {
                "Your home floodgate is open. Close it when flood risk increases."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close_gate(gate: &mut FloodgateControl) {
        gate.request_toggle().unwrap();
        gate.confirm().unwrap();
        gate.tick(ACTUATION_DELAY);
    }

    #[test]
    fn test_initial_state_is_open() {
        let gate = FloodgateControl::default();
        assert_eq!(gate.state(), FloodgateState::Open);
        assert!(gate.is_idle());
        assert!(gate.last_action().is_none());
    }

    #[test]
    fn test_toggle_confirm_actuate_closes_gate() {
        let mut gate = FloodgateControl::default();

        assert_eq!(
            gate.request_toggle(),
            Ok(FloodgateEvent::ConfirmationRequested(GatePosition::Closed))
        );
        assert_eq!(
            gate.state(),
            FloodgateState::PendingConfirmation(GatePosition::Closed)
        );

        assert_eq!(
            gate.confirm(),
            Ok(FloodgateEvent::ActuationStarted(GatePosition::Closed))
        );
        assert_eq!(gate.state(), FloodgateState::Actuating(GatePosition::Closed));
        assert_eq!(gate.progress_message(), Some("Closing Floodgate..."));

        assert_eq!(gate.tick(Duration::from_millis(1000)), None);
        assert_eq!(gate.remaining(), Some(Duration::from_millis(1500)));
        assert_eq!(gate.stable_state(), GatePosition::Open);

        assert_eq!(
            gate.tick(Duration::from_millis(1500)),
            Some(FloodgateEvent::Settled(GatePosition::Closed))
        );
        assert_eq!(gate.state(), FloodgateState::Closed);
        assert_eq!(gate.last_action().unwrap().position, GatePosition::Closed);
    }

    #[test]
    fn test_cancel_leaves_state_unchanged() {
        let mut gate = FloodgateControl::default();
        gate.request_toggle().unwrap();
        assert_eq!(gate.cancel(), Ok(FloodgateEvent::Cancelled(GatePosition::Open)));
        assert_eq!(gate.state(), FloodgateState::Open);
        assert!(gate.last_action().is_none());
    }

    #[test]
    fn test_toggle_while_actuating_is_busy() {
        let mut gate = FloodgateControl::default();
        gate.request_toggle().unwrap();
        gate.confirm().unwrap();

        let before = gate.state();
        assert_eq!(
            gate.request_toggle(),
            Err(MonitorError::Busy(BusyReason::Actuating))
        );
        assert_eq!(gate.state(), before);
    }

    #[test]
    fn test_toggle_while_pending_is_busy() {
        let mut gate = FloodgateControl::default();
        gate.request_toggle().unwrap();
        assert_eq!(
            gate.request_toggle(),
            Err(MonitorError::Busy(BusyReason::AwaitingConfirmation))
        );
        assert_eq!(
            gate.state(),
            FloodgateState::PendingConfirmation(GatePosition::Closed)
        );
    }

    #[test]
    fn test_actuation_cannot_be_cancelled() {
        let mut gate = FloodgateControl::default();
        gate.request_toggle().unwrap();
        gate.confirm().unwrap();
        assert!(gate.cancel().unwrap_err().is_busy());
        assert_eq!(gate.state(), FloodgateState::Actuating(GatePosition::Closed));
    }

    #[test]
    fn test_confirm_without_pending_is_rejected() {
        let mut gate = FloodgateControl::default();
        assert_eq!(gate.confirm(), Err(MonitorError::NoPendingAction));
        assert_eq!(gate.cancel(), Err(MonitorError::NoPendingAction));
    }

    #[test]
    fn test_settles_exactly_once() {
        let mut gate = FloodgateControl::default();
        gate.request_toggle().unwrap();
        gate.confirm().unwrap();

        let settled: Vec<_> = (0..10)
            .filter_map(|_| gate.tick(Duration::from_millis(1000)))
            .collect();
        assert_eq!(settled, vec![FloodgateEvent::Settled(GatePosition::Closed)]);
    }

    #[test]
    fn test_cycles_back_to_open() {
        let mut gate = FloodgateControl::default();
        close_gate(&mut gate);
        assert_eq!(gate.state(), FloodgateState::Closed);

        assert_eq!(
            gate.request_toggle(),
            Ok(FloodgateEvent::ConfirmationRequested(GatePosition::Open))
        );
        gate.confirm().unwrap();
        assert_eq!(gate.progress_message(), Some("Opening Floodgate..."));
        gate.tick(ACTUATION_DELAY);
        assert_eq!(gate.state(), FloodgateState::Open);
    }

    #[test]
    fn test_prompt_copy_follows_target() {
        let mut gate = FloodgateControl::default();
        assert!(gate.prompt().is_none());

        gate.request_toggle().unwrap();
        let prompt = gate.prompt().unwrap();
        assert_eq!(prompt.title, "Close Floodgate?");
        assert!(!prompt.is_warning);

        gate.confirm().unwrap();
        gate.tick(ACTUATION_DELAY);
        gate.request_toggle().unwrap();
        let prompt = gate.prompt().unwrap();
        assert_eq!(prompt.action, "Open Gate");
        assert!(prompt.is_warning);
    }

    #[test]
    fn test_idle_tick_is_noop() {
        let mut gate = FloodgateControl::default();
        assert_eq!(gate.tick(Duration::from_secs(60)), None);
        assert_eq!(gate.state(), FloodgateState::Open);
    }
}
