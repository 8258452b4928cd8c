//! Per-actuator control state machine
//!
//! ```text
//!           request up/down
//!   Idle ───────────────────► MovingUp ◄──────► MovingDown
//!    ▲                            │   reversal       │
//!    │ cool-down elapsed          │ stop / limit     │ stop / limit
//!    │                            ▼                  ▼
//!    └──────────────────────── CoolDown ◄────────────┘
//! ```
//!
//! A control is advanced by [`Control::process`] once per tick with the
//! current monotonic time. Transitions happen first, then the actuator is
//! driven according to its [`Trigger`].

use std::sync::Arc;

use log::{debug, info, warn};

use super::handle::{ControlHandle, ControlShared};
use super::state::{Action, ControlState, Request};
use crate::config::ControlTimings;
use crate::registry::OutputSwitch;
use crate::traits::{Actuator, Drive, Trigger};

/// One physical actuator and its state machine
pub struct Control {
    shared: Arc<ControlShared>,
    /// Current state
    state: ControlState,
    /// Time the current state was entered (ms)
    state_entered_ms: u64,
    /// Length of the current movement (ms)
    moving_duration_ms: u64,
    /// Last request generation acted on
    seen_generation: u64,
    /// Time of the last hardware command (ms)
    last_command_ms: Option<u64>,
    /// Drive last written to an edge-triggered backend
    applied_drive: Option<Drive>,
    /// Drive whose last write to an edge-triggered backend failed
    failed_drive: Option<Drive>,
    timings: ControlTimings,
    actuator: Option<Box<dyn Actuator>>,
    outputs: OutputSwitch,
}

impl core::fmt::Debug for Control {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Control")
            .field("name", &self.shared.name())
            .field("state", &self.state)
            .field("timings", &self.timings)
            .field("has_actuator", &self.actuator.is_some())
            .finish()
    }
}

impl Control {
    /// Create a control in the idle state
    ///
    /// The name is lowercased. A control without an actuator still runs
    /// its state machine but never touches hardware.
    pub fn new(name: &str, timings: ControlTimings, actuator: Option<Box<dyn Actuator>>) -> Self {
        Self {
            shared: Arc::new(ControlShared::new(name.to_lowercase())),
            state: ControlState::Idle,
            state_entered_ms: 0,
            moving_duration_ms: 0,
            seen_generation: 0,
            last_command_ms: None,
            applied_drive: None,
            failed_drive: None,
            timings,
            actuator,
            outputs: OutputSwitch::default(),
        }
    }

    /// Attach the output switch shared by a registry
    pub(crate) fn with_outputs(mut self, outputs: OutputSwitch) -> Self {
        self.outputs = outputs;
        self
    }

    pub fn name(&self) -> &str {
        self.shared.name()
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn timings(&self) -> &ControlTimings {
        &self.timings
    }

    /// Current desired request
    pub fn desired(&self) -> Request {
        self.shared.desired()
    }

    /// Shared half, for setting desired actions
    pub fn shared(&self) -> &Arc<ControlShared> {
        &self.shared
    }

    /// Weak handle to this control
    pub fn handle(&self) -> ControlHandle {
        ControlHandle::new(&self.shared)
    }

    /// Advance the state machine and drive the actuator
    pub fn process(&mut self, now_ms: u64) {
        self.update_state(now_ms);
        self.drive_output(now_ms);
    }

    fn update_state(&mut self, now_ms: u64) {
        let desired = self.shared.snapshot();
        let elapsed = now_ms.saturating_sub(self.state_entered_ms);

        match self.state {
            ControlState::Idle => {
                if let Some(next) = desired.request.action.moving_state() {
                    self.start_moving(next, desired.request, desired.generation, now_ms);
                }
            }
            ControlState::MovingUp | ControlState::MovingDown => {
                let fresh = desired.generation != self.seen_generation;

                if desired.request.action == Action::Stopped {
                    self.enter_cool_down(now_ms);
                } else if fresh {
                    // Reversal or same-direction extension restarts the timer
                    if let Some(next) = desired.request.action.moving_state() {
                        self.start_moving(next, desired.request, desired.generation, now_ms);
                    }
                } else if elapsed >= self.moving_duration_ms {
                    debug!("{}: moving limit reached", self.name());
                    self.enter_cool_down(now_ms);
                }
            }
            ControlState::CoolDown => {
                self.shared.clear();
                if elapsed >= self.timings.cool_down_ms {
                    self.transition(ControlState::Idle, now_ms);
                }
            }
        }
    }

    fn start_moving(&mut self, next: ControlState, request: Request, generation: u64, now_ms: u64) {
        self.seen_generation = generation;
        self.moving_duration_ms = request.moving_duration_ms(self.timings.moving_limit_ms);
        self.transition(next, now_ms);
    }

    fn enter_cool_down(&mut self, now_ms: u64) {
        self.shared.clear();
        self.transition(ControlState::CoolDown, now_ms);
    }

    fn transition(&mut self, next: ControlState, now_ms: u64) {
        if next != self.state {
            info!("{}: {:?} -> {:?}", self.name(), self.state, next);
        }
        self.state = next;
        self.state_entered_ms = now_ms;
    }

    fn drive_output(&mut self, now_ms: u64) {
        if !self.outputs.is_enabled() {
            // Forget what was written so the drive is re-applied on enable
            self.applied_drive = None;
            return;
        }

        let drive = self.state.drive();
        let interval_elapsed = self.command_interval_elapsed(now_ms);
        let name = self.shared.name();
        let Some(actuator) = self.actuator.as_mut() else {
            return;
        };

        match actuator.trigger() {
            Trigger::Edge => {
                if self.applied_drive == Some(drive) {
                    self.failed_drive = None;
                    return;
                }
                // Changes go out immediately; a failing drive retries once
                // per command interval
                if self.failed_drive == Some(drive) && !interval_elapsed {
                    return;
                }
                self.last_command_ms = Some(now_ms);
                match actuator.apply(drive) {
                    Ok(()) => {
                        self.applied_drive = Some(drive);
                        self.failed_drive = None;
                    }
                    Err(e) => {
                        warn!("{}: failed to apply {:?}: {:?}", name, drive, e);
                        self.failed_drive = Some(drive);
                    }
                }
            }
            Trigger::Repeat => {
                if !drive.is_active() || !interval_elapsed {
                    return;
                }
                self.last_command_ms = Some(now_ms);
                if let Err(e) = actuator.apply(drive) {
                    warn!("{}: failed to send {:?} command: {:?}", name, drive, e);
                }
            }
        }
    }

    fn command_interval_elapsed(&self, now_ms: u64) -> bool {
        match self.last_command_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.timings.command_interval_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::ControlMode;
    use crate::traits::ActuatorError;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// Actuator that records every drive it is given
    struct MockActuator {
        trigger: Trigger,
        log: Arc<Mutex<Vec<Drive>>>,
        fail: Arc<AtomicBool>,
    }

    fn mock(trigger: Trigger) -> (Box<dyn Actuator>, Arc<Mutex<Vec<Drive>>>, Arc<AtomicBool>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let fail = Arc::new(AtomicBool::new(false));
        let actuator = MockActuator {
            trigger,
            log: log.clone(),
            fail: fail.clone(),
        };
        (Box::new(actuator), log, fail)
    }

    impl Actuator for MockActuator {
        fn trigger(&self) -> Trigger {
            self.trigger
        }

        fn apply(&mut self, drive: Drive) -> Result<(), ActuatorError> {
            self.log.lock().unwrap().push(drive);
            if self.fail.load(Ordering::SeqCst) {
                Err(ActuatorError::Write)
            } else {
                Ok(())
            }
        }
    }

    fn timings() -> ControlTimings {
        ControlTimings {
            moving_limit_ms: 10_000,
            cool_down_ms: 5_000,
            command_interval_ms: 2_000,
        }
    }

    #[test]
    fn test_new_control_is_idle() {
        let control = Control::new("Back", timings(), None);
        assert_eq!(control.name(), "back");
        assert_eq!(control.state(), ControlState::Idle);
        assert_eq!(control.desired(), Request::stopped());
    }

    #[test]
    fn test_moves_until_limit_then_cools_down() {
        let mut control = Control::new("back", timings(), None);
        control
            .shared()
            .set_desired_action(Action::MovingUp, ControlMode::Timed, 100);

        control.process(1_000);
        assert_eq!(control.state(), ControlState::MovingUp);

        control.process(10_999);
        assert_eq!(control.state(), ControlState::MovingUp);

        control.process(11_000);
        assert_eq!(control.state(), ControlState::CoolDown);
        assert_eq!(control.desired().action, Action::Stopped);
    }

    #[test]
    fn test_timed_request_uses_percentage() {
        let mut control = Control::new("legs", timings(), None);
        control
            .shared()
            .set_desired_action(Action::MovingDown, ControlMode::Timed, 30);

        control.process(0);
        assert_eq!(control.state(), ControlState::MovingDown);
        control.process(2_999);
        assert_eq!(control.state(), ControlState::MovingDown);
        control.process(3_000);
        assert_eq!(control.state(), ControlState::CoolDown);
    }

    #[test]
    fn test_stop_request_enters_cool_down() {
        let mut control = Control::new("back", timings(), None);
        control
            .shared()
            .set_desired_action(Action::MovingUp, ControlMode::Manual, 100);
        control.process(0);

        control.shared().stop();
        control.process(500);
        assert_eq!(control.state(), ControlState::CoolDown);
    }

    #[test]
    fn test_cool_down_drops_requests() {
        let mut control = Control::new("back", timings(), None);
        control
            .shared()
            .set_desired_action(Action::MovingUp, ControlMode::Manual, 100);
        control.process(0);
        control.shared().stop();
        control.process(100);
        assert_eq!(control.state(), ControlState::CoolDown);

        control
            .shared()
            .set_desired_action(Action::MovingDown, ControlMode::Manual, 100);
        control.process(200);
        assert_eq!(control.state(), ControlState::CoolDown);
        assert_eq!(control.desired().action, Action::Stopped);

        control.process(5_100);
        assert_eq!(control.state(), ControlState::Idle);

        // The request made during cool-down is gone
        control.process(5_200);
        assert_eq!(control.state(), ControlState::Idle);
    }

    #[test]
    fn test_direct_reversal_restarts_timer() {
        let mut control = Control::new("elev", timings(), None);
        control
            .shared()
            .set_desired_action(Action::MovingUp, ControlMode::Manual, 100);
        control.process(0);

        control
            .shared()
            .set_desired_action(Action::MovingDown, ControlMode::Timed, 50);
        control.process(8_000);
        assert_eq!(control.state(), ControlState::MovingDown);

        // 50% of the limit, counted from the reversal
        control.process(12_999);
        assert_eq!(control.state(), ControlState::MovingDown);
        control.process(13_000);
        assert_eq!(control.state(), ControlState::CoolDown);
    }

    #[test]
    fn test_same_direction_request_extends_movement() {
        let mut control = Control::new("back", timings(), None);
        control
            .shared()
            .set_desired_action(Action::MovingUp, ControlMode::Timed, 20);
        control.process(0);

        control
            .shared()
            .set_desired_action(Action::MovingUp, ControlMode::Timed, 20);
        control.process(1_500);
        control.process(3_000);
        assert_eq!(control.state(), ControlState::MovingUp);
        control.process(3_500);
        assert_eq!(control.state(), ControlState::CoolDown);
    }

    #[test]
    fn test_zero_limit_cools_down_on_next_tick() {
        let mut control = Control::new("back", ControlTimings::clamped(-10, 0, 0), None);
        control
            .shared()
            .set_desired_action(Action::MovingUp, ControlMode::Manual, 100);
        control.process(0);
        assert_eq!(control.state(), ControlState::MovingUp);
        control.process(0);
        assert_eq!(control.state(), ControlState::CoolDown);
        control.process(0);
        assert_eq!(control.state(), ControlState::Idle);
    }

    #[test]
    fn test_edge_backend_applies_on_change_only() {
        let (actuator, log, _) = mock(Trigger::Edge);
        let mut control = Control::new("back", timings(), Some(actuator));

        control.process(0);
        control
            .shared()
            .set_desired_action(Action::MovingUp, ControlMode::Manual, 100);
        for t in (100..1_000).step_by(100) {
            control.process(t);
        }
        control
            .shared()
            .set_desired_action(Action::MovingDown, ControlMode::Manual, 100);
        control.process(1_000);
        control.shared().stop();
        control.process(1_100);
        control.process(1_200);

        assert_eq!(
            *log.lock().unwrap(),
            vec![Drive::Off, Drive::Up, Drive::Down, Drive::Off]
        );
    }

    #[test]
    fn test_edge_backend_failure_retries_per_interval() {
        let (actuator, log, fail) = mock(Trigger::Edge);
        let mut control = Control::new("back", timings(), Some(actuator));
        fail.store(true, Ordering::SeqCst);

        control.process(0);
        control.process(100);
        control.process(1_999);
        assert_eq!(log.lock().unwrap().len(), 1);

        fail.store(false, Ordering::SeqCst);
        control.process(2_000);
        control.process(2_100);
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_edge_failure_forgotten_once_drive_settles() {
        let (actuator, log, fail) = mock(Trigger::Edge);
        let timings = ControlTimings {
            cool_down_ms: 0,
            ..timings()
        };
        let mut control = Control::new("back", timings, Some(actuator));
        control.process(0);

        fail.store(true, Ordering::SeqCst);
        control
            .shared()
            .set_desired_action(Action::MovingUp, ControlMode::Manual, 100);
        control.process(100);
        fail.store(false, Ordering::SeqCst);

        // Stopping brings the drive back to the applied Off
        control.shared().stop();
        control.process(200);
        control.process(300);
        assert_eq!(control.state(), ControlState::Idle);

        control
            .shared()
            .set_desired_action(Action::MovingUp, ControlMode::Manual, 100);
        control.process(400);
        assert_eq!(control.state(), ControlState::MovingUp);
        assert_eq!(*log.lock().unwrap(), vec![Drive::Off, Drive::Up, Drive::Up]);
    }

    #[test]
    fn test_huge_moving_limit_does_not_overflow() {
        let mut control = Control::new("back", ControlTimings::clamped(i64::MAX, 0, 0), None);
        control
            .shared()
            .set_desired_action(Action::MovingUp, ControlMode::Timed, 50);

        control.process(0);
        assert_eq!(control.state(), ControlState::MovingUp);
        control.process(u64::MAX / 8);
        assert_eq!(control.state(), ControlState::MovingUp);
    }

    #[test]
    fn test_repeat_backend_sends_once_per_interval() {
        let (actuator, log, _) = mock(Trigger::Repeat);
        let mut control = Control::new("back", timings(), Some(actuator));
        control
            .shared()
            .set_desired_action(Action::MovingUp, ControlMode::Manual, 100);

        for t in (0..=5_000).step_by(100) {
            control.process(t);
        }
        assert_eq!(*log.lock().unwrap(), vec![Drive::Up, Drive::Up, Drive::Up]);
    }

    #[test]
    fn test_repeat_backend_silent_when_off() {
        let (actuator, log, _) = mock(Trigger::Repeat);
        let mut control = Control::new("back", timings(), Some(actuator));

        for t in (0..=5_000).step_by(100) {
            control.process(t);
        }
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_disabled_outputs_suppress_io_but_not_state() {
        let (actuator, log, _) = mock(Trigger::Edge);
        let outputs = OutputSwitch::default();
        let mut control =
            Control::new("back", timings(), Some(actuator)).with_outputs(outputs.clone());

        outputs.set_enabled(false);
        control
            .shared()
            .set_desired_action(Action::MovingUp, ControlMode::Manual, 100);
        control.process(0);
        assert_eq!(control.state(), ControlState::MovingUp);
        assert!(log.lock().unwrap().is_empty());

        outputs.set_enabled(true);
        control.process(100);
        assert_eq!(*log.lock().unwrap(), vec![Drive::Up]);
    }

    proptest! {
        #[test]
        fn prop_repeat_writes_respect_interval(gaps in prop::collection::vec(1u64..3_000, 1..200)) {
            let (actuator, log, _) = mock(Trigger::Repeat);
            let mut control = Control::new("back", timings(), Some(actuator));
            control
                .shared()
                .set_desired_action(Action::MovingUp, ControlMode::Manual, 100);

            let mut now = 0;
            let mut sent_at = Vec::new();
            for gap in gaps {
                let before = log.lock().unwrap().len();
                control.process(now);
                if log.lock().unwrap().len() > before {
                    sent_at.push(now);
                }
                now += gap;
            }

            for pair in sent_at.windows(2) {
                prop_assert!(pair[1] - pair[0] >= 2_000);
            }
        }
    }
}
