//! Control states and desired-action requests

use crate::traits::Drive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Control state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ControlState {
    /// At rest, accepting requests
    #[default]
    Idle,
    /// Driving the "up" direction
    MovingUp,
    /// Driving the "down" direction
    MovingDown,
    /// Resting after a movement; requests are dropped
    CoolDown,
}

impl ControlState {
    /// Check if this is one of the moving states
    pub fn is_moving(&self) -> bool {
        matches!(self, ControlState::MovingUp | ControlState::MovingDown)
    }

    /// Output drive that corresponds to this state
    pub fn drive(&self) -> Drive {
        match self {
            ControlState::MovingUp => Drive::Up,
            ControlState::MovingDown => Drive::Down,
            ControlState::Idle | ControlState::CoolDown => Drive::Off,
        }
    }
}

/// Action requested of a control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Action {
    #[default]
    Stopped,
    MovingUp,
    MovingDown,
}

impl Action {
    /// Name used in the report journal
    pub fn report_name(&self) -> &'static str {
        match self {
            Action::Stopped => "stop",
            Action::MovingUp => "move up",
            Action::MovingDown => "move down",
        }
    }

    /// Moving state this action leads to, if any
    pub fn moving_state(&self) -> Option<ControlState> {
        match self {
            Action::Stopped => None,
            Action::MovingUp => Some(ControlState::MovingUp),
            Action::MovingDown => Some(ControlState::MovingDown),
        }
    }
}

/// How long a movement lasts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ControlMode {
    /// Until stopped, or until the full moving limit
    #[default]
    Manual,
    /// For a percentage of the moving limit
    Timed,
}

/// A desired-action request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub action: Action,
    pub mode: ControlMode,
    /// Percentage of the moving limit (TIMED only, 0-100)
    pub percent: u8,
}

impl Default for Request {
    fn default() -> Self {
        Self::stopped()
    }
}

impl Request {
    /// Build a request; the percentage is clamped to 100
    pub fn new(action: Action, mode: ControlMode, percent: u8) -> Self {
        Self {
            action,
            mode,
            percent: percent.min(100),
        }
    }

    /// The "stop" request
    pub fn stopped() -> Self {
        Self::new(Action::Stopped, ControlMode::Manual, 100)
    }

    /// Moving duration for this request given a moving limit
    pub fn moving_duration_ms(&self, moving_limit_ms: u64) -> u64 {
        match self.mode {
            ControlMode::Manual => moving_limit_ms,
            ControlMode::Timed => {
                let scaled = u128::from(moving_limit_ms) * u128::from(self.percent) / 100;
                u64::try_from(scaled).unwrap_or(moving_limit_ms)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_drive() {
        assert_eq!(ControlState::Idle.drive(), Drive::Off);
        assert_eq!(ControlState::MovingUp.drive(), Drive::Up);
        assert_eq!(ControlState::MovingDown.drive(), Drive::Down);
        assert_eq!(ControlState::CoolDown.drive(), Drive::Off);
        assert!(ControlState::MovingDown.is_moving());
        assert!(!ControlState::CoolDown.is_moving());
    }

    #[test]
    fn test_report_names() {
        assert_eq!(Action::Stopped.report_name(), "stop");
        assert_eq!(Action::MovingUp.report_name(), "move up");
        assert_eq!(Action::MovingDown.report_name(), "move down");
    }

    #[test]
    fn test_request_duration() {
        let timed = Request::new(Action::MovingUp, ControlMode::Timed, 50);
        assert_eq!(timed.moving_duration_ms(100_000), 50_000);

        let manual = Request::new(Action::MovingUp, ControlMode::Manual, 50);
        assert_eq!(manual.moving_duration_ms(100_000), 100_000);

        let clamped = Request::new(Action::MovingDown, ControlMode::Timed, 200);
        assert_eq!(clamped.percent, 100);
        assert_eq!(clamped.moving_duration_ms(100_000), 100_000);
    }

    #[test]
    fn test_request_duration_with_huge_limit() {
        let half = Request::new(Action::MovingUp, ControlMode::Timed, 50);
        assert_eq!(half.moving_duration_ms(u64::MAX), u64::MAX / 2);

        let limit = i64::MAX as u64;
        let full = Request::new(Action::MovingUp, ControlMode::Timed, 100);
        assert_eq!(full.moving_duration_ms(limit), limit);
        assert_eq!(half.moving_duration_ms(limit), limit / 2);
    }
}
