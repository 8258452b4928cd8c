//! Actuator backend traits
//!
//! A control drives exactly one actuator backend. Two kinds exist:
//!
//! - Pin backends switch relay outputs directly. They only need to be told
//!   when the drive changes ([`Trigger::Edge`]).
//! - Command-string backends send a text command to a microcontroller,
//!   which keeps the motor running only while commands keep arriving. They
//!   need the command repeated while moving ([`Trigger::Repeat`]).

/// Output requested from an actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Drive {
    /// Both directions inactive
    #[default]
    Off,
    /// Drive the "up" direction
    Up,
    /// Drive the "down" direction
    Down,
}

impl Drive {
    /// Check if any direction is driven
    pub fn is_active(&self) -> bool {
        !matches!(self, Drive::Off)
    }
}

/// How an actuator expects to be driven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Apply once per drive change
    Edge,
    /// Re-send periodically while a direction is driven; nothing is sent
    /// while off
    Repeat,
}

/// Errors that can occur driving an actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// A pin could not be set
    Pin(u32),
    /// The serial write failed
    Write,
    /// The serial write was cut short
    ShortWrite {
        /// Bytes that made it out
        written: usize,
        /// Bytes in the command
        expected: usize,
    },
}

/// Actuator backend driven by a control
pub trait Actuator: Send {
    /// How this actuator wants to be driven
    fn trigger(&self) -> Trigger;

    /// Apply a drive to the hardware
    fn apply(&mut self, drive: Drive) -> Result<(), ActuatorError>;
}

/// Shared enable line for all actuator outputs
///
/// Disabling the gate cuts power to every actuator at once, independently
/// of what each control thinks it is doing.
pub trait OutputGate: Send {
    /// Enable or disable hardware output
    fn set_outputs_enabled(&mut self, enabled: bool) -> Result<(), ActuatorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drive_activity() {
        assert!(!Drive::Off.is_active());
        assert!(Drive::Up.is_active());
        assert!(Drive::Down.is_active());
        assert_eq!(Drive::default(), Drive::Off);
    }
}
