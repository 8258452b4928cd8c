//! Relay pin-pair actuator
//!
//! One output pin drives the "up" relay and another the "down" relay. The
//! pins can be active-high (default) or active-low for relay boards that
//! pull their inputs up.
//!
//! The two relays must never be energized together. Every change releases
//! the active pin before the opposite one is driven.

use sandman_core::traits::{Actuator, ActuatorError, Drive, Trigger};
use sandman_hal::{OutputPin, PinError};

/// Two relays, one per direction
pub struct PinPairActuator<P> {
    up: P,
    down: P,
    /// If true, relay ON = pin LOW
    active_low: bool,
    /// Current logical drive
    drive: Drive,
}

impl<P: OutputPin> PinPairActuator<P> {
    /// Create a pin-pair actuator with both relays off
    ///
    /// # Arguments
    /// - `up`: pin for the "up" relay
    /// - `down`: pin for the "down" relay
    /// - `active_low`: if true, relays are ON when the pin is LOW
    pub fn new(up: P, down: P, active_low: bool) -> Result<Self, ActuatorError> {
        let mut actuator = Self {
            up,
            down,
            active_low,
            drive: Drive::Off,
        };
        actuator.set_pin(Drive::Up, false)?;
        actuator.set_pin(Drive::Down, false)?;
        Ok(actuator)
    }

    /// Current logical drive
    pub fn drive(&self) -> Drive {
        self.drive
    }

    fn set_pin(&mut self, which: Drive, active: bool) -> Result<(), ActuatorError> {
        let level = active != self.active_low;
        let pin = match which {
            Drive::Down => &mut self.down,
            _ => &mut self.up,
        };
        pin.set_state(level).map_err(|PinError { pin }| ActuatorError::Pin(pin))
    }
}

impl<P: OutputPin + Send> Actuator for PinPairActuator<P> {
    fn trigger(&self) -> Trigger {
        Trigger::Edge
    }

    fn apply(&mut self, drive: Drive) -> Result<(), ActuatorError> {
        // Break before make
        match drive {
            Drive::Off => {
                self.set_pin(Drive::Up, false)?;
                self.set_pin(Drive::Down, false)?;
            }
            Drive::Up => {
                self.set_pin(Drive::Down, false)?;
                self.set_pin(Drive::Up, true)?;
            }
            Drive::Down => {
                self.set_pin(Drive::Up, false)?;
                self.set_pin(Drive::Down, true)?;
            }
        }
        self.drive = drive;
        Ok(())
    }
}
