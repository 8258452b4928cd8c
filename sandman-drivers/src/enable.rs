//! Motor-driver enable line
//!
//! The relay board has a single enable input shared by every actuator.
//! Enabling drives the line to its active level; disabling releases it to
//! high impedance so the board's own pull resistor holds the outputs off.

use log::info;
use sandman_core::traits::{ActuatorError, OutputGate};
use sandman_hal::{PinError, TriStatePin};

/// Output gate backed by a tri-state pin
pub struct EnableLine<P> {
    pin: P,
    /// If true, the line enables outputs when LOW
    active_low: bool,
}

impl<P: TriStatePin> EnableLine<P> {
    /// Create an enable line, released (outputs disabled)
    pub fn new(pin: P, active_low: bool) -> Result<Self, ActuatorError> {
        let mut line = Self { pin, active_low };
        line.pin.release().map_err(pin_error)?;
        Ok(line)
    }

    /// Check if outputs are currently enabled
    pub fn is_enabled(&self) -> bool {
        !self.pin.is_released()
    }
}

fn pin_error(PinError { pin }: PinError) -> ActuatorError {
    ActuatorError::Pin(pin)
}

impl<P: TriStatePin + Send> OutputGate for EnableLine<P> {
    fn set_outputs_enabled(&mut self, enabled: bool) -> Result<(), ActuatorError> {
        if enabled {
            self.pin.set_state(!self.active_low).map_err(pin_error)?;
        } else {
            self.pin.release().map_err(pin_error)?;
        }
        info!("Enable line {}", if enabled { "driven" } else { "released" });
        Ok(())
    }
}
