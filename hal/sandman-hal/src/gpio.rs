//! GPIO pin abstractions
//!
//! Provides traits for the digital outputs that drive actuator relays and
//! the shared motor-driver enable line.

/// Error reported by a pin implementation
///
/// Host pins are backed by files, so any operation can fail. The error only
/// records the pin number; the implementation logs the underlying cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinError {
    /// Pin number that failed
    pub pin: u32,
}

/// Digital output pin
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self) -> Result<(), PinError>;

    /// Set the pin low (logic 0)
    fn set_low(&mut self) -> Result<(), PinError>;

    /// Set the pin to a specific level
    fn set_state(&mut self, high: bool) -> Result<(), PinError> {
        if high {
            self.set_high()
        } else {
            self.set_low()
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Output pin that can also be released to high impedance
///
/// Used for enable lines where "off" means not driving the line at all,
/// letting the driver board's own pull resistor decide.
pub trait TriStatePin: OutputPin {
    /// Stop driving the pin (high impedance)
    fn release(&mut self) -> Result<(), PinError>;

    /// Check if the pin is currently released
    fn is_released(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockPin {
        high: bool,
        fail: bool,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) -> Result<(), PinError> {
            if self.fail {
                return Err(PinError { pin: 4 });
            }
            self.high = true;
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), PinError> {
            if self.fail {
                return Err(PinError { pin: 4 });
            }
            self.high = false;
            Ok(())
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_set_state_dispatches_to_level() {
        let mut pin = MockPin { high: false, fail: false };

        pin.set_state(true).unwrap();
        assert!(pin.is_set_high());

        pin.set_state(false).unwrap();
        assert!(pin.is_set_low());
    }

    #[test]
    fn test_set_state_propagates_error() {
        let mut pin = MockPin { high: false, fail: true };
        assert_eq!(pin.set_state(true), Err(PinError { pin: 4 }));
        assert!(pin.is_set_low());
    }
}
