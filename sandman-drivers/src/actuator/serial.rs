//! Serial command-string actuator
//!
//! The motor controller micro runs a motor only while it keeps receiving
//! that motor's command string, so the control repeats the command at a
//! fixed interval while moving ([`Trigger::Repeat`]) and simply goes quiet
//! to stop.

use log::debug;
use sandman_core::traits::{Actuator, ActuatorError, Drive, Trigger};
use sandman_hal::UartTx;

/// Actuator driven by command strings over a UART
pub struct SerialCommandActuator<U> {
    uart: U,
    up_command: String,
    down_command: String,
}

impl<U: UartTx> SerialCommandActuator<U> {
    /// Create an actuator that sends `up_command` / `down_command`
    pub fn new(uart: U, up_command: impl Into<String>, down_command: impl Into<String>) -> Self {
        Self {
            uart,
            up_command: up_command.into(),
            down_command: down_command.into(),
        }
    }

    /// Command sent for a drive, if any
    pub fn command(&self, drive: Drive) -> Option<&str> {
        match drive {
            Drive::Off => None,
            Drive::Up => Some(&self.up_command),
            Drive::Down => Some(&self.down_command),
        }
    }
}

impl<U: UartTx + Send> Actuator for SerialCommandActuator<U> {
    fn trigger(&self) -> Trigger {
        Trigger::Repeat
    }

    fn apply(&mut self, drive: Drive) -> Result<(), ActuatorError> {
        let command = match drive {
            Drive::Off => return Ok(()),
            Drive::Up => &self.up_command,
            Drive::Down => &self.down_command,
        };

        let written = self.uart.write_str(command).map_err(|e| {
            debug!("Serial write of {:?} failed: {:?}", command, e);
            ActuatorError::Write
        })?;

        if written < command.len() {
            return Err(ActuatorError::ShortWrite {
                written,
                expected: command.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock UART that captures output and can truncate or fail writes
    #[derive(Default)]
    struct MockUart {
        sent: Vec<u8>,
        limit: Option<usize>,
        fail: bool,
        flushes: usize,
    }

    impl UartTx for MockUart {
        type Error = ();

        fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
            if self.fail {
                return Err(());
            }
            let n = self.limit.map_or(data.len(), |limit| limit.min(data.len()));
            self.sent.extend_from_slice(&data[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> Result<(), ()> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_sends_direction_commands() {
        let mut actuator = SerialCommandActuator::new(MockUart::default(), "bu", "bd");
        assert_eq!(actuator.trigger(), Trigger::Repeat);

        actuator.apply(Drive::Up).unwrap();
        actuator.apply(Drive::Down).unwrap();
        assert_eq!(actuator.uart.sent, b"bubd");
        assert_eq!(actuator.uart.flushes, 2);
    }

    #[test]
    fn test_off_sends_nothing() {
        let mut actuator = SerialCommandActuator::new(MockUart::default(), "lu", "ld");
        actuator.apply(Drive::Off).unwrap();
        assert!(actuator.uart.sent.is_empty());
        assert_eq!(actuator.command(Drive::Off), None);
        assert_eq!(actuator.command(Drive::Down), Some("ld"));
    }

    #[test]
    fn test_short_write() {
        let uart = MockUart {
            limit: Some(1),
            ..MockUart::default()
        };
        let mut actuator = SerialCommandActuator::new(uart, "eu", "ed");
        assert_eq!(
            actuator.apply(Drive::Up),
            Err(ActuatorError::ShortWrite {
                written: 1,
                expected: 2
            })
        );
    }

    #[test]
    fn test_write_failure() {
        let uart = MockUart {
            fail: true,
            ..MockUart::default()
        };
        let mut actuator = SerialCommandActuator::new(uart, "eu", "ed");
        assert_eq!(actuator.apply(Drive::Down), Err(ActuatorError::Write));
    }
}
