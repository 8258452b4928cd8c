//! Hardware setup
//!
//! Builds the control registry from the configuration: opens the shared
//! serial port, exports GPIO pins and wraps them in actuator backends.
//! A control whose pins cannot be set up still gets registered, without a
//! backend, so the rest of the bed keeps working.

use std::io;
use std::path::Path;

use sandman_core::traits::Actuator;
use sandman_core::Registry;
use sandman_drivers::{EnableLine, PinPairActuator, SerialCommandActuator, SharedUart};
use sandman_hal::UartConfig;
use tracing::{error, info};

use crate::config::{BackendConfig, ControlConfig, DaemonConfig};
use crate::error::DaemonError;
use crate::transport::{SerialPortTx, SysfsPin, SYSFS_GPIO_ROOT};

/// Build the registry with every configured control, outputs disabled
pub fn build_registry(config: &DaemonConfig) -> Result<Registry, DaemonError> {
    let mut registry = match config.gpio.enable_pin {
        Some(pin) => {
            let gpio = SysfsPin::released(pin)
                .map_err(|source| DaemonError::EnablePin { pin, source })?;
            let line = EnableLine::new(gpio, config.gpio.active_low)
                .map_err(|_| DaemonError::EnableRelease(pin))?;
            info!("Enable line on GPIO {}", pin);
            Registry::with_gate(Box::new(line))
        }
        None => Registry::new(),
    };
    registry.set_outputs_enabled(false)?;

    let serial = match &config.serial {
        Some(serial) => {
            let uart_config = UartConfig::with_baudrate(serial.baud_rate);
            let port = SerialPortTx::open(&serial.port, &uart_config).map_err(|source| {
                DaemonError::Serial {
                    port: serial.port.clone(),
                    source,
                }
            })?;
            Some(SharedUart::new(port))
        }
        None => None,
    };

    for control in &config.controls {
        let timings = config.timing.resolve_with(&control.timing);
        let actuator = build_actuator(control, serial.as_ref(), Path::new(SYSFS_GPIO_ROOT));
        registry.add(&control.name, timings, actuator)?;
    }

    Ok(registry)
}

fn build_actuator(
    control: &ControlConfig,
    serial: Option<&SharedUart<SerialPortTx>>,
    gpio_root: &Path,
) -> Option<Box<dyn Actuator>> {
    match &control.backend {
        BackendConfig::Pins {
            up_pin,
            down_pin,
            active_low,
        } => {
            let pins = export_relay_pins(gpio_root, *up_pin, *down_pin, *active_low);
            let (up, down) = match pins {
                Ok(pins) => pins,
                Err(e) => {
                    error!("{}: GPIO setup failed: {}", control.name, e);
                    return None;
                }
            };
            match PinPairActuator::new(up, down, *active_low) {
                Ok(actuator) => Some(Box::new(actuator)),
                Err(e) => {
                    error!("{}: relay pins could not be reset: {:?}", control.name, e);
                    None
                }
            }
        }
        BackendConfig::Serial {
            up_command,
            down_command,
        } => serial.map(|uart| {
            Box::new(SerialCommandActuator::new(
                uart.clone(),
                up_command.clone(),
                down_command.clone(),
            )) as Box<dyn Actuator>
        }),
    }
}

/// Export both relay pins already at their inactive level
///
/// An active-low relay is off while its pin is high, so the pins are
/// switched to output high. Exporting them low would energize both
/// directions until the actuator resets them.
fn export_relay_pins(
    root: &Path,
    up_pin: u32,
    down_pin: u32,
    active_low: bool,
) -> io::Result<(SysfsPin, SysfsPin)> {
    let up = SysfsPin::output_at(root, up_pin, active_low)?;
    let down = SysfsPin::output_at(root, down_pin, active_low)?;
    Ok((up, down))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sandman_core::config::TimingOverrides;
    use sandman_hal::OutputPin;
    use std::fs;
    use tempfile::TempDir;

    fn fake_root(pins: &[u32]) -> TempDir {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("export"), "").unwrap();
        for pin in pins {
            fs::create_dir(root.path().join(format!("gpio{}", pin))).unwrap();
        }
        root
    }

    fn read(root: &TempDir, pin: u32, file: &str) -> String {
        fs::read_to_string(root.path().join(format!("gpio{}", pin)).join(file)).unwrap()
    }

    fn pins_control(active_low: bool) -> ControlConfig {
        ControlConfig {
            name: "back".to_string(),
            backend: BackendConfig::Pins {
                up_pin: 5,
                down_pin: 6,
                active_low,
            },
            timing: TimingOverrides::default(),
        }
    }

    #[test]
    fn test_active_low_relays_export_high() {
        let root = fake_root(&[5, 6]);
        let (up, down) = export_relay_pins(root.path(), 5, 6, true).unwrap();

        assert!(up.is_set_high());
        assert!(down.is_set_high());
        // The only direction ever written is the inactive level
        assert_eq!(read(&root, 5, "direction"), "high");
        assert_eq!(read(&root, 6, "direction"), "high");
    }

    #[test]
    fn test_active_high_relays_export_low() {
        let root = fake_root(&[5, 6]);
        let (up, down) = export_relay_pins(root.path(), 5, 6, false).unwrap();

        assert!(up.is_set_low());
        assert!(down.is_set_low());
        assert_eq!(read(&root, 5, "direction"), "low");
        assert_eq!(read(&root, 6, "direction"), "low");
    }

    #[test]
    fn test_pin_actuator_starts_inactive() {
        let root = fake_root(&[5, 6]);
        let actuator = build_actuator(&pins_control(true), None, root.path());

        assert!(actuator.is_some());
        assert_eq!(read(&root, 5, "direction"), "high");
        assert_eq!(read(&root, 6, "direction"), "high");
        assert_eq!(read(&root, 5, "value"), "1");
        assert_eq!(read(&root, 6, "value"), "1");
    }

    #[test]
    fn test_missing_gpio_leaves_control_without_backend() {
        let root = fake_root(&[]);
        assert!(build_actuator(&pins_control(false), None, root.path()).is_none());
    }

    #[test]
    fn test_serial_control_without_port_has_no_backend() {
        let root = fake_root(&[]);
        let control = ControlConfig {
            name: "elev".to_string(),
            backend: BackendConfig::Serial {
                up_command: "E+".to_string(),
                down_command: "E-".to_string(),
            },
            timing: TimingOverrides::default(),
        };
        assert!(build_actuator(&control, None, root.path()).is_none());
    }
}
