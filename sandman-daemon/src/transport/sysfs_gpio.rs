//! Sysfs GPIO pins
//!
//! Uses the legacy `/sys/class/gpio` interface: a pin is exported by
//! writing its number to `export`, then driven through `gpioN/direction`
//! and `gpioN/value`. Writing `high` or `low` to `direction` switches to
//! output and sets the level in one step, so the pin never glitches.
//! Writing `in` releases it to high impedance.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sandman_hal::{OutputPin, PinError, TriStatePin};
use tracing::{debug, warn};

/// Sysfs GPIO root on Linux
pub const SYSFS_GPIO_ROOT: &str = "/sys/class/gpio";

/// One exported sysfs GPIO pin
#[derive(Debug)]
pub struct SysfsPin {
    pin: u32,
    dir: PathBuf,
    high: bool,
    released: bool,
}

impl SysfsPin {
    /// Export a pin released to high impedance
    pub fn released(pin: u32) -> io::Result<Self> {
        Self::released_at(Path::new(SYSFS_GPIO_ROOT), pin)
    }

    /// Export a pin under `root` as an output at the given level
    pub fn output_at(root: &Path, pin: u32, high: bool) -> io::Result<Self> {
        let mut gpio = Self::export(root, pin)?;
        gpio.write_direction(if high { "high" } else { "low" })?;
        gpio.high = high;
        gpio.released = false;
        Ok(gpio)
    }

    /// Export a pin under `root` as an input
    pub fn released_at(root: &Path, pin: u32) -> io::Result<Self> {
        let mut gpio = Self::export(root, pin)?;
        gpio.write_direction("in")?;
        Ok(gpio)
    }

    fn export(root: &Path, pin: u32) -> io::Result<Self> {
        let dir = root.join(format!("gpio{}", pin));
        if !dir.exists() {
            debug!("Exporting GPIO {}", pin);
            fs::write(root.join("export"), pin.to_string())?;
        }
        Ok(Self {
            pin,
            dir,
            high: false,
            released: true,
        })
    }

    fn write_direction(&mut self, direction: &str) -> io::Result<()> {
        fs::write(self.dir.join("direction"), direction)
    }

    fn write_value(&mut self, high: bool) -> io::Result<()> {
        fs::write(self.dir.join("value"), if high { "1" } else { "0" })
    }

    fn fail(&self, e: io::Error) -> PinError {
        warn!("GPIO {}: {}", self.pin, e);
        PinError { pin: self.pin }
    }
}

impl OutputPin for SysfsPin {
    fn set_high(&mut self) -> Result<(), PinError> {
        self.set_state(true)
    }

    fn set_low(&mut self) -> Result<(), PinError> {
        self.set_state(false)
    }

    fn set_state(&mut self, high: bool) -> Result<(), PinError> {
        let result = if self.released {
            self.write_direction(if high { "high" } else { "low" })
        } else {
            self.write_value(high)
        };
        result.map_err(|e| self.fail(e))?;
        self.high = high;
        self.released = false;
        Ok(())
    }

    fn is_set_high(&self) -> bool {
        !self.released && self.high
    }
}

impl TriStatePin for SysfsPin {
    fn release(&mut self) -> Result<(), PinError> {
        self.write_direction("in").map_err(|e| self.fail(e))?;
        self.released = true;
        Ok(())
    }

    fn is_released(&self) -> bool {
        self.released
    }
}
