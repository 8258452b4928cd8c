//! Host transports
//!
//! Implementations of the sandman-hal traits on Linux: serial ports via
//! the `serialport` crate and GPIO pins via the sysfs interface.

pub mod serial;
pub mod sysfs_gpio;

pub use serial::SerialPortTx;
pub use sysfs_gpio::{SysfsPin, SYSFS_GPIO_ROOT};
