//! Daemon error type
//!
//! Only startup can fail; once the tick loop runs, every failure is logged
//! and the loop carries on.

use thiserror::Error;

use crate::config::ConfigError;
use sandman_core::RegistryError;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to open serial port {port}: {source}")]
    Serial {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("failed to set up enable pin {pin}: {source}")]
    EnablePin {
        pin: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("enable pin {0} could not be released")]
    EnableRelease(u32),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
