//! Configuration loading
//!
//! Reads the TOML file and checks the cross-field rules serde cannot
//! express. Timing values are never rejected; they are clamped when
//! resolved.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use super::{BackendConfig, DaemonConfig};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("no controls configured")]
    NoControls,

    #[error("duplicate control name '{0}'")]
    DuplicateControl(String),

    #[error("control '{0}' uses the serial backend but no [serial] port is configured")]
    MissingSerial(String),

    #[error("control '{name}' uses pin {pin} for both directions")]
    SamePin { name: String, pin: u32 },

    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,

    #[error("report starting hour {0} is not a valid hour")]
    InvalidStartingHour(u32),
}

/// Load and validate a config file
pub fn load(path: &Path) -> Result<DaemonConfig, ConfigError> {
    info!("Loading configuration from {}", path.display());
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text)
}

/// Parse and validate config text
pub fn parse(text: &str) -> Result<DaemonConfig, ConfigError> {
    let config: DaemonConfig = toml::from_str(text)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &DaemonConfig) -> Result<(), ConfigError> {
    if config.controls.is_empty() {
        return Err(ConfigError::NoControls);
    }
    if config.tick.interval_ms == 0 {
        return Err(ConfigError::ZeroTickInterval);
    }
    if config.reports.starting_hour > 23 {
        return Err(ConfigError::InvalidStartingHour(config.reports.starting_hour));
    }

    let mut names = HashSet::new();
    for control in &config.controls {
        let name = control.name.to_lowercase();
        if !names.insert(name.clone()) {
            return Err(ConfigError::DuplicateControl(name));
        }

        match &control.backend {
            BackendConfig::Pins {
                up_pin, down_pin, ..
            } if up_pin == down_pin => {
                return Err(ConfigError::SamePin {
                    name,
                    pin: *up_pin,
                });
            }
            BackendConfig::Serial { .. } if config.serial.is_none() => {
                return Err(ConfigError::MissingSerial(name));
            }
            _ => {}
        }
    }
    Ok(())
}
