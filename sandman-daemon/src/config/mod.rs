//! Daemon configuration
//!
//! Loaded once at startup from a TOML file. Every section is optional;
//! missing values fall back to the defaults below. See `sandman.toml` in
//! this crate for an annotated example.

pub mod loader;

use std::path::PathBuf;

use sandman_core::config::{TimingConfig, TimingOverrides};
use serde::Deserialize;

pub use loader::{load, parse, ConfigError};

/// Default config file location
pub const DEFAULT_CONFIG_PATH: &str = "/etc/sandman/sandman.toml";

/// Complete daemon configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DaemonConfig {
    /// Process-wide control timing
    pub timing: TimingConfig,
    pub tick: TickConfig,
    pub serial: Option<SerialConfig>,
    pub gpio: GpioConfig,
    #[serde(rename = "control")]
    pub controls: Vec<ControlConfig>,
    pub sound: SoundConfig,
    pub reports: ReportsConfig,
    pub schedule: ScheduleConfig,
}

/// Tick loop settings
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    pub interval_ms: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self { interval_ms: 100 }
    }
}

/// Serial link to the motor controller micro
#[derive(Debug, Clone, Deserialize)]
pub struct SerialConfig {
    /// Device path, e.g. `/dev/ttyAMA0`
    pub port: String,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

fn default_baud_rate() -> u32 {
    9600
}

/// Shared GPIO settings
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct GpioConfig {
    /// Motor-driver enable pin, if the board has one
    pub enable_pin: Option<u32>,
    /// Enable line is active-low
    pub active_low: bool,
}

/// One `[[control]]` entry
#[derive(Debug, Clone, Deserialize)]
pub struct ControlConfig {
    pub name: String,
    #[serde(flatten)]
    pub backend: BackendConfig,
    /// Overrides for the process-wide `[timing]` values
    #[serde(default)]
    pub timing: TimingOverrides,
}

/// Actuator backend for a control
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
    /// Relay pin pair
    Pins {
        up_pin: u32,
        down_pin: u32,
        #[serde(default)]
        active_low: bool,
    },
    /// Command strings over the `[serial]` port
    Serial {
        up_command: String,
        down_command: String,
    },
}

/// Audio playback
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    /// Directory holding the status clips
    pub clip_dir: PathBuf,
    /// Player command, invoked with the clip path as its only argument
    pub player: String,
    /// ALSA mixer control adjusted by volume commands
    pub mixer_control: String,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            clip_dir: PathBuf::from("/usr/share/sandman/audio"),
            player: "aplay".to_string(),
            mixer_control: "PCM".to_string(),
        }
    }
}

/// Report journal
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    pub dir: PathBuf,
    /// Local hour at which a new report day begins
    pub starting_hour: u32,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("/var/lib/sandman/reports"),
            starting_hour: 17,
        }
    }
}

/// Automation schedule
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    #[serde(rename = "step")]
    pub steps: Vec<ScheduleStep>,
}

/// One schedule step
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScheduleStep {
    /// Seconds to wait after the previous step
    pub delay_s: u64,
    /// Free-text command, as it would be spoken
    pub command: String,
}
