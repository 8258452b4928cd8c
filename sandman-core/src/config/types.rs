//! Configuration type definitions
//!
//! Raw timing values come from the config file as signed integers and are
//! clamped to non-negative durations when resolved into [`ControlTimings`].
//! A bad value never fails startup.

use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum time a control may stay in a moving state (100 s)
pub const DEFAULT_MOVING_LIMIT_MS: u64 = 100 * 1000;

/// Rest period after every movement (50 s)
pub const DEFAULT_COOL_DOWN_MS: u64 = 50 * 1000;

/// Minimum time between repeated hardware commands (2 s)
pub const DEFAULT_COMMAND_INTERVAL_MS: u64 = 2 * 1000;

/// Resolved timing limits for one control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlTimings {
    /// Maximum duration of a moving state
    pub moving_limit_ms: u64,
    /// Duration of the cool-down state
    pub cool_down_ms: u64,
    /// Minimum interval between repeated commands
    pub command_interval_ms: u64,
}

impl Default for ControlTimings {
    fn default() -> Self {
        Self {
            moving_limit_ms: DEFAULT_MOVING_LIMIT_MS,
            cool_down_ms: DEFAULT_COOL_DOWN_MS,
            command_interval_ms: DEFAULT_COMMAND_INTERVAL_MS,
        }
    }
}

impl ControlTimings {
    /// Build timings from signed values, clamping negatives to zero
    pub fn clamped(moving_limit_ms: i64, cool_down_ms: i64, command_interval_ms: i64) -> Self {
        Self {
            moving_limit_ms: clamp_ms(moving_limit_ms),
            cool_down_ms: clamp_ms(cool_down_ms),
            command_interval_ms: clamp_ms(command_interval_ms),
        }
    }
}

fn clamp_ms(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

/// Process-wide timing defaults, as written in the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingConfig {
    pub moving_limit_ms: i64,
    pub cool_down_ms: i64,
    pub command_interval_ms: i64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            moving_limit_ms: DEFAULT_MOVING_LIMIT_MS as i64,
            cool_down_ms: DEFAULT_COOL_DOWN_MS as i64,
            command_interval_ms: DEFAULT_COMMAND_INTERVAL_MS as i64,
        }
    }
}

/// Per-control timing overrides; unset fields use the process defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingOverrides {
    pub moving_limit_ms: Option<i64>,
    pub cool_down_ms: Option<i64>,
    pub command_interval_ms: Option<i64>,
}

impl TimingConfig {
    /// Resolve the process defaults
    pub fn resolve(&self) -> ControlTimings {
        self.resolve_with(&TimingOverrides::default())
    }

    /// Resolve with per-control overrides applied
    pub fn resolve_with(&self, overrides: &TimingOverrides) -> ControlTimings {
        ControlTimings::clamped(
            overrides.moving_limit_ms.unwrap_or(self.moving_limit_ms),
            overrides.cool_down_ms.unwrap_or(self.cool_down_ms),
            overrides
                .command_interval_ms
                .unwrap_or(self.command_interval_ms),
        )
    }
}

/// Audio cues played for a status request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusClips {
    /// Always played
    pub running: PathBuf,
    /// Played when the schedule is running
    pub schedule_running: PathBuf,
    /// Played when the remote is connected
    pub remote_connected: PathBuf,
}

impl StatusClips {
    /// Standard clip names inside an audio directory
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            running: dir.join("running.wav"),
            schedule_running: dir.join("sched_running.wav"),
            remote_connected: dir.join("control_connected.wav"),
        }
    }
}
