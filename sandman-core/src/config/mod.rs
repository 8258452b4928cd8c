//! Configuration type definitions
//!
//! Timing limits for the control state machine and the audio cues played
//! for status requests.

pub mod types;

pub use types::{
    ControlTimings, StatusClips, TimingConfig, TimingOverrides, DEFAULT_COMMAND_INTERVAL_MS,
    DEFAULT_COOL_DOWN_MS, DEFAULT_MOVING_LIMIT_MS,
};
