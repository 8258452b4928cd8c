//! Async tasks
//!
//! - `tick`: fixed-interval loop that owns the controller
//! - `input`: stdin reader feeding the tick loop
//! - `sound`: clip playback and mixer control

pub mod input;
pub mod sound;
pub mod tick;
