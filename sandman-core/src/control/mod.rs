//! Per-actuator control
//!
//! A control is split in two: [`ControlShared`] carries the name and the
//! lock-protected desired action that the dispatcher writes, while
//! [`Control`] owns the state machine, timing and actuator and is only
//! touched by the tick loop.

pub mod handle;
pub mod machine;
pub mod state;

pub use handle::{ControlHandle, ControlShared};
pub use machine::Control;
pub use state::{Action, ControlMode, ControlState, Request};
