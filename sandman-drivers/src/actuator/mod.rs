//! Actuator backends

pub mod pins;
pub mod serial;

pub use pins::PinPairActuator;
pub use serial::SerialCommandActuator;
