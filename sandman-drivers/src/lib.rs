//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in sandman-core on top of the sandman-hal pin and UART traits:
//!
//! - Relay pin-pair actuators (one pin per direction)
//! - Serial command-string actuators (motor controller micro)
//! - A shared UART for several command-string actuators on one port
//! - The motor-driver enable line as an output gate

#![deny(unsafe_code)]

pub mod actuator;
pub mod enable;
pub mod shared;

pub use actuator::{PinPairActuator, SerialCommandActuator};
pub use enable::EnableLine;
pub use shared::SharedUart;
