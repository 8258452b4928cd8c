//! Sandman Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits that actuator
//! backends are written against. The daemon implements them for the host
//! (sysfs GPIO, serial ports); tests implement them with mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  sandman-core (control state machine)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  sandman-drivers (pin pair, serial)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  sandman-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  sysfs GPIO   │       │  serial port  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::TriStatePin`] - Digital output
//! - [`uart::UartTx`] - Serial transmit

#![deny(unsafe_code)]

pub mod gpio;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use gpio::{OutputPin, PinError, TriStatePin};
pub use uart::{UartConfig, UartTx};
