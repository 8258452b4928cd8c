//! Board-agnostic core logic for the Sandman bed controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware or host services:
//!
//! - Actuator and collaborator traits (backend, gate, sound, schedule)
//! - The per-actuator control state machine
//! - The control registry and name-to-handle resolution
//! - The command dispatcher that turns tokens into control requests
//! - Configuration type definitions

#![deny(unsafe_code)]

pub mod config;
pub mod control;
pub mod dispatch;
pub mod registry;
pub mod traits;

pub use control::{Action, Control, ControlHandle, ControlMode, ControlShared, ControlState};
pub use dispatch::{Dispatcher, Services};
pub use registry::{ControlDirectory, OutputSwitch, Registry, RegistryError};
