//! Hardware and collaborator abstraction traits
//!
//! These traits define the interfaces the control logic talks through.
//! Implementations live in `sandman-drivers` (actuators, enable line) and
//! in the daemon (sound, schedule, reports).

pub mod actuator;
pub mod services;

pub use actuator::{Actuator, ActuatorError, Drive, OutputGate, Trigger};
pub use services::{InputDevice, NoReports, ReportSink, Schedule, ScheduleAction, Sound};
