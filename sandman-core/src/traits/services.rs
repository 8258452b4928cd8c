//! Collaborator interfaces used by the dispatcher
//!
//! The dispatcher does not own audio playback, the schedule or the report
//! journal. It reaches them through these traits so tests can substitute
//! recording mocks.

use std::path::Path;

use crate::control::Action;

/// Remote input device (handheld controller)
pub trait InputDevice {
    /// Check if the device currently has an active connection
    fn is_connected(&self) -> bool;
}

/// Time-based automation
pub trait Schedule {
    /// Start running the schedule
    fn start(&mut self);

    /// Stop running the schedule
    fn stop(&mut self);

    /// Check if the schedule is running
    fn is_running(&self) -> bool;
}

/// Audio output
pub trait Sound {
    /// Queue a clip for playback
    fn enqueue_clip(&mut self, path: &Path);

    /// Turn the volume up one step
    fn increase_volume(&mut self);

    /// Turn the volume down one step
    fn decrease_volume(&mut self);
}

/// Schedule action recorded in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleAction {
    Start,
    Stop,
}

impl ScheduleAction {
    /// Name used in the report journal
    pub fn name(&self) -> &'static str {
        match self {
            ScheduleAction::Start => "start",
            ScheduleAction::Stop => "stop",
        }
    }
}

/// Journal of user-visible events
pub trait ReportSink {
    /// A control was asked to do something
    fn control_event(&mut self, control: &str, action: Action, source: &str);

    /// The schedule was started or stopped
    fn schedule_event(&mut self, action: ScheduleAction);

    /// Status was requested
    fn status_event(&mut self);
}

/// Report sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReports;

impl ReportSink for NoReports {
    fn control_event(&mut self, _control: &str, _action: Action, _source: &str) {}

    fn schedule_event(&mut self, _action: ScheduleAction) {}

    fn status_event(&mut self) {}
}
