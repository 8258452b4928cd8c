//! Automation schedule
//!
//! An ordered, looping list of spoken-style commands with delays. The tick
//! loop polls the schedule and dispatches whatever command falls due, with
//! `schedule` as the input source.

use sandman_core::traits::Schedule;
use tracing::{info, warn};

use crate::config::ScheduleStep;

/// Input source name for scheduled commands
pub const SCHEDULE_SOURCE: &str = "schedule";

#[derive(Debug)]
pub struct ScheduleRunner {
    steps: Vec<ScheduleStep>,
    running: bool,
    /// Next step to fire
    index: usize,
    /// Time the previous step fired, or the schedule started (ms)
    last_step_ms: Option<u64>,
}

impl ScheduleRunner {
    pub fn new(steps: Vec<ScheduleStep>) -> Self {
        Self {
            steps,
            running: false,
            index: 0,
            last_step_ms: None,
        }
    }

    /// Return the command that is due, if any
    pub fn poll(&mut self, now_ms: u64) -> Option<String> {
        if !self.running || self.steps.is_empty() {
            return None;
        }

        let last = *self.last_step_ms.get_or_insert(now_ms);
        let step = &self.steps[self.index];
        if now_ms.saturating_sub(last) < step.delay_s.saturating_mul(1000) {
            return None;
        }

        let command = step.command.clone();
        info!("Schedule step {}: {}", self.index + 1, command);
        self.index = (self.index + 1) % self.steps.len();
        self.last_step_ms = Some(now_ms);
        Some(command)
    }
}

impl Schedule for ScheduleRunner {
    fn start(&mut self) {
        if self.running {
            info!("Schedule already running");
            return;
        }
        if self.steps.is_empty() {
            warn!("Schedule started with no steps");
        }
        info!("Schedule started");
        self.running = true;
        self.index = 0;
        self.last_step_ms = None;
    }

    fn stop(&mut self) {
        if !self.running {
            info!("Schedule already stopped");
            return;
        }
        info!("Schedule stopped");
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
