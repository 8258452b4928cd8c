//! Command dispatcher
//!
//! Walks a token sequence left to right and turns recognized commands into
//! control requests and collaborator calls. Grammar:
//!
//! ```text
//! command  := movement | STOP | SCHEDULE action | VOLUME direction | STATUS
//! movement := part direction [INTEGER]
//! part     := BACK | LEGS | ELEVATION
//! direction:= RAISE | LOWER
//! action   := START | STOP | STOP_SCHED
//! ```
//!
//! Anything that does not start a command is skipped.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info, warn};
use sandman_protocol::{Token, TokenKind};

use crate::config::StatusClips;
use crate::control::{Action, ControlHandle, ControlMode, ControlShared};
use crate::registry::ControlDirectory;
use crate::traits::{InputDevice, ReportSink, Schedule, ScheduleAction, Sound};

/// Movement duration used when no percentage is given
pub const DEFAULT_PERCENT: u8 = 100;

/// Collaborators the dispatcher calls into
pub struct Services<'a> {
    pub schedule: &'a mut dyn Schedule,
    pub sound: &'a mut dyn Sound,
    /// Remote input device, if one is attached
    pub input: Option<&'a dyn InputDevice>,
    pub reports: &'a mut dyn ReportSink,
}

/// Control name for a part token
pub fn part_control_name(kind: TokenKind) -> Option<&'static str> {
    match kind {
        TokenKind::Back => Some("back"),
        TokenKind::Legs => Some("legs"),
        TokenKind::Elevation => Some("elev"),
        _ => None,
    }
}

/// Turns token sequences into actions
#[derive(Debug)]
pub struct Dispatcher {
    directory: ControlDirectory,
    clips: StatusClips,
    /// Cached handles, one per part token
    parts: HashMap<TokenKind, ControlHandle>,
}

impl Dispatcher {
    pub fn new(directory: ControlDirectory, clips: StatusClips) -> Self {
        Self {
            directory,
            clips,
            parts: HashMap::new(),
        }
    }

    /// Point the dispatcher at a rebuilt registry
    pub fn set_directory(&mut self, directory: ControlDirectory) {
        self.directory = directory;
        self.parts.clear();
    }

    /// Execute every command in a token sequence
    ///
    /// `source` names where the input came from and is recorded with each
    /// report event. Returns the number of commands executed.
    pub fn dispatch(
        &mut self,
        tokens: &[Token],
        source: &str,
        services: &mut Services<'_>,
    ) -> usize {
        let mut executed = 0;
        let mut index = 0;

        while index < tokens.len() {
            let kind = tokens[index].kind();
            index += 1;
            let rest = &tokens[index..];

            let (consumed, done) = match kind {
                TokenKind::Back | TokenKind::Legs | TokenKind::Elevation => {
                    self.movement(kind, rest, source, services)
                }
                TokenKind::Stop => {
                    self.stop_all(source, services);
                    (0, true)
                }
                TokenKind::Schedule => match rest.first() {
                    Some(action) => (1, Self::schedule(action.kind(), services)),
                    None => (0, false),
                },
                TokenKind::Volume => match rest.first() {
                    Some(direction) => (1, Self::volume(direction.kind(), services)),
                    None => (0, false),
                },
                TokenKind::Status => {
                    self.status(services);
                    (0, true)
                }
                _ => (0, false),
            };

            index += consumed;
            if done {
                executed += 1;
            }
        }

        executed
    }

    /// Handle `part direction [INTEGER]`; `rest` starts after the part
    fn movement(
        &mut self,
        part: TokenKind,
        rest: &[Token],
        source: &str,
        services: &mut Services<'_>,
    ) -> (usize, bool) {
        let Some(control) = self.resolve(part) else {
            warn!("No control for {}, command ignored", part);
            return (0, false);
        };

        let action = match rest.first().map(Token::kind) {
            Some(TokenKind::Raise) => Action::MovingUp,
            Some(TokenKind::Lower) => Action::MovingDown,
            _ => {
                debug!("{} not followed by a direction", part);
                return (0, false);
            }
        };

        let (consumed, percent) = match rest.get(1) {
            Some(token) if token.is(TokenKind::Integer) => {
                let percent = token.parameter().min(u32::from(DEFAULT_PERCENT)) as u8;
                (2, percent)
            }
            _ => (1, DEFAULT_PERCENT),
        };

        control.set_desired_action(action, ControlMode::Timed, percent);
        info!("{}: {} {}% ({})", control.name(), action.report_name(), percent, source);
        services.reports.control_event(control.name(), action, source);
        (consumed, true)
    }

    fn stop_all(&self, source: &str, services: &mut Services<'_>) {
        let stopped = self.directory.stop_all();
        info!("Stopping all controls ({})", source);
        for name in stopped {
            services.reports.control_event(&name, Action::Stopped, source);
        }
    }

    fn schedule(action: TokenKind, services: &mut Services<'_>) -> bool {
        match action {
            TokenKind::Start => {
                services.schedule.start();
                services.reports.schedule_event(ScheduleAction::Start);
                true
            }
            TokenKind::Stop | TokenKind::StopSched => {
                services.schedule.stop();
                services.reports.schedule_event(ScheduleAction::Stop);
                true
            }
            other => {
                debug!("Unknown schedule action {}", other);
                false
            }
        }
    }

    fn volume(direction: TokenKind, services: &mut Services<'_>) -> bool {
        match direction {
            TokenKind::Raise => {
                services.sound.increase_volume();
                true
            }
            TokenKind::Lower => {
                services.sound.decrease_volume();
                true
            }
            other => {
                debug!("Unknown volume direction {}", other);
                false
            }
        }
    }

    fn status(&self, services: &mut Services<'_>) {
        services.sound.enqueue_clip(&self.clips.running);
        if services.schedule.is_running() {
            services.sound.enqueue_clip(&self.clips.schedule_running);
        }
        if services.input.is_some_and(|input| input.is_connected()) {
            services.sound.enqueue_clip(&self.clips.remote_connected);
        }
        services.reports.status_event();
    }

    /// Resolve a part to its control, re-resolving stale cached handles
    fn resolve(&mut self, part: TokenKind) -> Option<Arc<ControlShared>> {
        if let Some(control) = self.parts.get(&part).and_then(ControlHandle::upgrade) {
            return Some(control);
        }

        let handle = self.directory.resolve(part_control_name(part)?)?;
        let control = handle.upgrade();
        self.parts.insert(part, handle);
        control
    }
}
