//! Main controller
//!
//! Owns the registry and everything the dispatcher talks to, and runs one
//! tick of the pipeline at a time:
//!
//! ```text
//! input events ─► tokenizer / intent extractor ─► dispatcher ─┐
//! schedule ─────────────────────────────────────► dispatcher ─┤
//!                                                             ▼
//!                                     registry.process_all(now) ─► reports
//! ```

use sandman_core::config::StatusClips;
use sandman_core::traits::InputDevice;
use sandman_core::{Dispatcher, Registry};
use sandman_protocol::{IntentExtractor, Token, Tokenizer};
use tracing::{info, warn};

use crate::config::DaemonConfig;
use crate::reports::{ReportJournal, ReportQueue};
use crate::schedule::{ScheduleRunner, SCHEDULE_SOURCE};
use crate::sound::SoundPlayer;
use crate::tasks::input::{InputEvent, InputLink};

/// Input source for free-text transcripts
pub const VOICE_SOURCE: &str = "voice";

/// Input source for intent documents
pub const INTENT_SOURCE: &str = "intent";

pub struct Controller {
    registry: Registry,
    dispatcher: Dispatcher,
    tokenizer: Tokenizer,
    extractor: IntentExtractor,
    schedule: ScheduleRunner,
    sound: SoundPlayer,
    link: InputLink,
    journal: ReportJournal,
    reports: ReportQueue,
}

impl Controller {
    pub fn new(
        registry: Registry,
        config: &DaemonConfig,
        sound: SoundPlayer,
        link: InputLink,
    ) -> Self {
        let dispatcher = Dispatcher::new(
            registry.directory(),
            StatusClips::in_dir(&config.sound.clip_dir),
        );
        let journal = ReportJournal::new(&config.reports.dir, config.reports.starting_hour);
        let reports = journal.queue();

        Self {
            registry,
            dispatcher,
            tokenizer: Tokenizer::default(),
            extractor: IntentExtractor::default(),
            schedule: ScheduleRunner::new(config.schedule.steps.clone()),
            sound,
            link,
            journal,
            reports,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Handle one input event
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Text(text) => {
                info!("Heard \"{}\"", text);
                let tokens = self.tokenizer.tokenize(&text);
                self.dispatch(&tokens, VOICE_SOURCE);
            }
            InputEvent::Intent(document) => {
                let tokens = self.extractor.extract(&document);
                self.dispatch(&tokens, INTENT_SOURCE);
            }
            InputEvent::Outputs(enabled) => self.set_outputs_enabled(enabled),
        }
    }

    /// Advance schedule, controls and reports by one tick
    pub fn tick(&mut self, now_ms: u64) {
        if let Some(command) = self.schedule.poll(now_ms) {
            let tokens = self.tokenizer.tokenize(&command);
            self.dispatch(&tokens, SCHEDULE_SOURCE);
        }

        self.registry.process_all(now_ms);
        self.journal.process();
    }

    /// Enable hardware output once every control is initialized
    pub fn start(&mut self) {
        self.set_outputs_enabled(true);
    }

    /// Stop everything and cut hardware output
    pub fn shutdown(&mut self, now_ms: u64) {
        info!("Shutting down");
        self.registry.stop_all();
        self.registry.process_all(now_ms);
        self.set_outputs_enabled(false);
        self.journal.process();
    }

    fn set_outputs_enabled(&mut self, enabled: bool) {
        if let Err(e) = self.registry.set_outputs_enabled(enabled) {
            warn!("{}", e);
        }
    }

    fn dispatch(&mut self, tokens: &[Token], source: &str) {
        let Self {
            dispatcher,
            schedule,
            sound,
            link,
            reports,
            ..
        } = self;

        let mut services = sandman_core::Services {
            schedule,
            sound,
            input: Some(&*link as &dyn InputDevice),
            reports,
        };
        let executed = dispatcher.dispatch(tokens, source, &mut services);
        if executed == 0 && !tokens.is_empty() {
            info!("No command recognized ({})", source);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ScheduleStep, SoundConfig};
    use crate::sound::SoundRequest;
    use sandman_core::config::ControlTimings;
    use sandman_core::traits::Schedule;
    use sandman_core::{Action, ControlMode, ControlState};
    use sandman_protocol::{IntentDocument, Slot};
    use tokio::sync::mpsc;

    struct Fixture {
        controller: Controller,
        sound_rx: mpsc::UnboundedReceiver<SoundRequest>,
        _reports: tempfile::TempDir,
    }

    fn fixture(steps: Vec<ScheduleStep>) -> Fixture {
        let reports = tempfile::tempdir().unwrap();
        let mut config = DaemonConfig::default();
        config.reports.dir = reports.path().to_path_buf();
        config.sound = SoundConfig {
            clip_dir: "audio".into(),
            ..SoundConfig::default()
        };
        config.schedule.steps = steps;

        let mut registry = Registry::new();
        for name in ["back", "legs", "elev"] {
            registry.add(name, ControlTimings::default(), None).unwrap();
        }

        let (sound, sound_rx) = SoundPlayer::new();
        Fixture {
            controller: Controller::new(registry, &config, sound, InputLink::default()),
            sound_rx,
            _reports: reports,
        }
    }

    fn state(controller: &Controller, name: &str) -> ControlState {
        controller.registry().control(name).unwrap().state()
    }

    #[test]
    fn test_text_moves_control() {
        let mut f = fixture(Vec::new());
        f.controller.handle_input(InputEvent::Text("back raise 50".to_string()));
        f.controller.tick(0);

        assert_eq!(state(&f.controller, "back"), ControlState::MovingUp);
        let desired = f.controller.registry().control("back").unwrap().desired();
        assert_eq!(desired.mode, ControlMode::Timed);
        assert_eq!(desired.percent, 50);
    }

    #[test]
    fn test_intent_moves_control() {
        let mut f = fixture(Vec::new());
        let document = IntentDocument::new(
            "MovePart",
            vec![Slot::new("name", "legs"), Slot::new("direction", "down")],
        );
        f.controller.handle_input(InputEvent::Intent(document));
        f.controller.tick(0);

        assert_eq!(state(&f.controller, "legs"), ControlState::MovingDown);
    }

    #[test]
    fn test_status_announces_connected_link() {
        let mut f = fixture(Vec::new());
        f.controller.link.set_connected(true);
        f.controller.handle_input(InputEvent::Text("status".to_string()));

        assert_eq!(
            f.sound_rx.try_recv().unwrap(),
            SoundRequest::Play("audio/running.wav".into())
        );
        assert_eq!(
            f.sound_rx.try_recv().unwrap(),
            SoundRequest::Play("audio/control_connected.wav".into())
        );
    }

    #[test]
    fn test_output_switch_events() {
        let mut f = fixture(Vec::new());
        f.controller.handle_input(InputEvent::Outputs(false));
        assert!(!f.controller.registry().outputs_enabled());
        f.controller.handle_input(InputEvent::Outputs(true));
        assert!(f.controller.registry().outputs_enabled());
    }

    #[test]
    fn test_schedule_dispatches_steps() {
        let mut f = fixture(vec![ScheduleStep {
            delay_s: 1,
            command: "elevation up 10".to_string(),
        }]);
        f.controller.handle_input(InputEvent::Text("schedule start".to_string()));
        assert!(f.controller.schedule.is_running());

        f.controller.tick(0);
        assert_eq!(state(&f.controller, "elev"), ControlState::Idle);
        f.controller.tick(1_000);
        assert_eq!(state(&f.controller, "elev"), ControlState::MovingUp);
    }

    #[test]
    fn test_shutdown_stops_everything() {
        let mut f = fixture(Vec::new());
        f.controller.start();
        f.controller.handle_input(InputEvent::Text("back up legs down".to_string()));
        f.controller.tick(0);

        f.controller.shutdown(100);
        for control in f.controller.registry().controls() {
            assert_eq!(control.desired().action, Action::Stopped);
            assert!(!control.state().is_moving());
        }
        assert!(!f.controller.registry().outputs_enabled());
    }
}
