//! Input task
//!
//! Reads one input event per line from stdin, where the speech front end
//! writes transcripts and intent documents:
//!
//! - a line starting with `{` is a voice-assistant intent document
//! - `enable` / `disable` switch hardware output on or off
//! - anything else is a free-text transcript

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sandman_core::traits::InputDevice;
use sandman_protocol::IntentDocument;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Channel capacity for input events
pub const INPUT_CHANNEL_SIZE: usize = 16;

/// One decoded input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Free-text transcript
    Text(String),
    /// Voice-assistant intent
    Intent(IntentDocument),
    /// Hardware output on/off
    Outputs(bool),
}

/// Decode one input line; blank and malformed lines yield `None`
pub fn parse_line(line: &str) -> Option<InputEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if line.starts_with('{') {
        return match IntentDocument::from_json(line) {
            Ok(document) => Some(InputEvent::Intent(document)),
            Err(e) => {
                warn!("Dropping malformed intent document: {:?}", e);
                None
            }
        };
    }

    match line {
        "enable" => Some(InputEvent::Outputs(true)),
        "disable" => Some(InputEvent::Outputs(false)),
        _ => Some(InputEvent::Text(line.to_string())),
    }
}

/// Connection state of the input link
///
/// Reported as "remote connected" in status announcements while the
/// speech front end is attached.
#[derive(Debug, Clone, Default)]
pub struct InputLink {
    connected: Arc<AtomicBool>,
}

impl InputLink {
    pub(crate) fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Release);
    }
}

impl InputDevice for InputLink {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }
}

/// Input task - reads stdin until EOF
pub async fn input_task(tx: mpsc::Sender<InputEvent>, link: InputLink) {
    read_events(BufReader::new(tokio::io::stdin()), tx, link).await;
}

async fn read_events<R: AsyncBufRead + Unpin>(
    reader: R,
    tx: mpsc::Sender<InputEvent>,
    link: InputLink,
) {
    info!("Input task started");
    link.set_connected(true);

    let mut lines = reader.lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let Some(event) = parse_line(&line) else {
                    continue;
                };
                debug!("Input: {:?}", event);
                if tx.send(event).await.is_err() {
                    break;
                }
            }
            Ok(None) => {
                info!("Input closed");
                break;
            }
            Err(e) => {
                warn!("Input read failed: {}", e);
                break;
            }
        }
    }

    link.set_connected(false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use sandman_protocol::Slot;

    #[test]
    fn test_parse_text_and_switches() {
        assert_eq!(
            parse_line("  back up 50 \n"),
            Some(InputEvent::Text("back up 50".to_string()))
        );
        assert_eq!(parse_line("enable"), Some(InputEvent::Outputs(true)));
        assert_eq!(parse_line("disable"), Some(InputEvent::Outputs(false)));
        assert_eq!(parse_line("   "), None);
    }

    #[test]
    fn test_parse_intent() {
        let line = r#"{"intent":{"intentName":"SetSchedule"},"slots":[{"slotName":"action","rawValue":"start"}]}"#;
        assert_eq!(
            parse_line(line),
            Some(InputEvent::Intent(IntentDocument::new(
                "SetSchedule",
                vec![Slot::new("action", "start")]
            )))
        );
    }

    #[test]
    fn test_malformed_intent_dropped() {
        assert_eq!(parse_line("{not json"), None);
        assert_eq!(parse_line(r#"{"slots":[]}"#), None);
    }

    #[tokio::test]
    async fn test_reader_forwards_events_and_tracks_link() {
        let input: &[u8] = b"legs down\n\nstatus\n";
        let (tx, mut rx) = mpsc::channel(INPUT_CHANNEL_SIZE);
        let link = InputLink::default();

        read_events(input, tx, link.clone()).await;

        assert_eq!(rx.recv().await, Some(InputEvent::Text("legs down".to_string())));
        assert_eq!(rx.recv().await, Some(InputEvent::Text("status".to_string())));
        assert_eq!(rx.recv().await, None);
        assert!(!link.is_connected());
    }
}
