//! Voice assistant intent documents
//!
//! The speech recognizer hands over a JSON document describing the intent
//! it recognized:
//!
//! ```json
//! {
//!   "intent": { "intentName": "MovePart" },
//!   "slots": [
//!     { "slotName": "name", "rawValue": "legs" },
//!     { "slotName": "direction", "rawValue": "lower" }
//!   ]
//! }
//! ```
//!
//! Decoding happens in two steps. [`IntentDocument::from_json`] validates
//! the document shape and produces a typed document; malformed documents
//! are reported as [`IntentError`]. [`IntentExtractor`] then maps a typed
//! document onto the same tokens the free-text tokenizer would produce.
//!
//! Individual slot entries with a bad shape are skipped during decoding
//! rather than failing the whole document.

use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::token::{Token, TokenKind, TokenTable};

/// Intent that reports system status
pub const INTENT_GET_STATUS: &str = "GetStatus";

/// Intent that moves one bed section
pub const INTENT_MOVE_PART: &str = "MovePart";

/// Intent that starts or stops the schedule
pub const INTENT_SET_SCHEDULE: &str = "SetSchedule";

/// Errors that can occur while decoding an intent document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentError {
    /// Input is not valid JSON
    Syntax,
    /// Top level value is not a JSON object
    NotAnObject,
    /// No `intent` object with a string `intentName`
    MissingIntentName,
}

/// A named slot value from the recognizer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Slot {
    /// Slot name, e.g. `"direction"`
    #[serde(rename = "slotName")]
    pub name: String,
    /// Raw recognized text, e.g. `"lower"`
    #[serde(rename = "rawValue")]
    pub value: String,
}

impl Slot {
    /// Create a slot
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A decoded intent document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentDocument {
    /// Name of the recognized intent
    pub intent_name: String,
    /// Well-formed slots, in document order
    pub slots: Vec<Slot>,
}

#[derive(Deserialize)]
struct RawIntent {
    #[serde(rename = "intentName")]
    intent_name: String,
}

impl IntentDocument {
    /// Create a document directly
    pub fn new(intent_name: impl Into<String>, slots: Vec<Slot>) -> Self {
        Self {
            intent_name: intent_name.into(),
            slots,
        }
    }

    /// Decode a document from JSON text
    pub fn from_json(text: &str) -> Result<Self, IntentError> {
        let value: Value = serde_json::from_str(text).map_err(|_| IntentError::Syntax)?;
        Self::from_value(value)
    }

    /// Decode a document from an already parsed JSON value
    pub fn from_value(mut value: Value) -> Result<Self, IntentError> {
        let object = value.as_object_mut().ok_or(IntentError::NotAnObject)?;

        let intent = object
            .remove("intent")
            .filter(Value::is_object)
            .ok_or(IntentError::MissingIntentName)?;
        let intent: RawIntent =
            serde_json::from_value(intent).map_err(|_| IntentError::MissingIntentName)?;

        let slots = match object.remove("slots") {
            Some(Value::Array(entries)) => decode_slots(entries),
            Some(other) => {
                debug!("Ignoring non-list slots value: {}", other);
                Vec::new()
            }
            None => Vec::new(),
        };

        Ok(Self {
            intent_name: intent.intent_name,
            slots,
        })
    }

    /// Find the value of a slot by name
    ///
    /// When a slot name repeats, the last occurrence wins.
    pub fn slot(&self, name: &str) -> Option<&str> {
        self.slots
            .iter()
            .rev()
            .find(|slot| slot.name == name)
            .map(|slot| slot.value.as_str())
    }
}

/// Keep only slot entries that are objects with string name and value
fn decode_slots(entries: Vec<Value>) -> Vec<Slot> {
    entries
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|entry| match serde_json::from_value::<Slot>(entry) {
            Ok(slot) => Some(slot),
            Err(e) => {
                debug!("Skipping malformed slot entry: {}", e);
                None
            }
        })
        .collect()
}

/// Result of classifying an intent document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Intent understood, with the equivalent command tokens
    Recognized(Vec<Token>),
    /// Known intent, but a required slot is missing or not a known word
    InvalidParameters,
    /// Intent name is not one we handle
    Unrecognized,
}

/// Maps intent documents onto command tokens
#[derive(Debug, Clone, Default)]
pub struct IntentExtractor {
    table: TokenTable,
}

impl IntentExtractor {
    /// Create an extractor using the given vocabulary
    pub fn new(table: TokenTable) -> Self {
        Self { table }
    }

    /// Classify a document without logging
    pub fn classify(&self, document: &IntentDocument) -> Extraction {
        match document.intent_name.as_str() {
            INTENT_GET_STATUS => Extraction::Recognized(vec![Token::new(TokenKind::Status)]),
            INTENT_MOVE_PART => {
                let part = self.slot_token(document, "name");
                let direction = self.slot_token(document, "direction");

                match (part, direction) {
                    (Some(part), Some(direction)) => Extraction::Recognized(vec![part, direction]),
                    _ => Extraction::InvalidParameters,
                }
            }
            INTENT_SET_SCHEDULE => match self.slot_token(document, "action") {
                Some(action) => {
                    Extraction::Recognized(vec![Token::new(TokenKind::Schedule), action])
                }
                None => Extraction::InvalidParameters,
            },
            _ => Extraction::Unrecognized,
        }
    }

    /// Extract the command tokens for a document
    ///
    /// Returns an empty list when the document is not understood; never a
    /// partial command.
    pub fn extract(&self, document: &IntentDocument) -> Vec<Token> {
        let name = &document.intent_name;

        match self.classify(document) {
            Extraction::Recognized(tokens) => {
                info!("Recognized a {} intent.", name);
                tokens
            }
            Extraction::InvalidParameters => {
                warn!(
                    "Couldn't recognize a {} intent because of invalid parameters.",
                    name
                );
                Vec::new()
            }
            Extraction::Unrecognized => {
                warn!("Unrecognized intent named {}.", name);
                Vec::new()
            }
        }
    }

    /// Resolve a slot value through the vocabulary
    fn slot_token(&self, document: &IntentDocument, slot_name: &str) -> Option<Token> {
        let value = document.slot(slot_name)?.to_lowercase();
        match self.table.lookup(&value) {
            TokenKind::Invalid => None,
            kind => Some(Token::new(kind)),
        }
    }
}
