//! Sandman command protocol
//!
//! This crate turns user input into a canonical token stream. Two inputs
//! are supported:
//!
//! - Free text from a speech-to-text transcript or a terminal, e.g.
//!   `"back raise 50"`, handled by [`Tokenizer`]
//! - Structured intent documents from a voice assistant, handled by
//!   [`IntentDocument`] and [`IntentExtractor`]
//!
//! Both produce the same `Vec<Token>`, so the dispatcher never needs to
//! know where a command came from.
//!
//! ```text
//! "legs up 30"  ──tokenize──▶ [LEGS, RAISE, INTEGER(30)]
//!
//! {"intent":{"intentName":"MovePart"},
//!  "slots":[{"slotName":"name","rawValue":"legs"},
//!           {"slotName":"direction","rawValue":"up"}]}
//!               ──extract───▶ [LEGS, RAISE]
//! ```

#![deny(unsafe_code)]

pub mod intent;
pub mod token;
pub mod tokenizer;

pub use intent::{Extraction, IntentDocument, IntentError, IntentExtractor, Slot};
pub use token::{Token, TokenKind, TokenTable};
pub use tokenizer::Tokenizer;
