//! Free-text tokenizer
//!
//! Splits a command string on single spaces and classifies every piece.
//! Tokenizing never fails: words outside the vocabulary, empty pieces
//! between repeated spaces and numbers too large for a `u32` all become
//! [`TokenKind::Invalid`] tokens, which the dispatcher skips.

use crate::token::{Token, TokenKind, TokenTable};

/// Turns command text into tokens
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    table: TokenTable,
}

impl Tokenizer {
    /// Create a tokenizer using the given vocabulary
    pub fn new(table: TokenTable) -> Self {
        Self { table }
    }

    /// Vocabulary used by this tokenizer
    pub fn table(&self) -> &TokenTable {
        &self.table
    }

    /// Tokenize a command string
    ///
    /// Produces exactly one token per `' '`-separated piece, in order.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        text.split(' ').map(|piece| self.classify(piece)).collect()
    }

    /// Classify a single piece of text
    pub fn classify(&self, piece: &str) -> Token {
        let word = piece.to_lowercase();

        let kind = self.table.lookup(&word);
        if kind != TokenKind::Invalid {
            return Token::new(kind);
        }

        parse_integer(&word).map_or(Token::default(), Token::integer)
    }
}

/// Parse an all-digit word
///
/// Empty words and values that overflow `u32` are rejected.
fn parse_integer(word: &str) -> Option<u32> {
    if word.is_empty() || !word.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    word.parse().ok()
}
