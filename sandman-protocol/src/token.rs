//! Command tokens and the word table that classifies them

use std::collections::HashMap;
use std::fmt;

/// Kind of a command token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TokenKind {
    /// The back section of the bed
    Back,
    /// The legs section of the bed
    Legs,
    /// The elevation (whole bed height)
    Elevation,
    /// Move a part up, or turn the volume up
    Raise,
    /// Move a part down, or turn the volume down
    Lower,
    /// Stop everything, or stop the schedule after `Schedule`
    Stop,
    Volume,
    Schedule,
    Start,
    /// Dedicated "stop the schedule" keyword for producers that emit it
    StopSched,
    Status,
    /// Number carried in the token parameter
    Integer,
    #[default]
    Invalid,
}

impl TokenKind {
    /// Check if this kind names a movable bed section
    pub fn is_part(&self) -> bool {
        matches!(self, TokenKind::Back | TokenKind::Legs | TokenKind::Elevation)
    }

    /// Check if this kind is a movement direction
    pub fn is_direction(&self) -> bool {
        matches!(self, TokenKind::Raise | TokenKind::Lower)
    }

    /// Canonical lowercase name, used in log output
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Back => "back",
            TokenKind::Legs => "legs",
            TokenKind::Elevation => "elevation",
            TokenKind::Raise => "raise",
            TokenKind::Lower => "lower",
            TokenKind::Stop => "stop",
            TokenKind::Volume => "volume",
            TokenKind::Schedule => "schedule",
            TokenKind::Start => "start",
            TokenKind::StopSched => "stop_sched",
            TokenKind::Status => "status",
            TokenKind::Integer => "integer",
            TokenKind::Invalid => "invalid",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single classified unit of a command
///
/// Tokens are immutable. The parameter is only meaningful for
/// [`TokenKind::Integer`] and is zero for every other kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Token {
    kind: TokenKind,
    parameter: u32,
}

impl Token {
    /// Create a token without a parameter
    pub const fn new(kind: TokenKind) -> Self {
        Self { kind, parameter: 0 }
    }

    /// Create an integer token
    pub const fn integer(value: u32) -> Self {
        Self {
            kind: TokenKind::Integer,
            parameter: value,
        }
    }

    /// Token kind
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Integer parameter (zero unless the kind is `Integer`)
    pub fn parameter(&self) -> u32 {
        self.parameter
    }

    /// Check if this token is the given kind
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl From<TokenKind> for Token {
    fn from(kind: TokenKind) -> Self {
        Token::new(kind)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Integer => write!(f, "integer({})", self.parameter),
            kind => f.write_str(kind.name()),
        }
    }
}

/// Vocabulary used to classify words into token kinds
///
/// Shared by the tokenizer and the intent extractor so that a slot value
/// like `"up"` resolves exactly the way the spoken word does.
#[derive(Debug, Clone)]
pub struct TokenTable {
    words: HashMap<&'static str, TokenKind>,
}

/// Standard vocabulary, including the `up`/`down` synonyms
const STANDARD_WORDS: &[(&str, TokenKind)] = &[
    ("back", TokenKind::Back),
    ("legs", TokenKind::Legs),
    ("elevation", TokenKind::Elevation),
    ("raise", TokenKind::Raise),
    ("up", TokenKind::Raise),
    ("lower", TokenKind::Lower),
    ("down", TokenKind::Lower),
    ("stop", TokenKind::Stop),
    ("volume", TokenKind::Volume),
    ("schedule", TokenKind::Schedule),
    ("start", TokenKind::Start),
    ("status", TokenKind::Status),
];

impl Default for TokenTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenTable {
    /// Create a table with the standard vocabulary
    pub fn new() -> Self {
        Self {
            words: STANDARD_WORDS.iter().copied().collect(),
        }
    }

    /// Look up an already-lowercased word
    ///
    /// Returns `TokenKind::Invalid` for words not in the vocabulary.
    pub fn lookup(&self, word: &str) -> TokenKind {
        self.words.get(word).copied().unwrap_or(TokenKind::Invalid)
    }

    /// Number of words in the vocabulary
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if the vocabulary is empty
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
