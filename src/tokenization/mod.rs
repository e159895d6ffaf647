//! Line tokenization: the contracts of the grammar engine and of the token theme,
//! the adapter normalizing grammar output, and the registry of providers per language.

use std::sync::Arc;

use crate::themes::Color;

mod adapter;
mod metadata;
mod plain;
mod registry;
mod state;

pub use adapter::{
    EncodedTokenizationResult, Token, TokenizationAdapter, TokenizationResult,
    TokenizationSupport,
};
pub use metadata::{
    DEFAULT_BACKGROUND_INDEX, DEFAULT_FOREGROUND_INDEX, LanguageId, MAX_COLOR_INDEX,
    NONE_COLOR_INDEX, StandardTokenType, TokenMetadata,
};
pub use plain::{PLAIN_LANGUAGE_NAME, PlainTokenization};
pub use registry::{Lookup, TokenizationRegistry};
pub use state::{State, StateRef};

/// A language as seen by tokenization: its name and its 8-bit encoded id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Language {
    pub name: Arc<str>,
    pub id: LanguageId,
}

impl Language {
    pub fn new(name: &str, id: LanguageId) -> Self {
        Self {
            name: Arc::from(name),
            id,
        }
    }
}

/// A token as reported by a grammar engine.
///
/// `start_index` counts characters from the start of the line. Grammars are not
/// trusted: the value may be negative or go backwards, see [`TokenizationAdapter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    pub start_index: i64,
    /// Space-separated scope path, outermost first, e.g. `source.js string.quoted`
    pub scopes: String,
}

impl RawToken {
    pub fn new(start_index: i64, scopes: impl Into<String>) -> Self {
        Self {
            start_index,
            scopes: scopes.into(),
        }
    }
}

/// Output of a grammar engine for a single line
#[derive(Debug, Clone)]
pub struct RawLineTokens {
    pub tokens: Vec<RawToken>,
    pub end_state: StateRef,
}

/// The grammar engine of a language, turning a line and a state into scoped tokens.
pub trait Grammar: Send + Sync {
    fn initial_state(&self) -> StateRef;

    fn tokenize(&self, line: &str, state: &StateRef) -> RawLineTokens;
}

/// Maps a scope path to a packed metadata word for the active theme, and owns
/// the color table the foreground/background indices refer to.
pub trait TokenTheme: Send + Sync {
    fn match_scopes(&self, language: LanguageId, scopes: &str) -> TokenMetadata;

    /// The color behind a color index. Index 0 is always `None`.
    fn color(&self, index: u16) -> Option<Color>;
}
