use std::sync::Arc;

use crate::tokenization::adapter::encode_offset;
use crate::tokenization::{
    EncodedTokenizationResult, Language, LanguageId, StateRef, Token, TokenMetadata,
    TokenizationResult, TokenizationSupport,
};

/// The default language name, where nothing is highlighted
pub const PLAIN_LANGUAGE_NAME: &str = "plaintext";

#[derive(Debug, PartialEq)]
struct PlainState;

/// Tokenization that does not look at the text: one token per line with the default
/// style and a state that never changes.
#[derive(Debug, Clone)]
pub struct PlainTokenization {
    language: Language,
    state: StateRef,
}

impl PlainTokenization {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            state: Arc::new(PlainState),
        }
    }
}

impl Default for PlainTokenization {
    fn default() -> Self {
        Self::new(Language::new(PLAIN_LANGUAGE_NAME, LanguageId(0)))
    }
}

impl TokenizationSupport for PlainTokenization {
    fn initial_state(&self) -> StateRef {
        Arc::clone(&self.state)
    }

    fn tokenize(&self, _line: &str, state: &StateRef, offset_delta: usize) -> TokenizationResult {
        TokenizationResult {
            tokens: vec![Token {
                start_index: offset_delta,
                scopes: String::new(),
                language: Arc::clone(&self.language.name),
            }],
            end_state: Arc::clone(state),
        }
    }

    fn tokenize_encoded(
        &self,
        _line: &str,
        state: &StateRef,
        offset_delta: usize,
    ) -> EncodedTokenizationResult {
        let metadata = TokenMetadata::default_for(self.language.id);
        EncodedTokenizationResult {
            tokens: vec![encode_offset(offset_delta), metadata.bits()].into_boxed_slice(),
            end_state: Arc::clone(state),
        }
    }
}
