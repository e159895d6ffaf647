use std::sync::Arc;

use crate::tokenization::state::reuse_if_equal;
use crate::tokenization::{Grammar, Language, RawToken, StateRef, TokenTheme};

/// A classic token: corrected start offset, scope path and owning language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub start_index: usize,
    pub scopes: String,
    pub language: Arc<str>,
}

#[derive(Debug, Clone)]
pub struct TokenizationResult {
    pub tokens: Vec<Token>,
    pub end_state: StateRef,
}

/// Binary form: `[start_index, metadata]` pairs, one pair per run of equal metadata.
#[derive(Debug, Clone)]
pub struct EncodedTokenizationResult {
    pub tokens: Box<[u32]>,
    pub end_state: StateRef,
}

impl EncodedTokenizationResult {
    /// Number of `[start_index, metadata]` pairs
    pub fn run_count(&self) -> usize {
        self.tokens.len() / 2
    }
}

/// What the colorizer needs from a language: both tokenization shapes.
pub trait TokenizationSupport: Send + Sync {
    fn initial_state(&self) -> StateRef;

    fn tokenize(&self, line: &str, state: &StateRef, offset_delta: usize) -> TokenizationResult;

    fn tokenize_encoded(
        &self,
        line: &str,
        state: &StateRef,
        offset_delta: usize,
    ) -> EncodedTokenizationResult;
}

/// Packs a start offset into the binary form, saturating at `u32::MAX`.
pub(crate) fn encode_offset(offset: usize) -> u32 {
    u32::try_from(offset).unwrap_or_else(|_| {
        log::warn!("[encode_offset] offset {offset} does not fit in 32 bits, saturating");
        u32::MAX
    })
}

/// Corrects the start offsets reported by a grammar.
///
/// The first token always starts at 0 and every other token starts at least where the
/// previous corrected one did. Offsets are in characters and do not include any delta.
fn corrected_offsets(tokens: &[RawToken]) -> impl Iterator<Item = (usize, &RawToken)> + '_ {
    let mut previous = 0usize;
    tokens.iter().enumerate().map(move |(idx, token)| {
        let start = if idx == 0 {
            if token.start_index != 0 {
                log::trace!(
                    "[corrected_offsets] first token reported at {}, forcing 0",
                    token.start_index
                );
            }
            0
        } else if token.start_index < previous as i64 {
            log::trace!(
                "[corrected_offsets] token {idx} reported at {}, clamping to {previous}",
                token.start_index
            );
            previous
        } else {
            token.start_index as usize
        };
        previous = start;
        (start, token)
    })
}

/// Adapts a grammar engine for one language to [`TokenizationSupport`].
///
/// The grammar is an untrusted collaborator: its offsets are sanitized before being
/// emitted, and an end state equal to the input state is replaced by the input state
/// itself.
#[derive(Clone)]
pub struct TokenizationAdapter {
    language: Language,
    grammar: Arc<dyn Grammar>,
    token_theme: Arc<dyn TokenTheme>,
}

impl TokenizationAdapter {
    pub fn new(
        language: Language,
        grammar: Arc<dyn Grammar>,
        token_theme: Arc<dyn TokenTheme>,
    ) -> Self {
        Self {
            language,
            grammar,
            token_theme,
        }
    }

    pub fn language(&self) -> &Language {
        &self.language
    }
}

impl TokenizationSupport for TokenizationAdapter {
    fn initial_state(&self) -> StateRef {
        self.grammar.initial_state()
    }

    fn tokenize(&self, line: &str, state: &StateRef, offset_delta: usize) -> TokenizationResult {
        let raw = self.grammar.tokenize(line, state);

        let tokens = corrected_offsets(&raw.tokens)
            .map(|(start, token)| Token {
                start_index: start + offset_delta,
                scopes: token.scopes.clone(),
                language: Arc::clone(&self.language.name),
            })
            .collect();

        TokenizationResult {
            tokens,
            end_state: reuse_if_equal(state, raw.end_state),
        }
    }

    fn tokenize_encoded(
        &self,
        line: &str,
        state: &StateRef,
        offset_delta: usize,
    ) -> EncodedTokenizationResult {
        let raw = self.grammar.tokenize(line, state);

        let mut encoded = Vec::with_capacity(raw.tokens.len() * 2);
        let mut previous_metadata = None;
        for (start, token) in corrected_offsets(&raw.tokens) {
            let metadata = self
                .token_theme
                .match_scopes(self.language.id, &token.scopes)
                .bits();
            // Same style as the run we are in: the run simply goes on.
            if previous_metadata == Some(metadata) {
                continue;
            }
            encoded.push(encode_offset(start.saturating_add(offset_delta)));
            encoded.push(metadata);
            previous_metadata = Some(metadata);
        }

        EncodedTokenizationResult {
            tokens: encoded.into_boxed_slice(),
            end_state: reuse_if_equal(state, raw.end_state),
        }
    }
}
