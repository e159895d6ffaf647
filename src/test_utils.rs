//! Grammars and themes shared by the tests.

use std::collections::HashMap;
use std::sync::Arc;

use crate::themes::{Color, FontStyle, ScopeTokenTheme, Style, StyleModifier, Theme, ThemeType, TokenThemeRule};
use crate::tokenization::{Grammar, RawLineTokens, RawToken, StateRef};

/// A theme holding a fixed set of colors
pub(crate) struct MapTheme {
    theme_type: ThemeType,
    colors: HashMap<String, Color>,
}

impl MapTheme {
    pub(crate) fn new(theme_type: ThemeType) -> Self {
        Self {
            theme_type,
            colors: HashMap::new(),
        }
    }

    pub(crate) fn with(mut self, id: &str, hex: &str) -> Self {
        self.colors.insert(id.to_owned(), Color::from_hex(hex).unwrap());
        self
    }
}

impl Theme for MapTheme {
    fn theme_type(&self) -> ThemeType {
        self.theme_type
    }

    fn get_color(&self, id: &str) -> Option<Color> {
        self.colors.get(id).copied()
    }
}

#[derive(Debug, PartialEq)]
struct FixedState;

/// Returns the same tokens for every line, and always the same state
pub(crate) struct FixedGrammar {
    tokens: Vec<RawToken>,
    state: StateRef,
}

impl FixedGrammar {
    pub(crate) fn new(tokens: Vec<RawToken>) -> Self {
        Self {
            tokens,
            state: Arc::new(FixedState),
        }
    }
}

impl Grammar for FixedGrammar {
    fn initial_state(&self) -> StateRef {
        Arc::clone(&self.state)
    }

    fn tokenize(&self, _line: &str, _state: &StateRef) -> RawLineTokens {
        RawLineTokens {
            tokens: self.tokens.clone(),
            end_state: Arc::clone(&self.state),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
enum WordState {
    Normal,
    InComment,
}

const KEYWORDS: [&str; 5] = ["let", "fn", "if", "else", "return"];

/// A tiny space separated grammar: keywords, numbers, double quoted strings,
/// `//` line comments and `/* */` block comments spanning lines.
///
/// Allocates a new end state for every line, equal to the input one unless a block
/// comment was opened or closed.
pub(crate) struct WordGrammar;

impl Grammar for WordGrammar {
    fn initial_state(&self) -> StateRef {
        Arc::new(WordState::Normal)
    }

    fn tokenize(&self, line: &str, state: &StateRef) -> RawLineTokens {
        let mut in_comment = matches!(
            state.as_any().downcast_ref::<WordState>(),
            Some(WordState::InComment)
        );
        let mut line_comment = false;
        let mut tokens = Vec::new();
        let mut offset = 0;

        for word in line.split(' ') {
            let start = offset;
            offset += word.chars().count() as i64 + 1;
            if word.is_empty() {
                continue;
            }

            let scope = if line_comment {
                "source comment.line"
            } else if in_comment {
                in_comment = !word.ends_with("*/");
                "source comment.block"
            } else if word.starts_with("/*") {
                in_comment = !(word.len() >= 4 && word.ends_with("*/"));
                "source comment.block"
            } else if word.starts_with("//") {
                line_comment = true;
                "source comment.line"
            } else if KEYWORDS.contains(&word) {
                "source keyword"
            } else if word.starts_with('"') {
                "source string.quoted"
            } else if word.chars().all(|c| c.is_ascii_digit()) {
                "source constant.numeric"
            } else {
                "source"
            };
            tokens.push(RawToken::new(start, scope));
        }

        if tokens.is_empty() {
            tokens.push(RawToken::new(0, "source"));
        }

        let end_state = if in_comment {
            WordState::InComment
        } else {
            WordState::Normal
        };
        RawLineTokens {
            tokens,
            end_state: Arc::new(end_state),
        }
    }
}

/// Dark default style with a few VSCode dark+ rules.
/// Color indices: 3 comment, 4 keyword, 5 string, 6 regexp.
pub(crate) fn test_token_theme() -> ScopeTokenTheme {
    let rule = |scope: &str, hex: &str, font_style: Option<FontStyle>| {
        TokenThemeRule::new(
            scope,
            StyleModifier {
                foreground: Some(Color::from_hex(hex).unwrap()),
                background: None,
                font_style,
            },
        )
    };
    ScopeTokenTheme::new(
        Style::default_for(ThemeType::Dark),
        vec![
            rule("comment", "#6A9955", Some(FontStyle::ITALIC)),
            rule("keyword", "#569CD6", Some(FontStyle::BOLD)),
            rule("string", "#CE9178", None),
            rule("string.regexp", "#D16969", None),
        ],
    )
}
