use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use tinta::tokenization::{RawLineTokens, RawToken, StateRef};
use tinta::{
    Color, ColorizeOptions, Colorizer, FontStyle, Grammar, Language, LanguageId, ThemeType,
    TokenTheme, TokenizationAdapter, TokenizationRegistry, TokenizationSupport,
};
use tinta::themes::{ScopeTokenTheme, Style, StyleModifier, TokenThemeRule};

#[derive(Debug, PartialEq)]
struct Unit;

/// One token per space separated word, cycling through a few scopes
struct SplitGrammar;

impl Grammar for SplitGrammar {
    fn initial_state(&self) -> StateRef {
        Arc::new(Unit)
    }

    fn tokenize(&self, line: &str, state: &StateRef) -> RawLineTokens {
        const SCOPES: [&str; 4] = [
            "source.js keyword.control",
            "source.js variable.other",
            "source.js string.quoted.double",
            "source.js variable.other",
        ];
        let mut offset = 0;
        let tokens = line
            .split(' ')
            .enumerate()
            .map(|(i, word)| {
                let token = RawToken::new(offset, SCOPES[i % SCOPES.len()]);
                offset += word.chars().count() as i64 + 1;
                token
            })
            .collect();
        RawLineTokens {
            tokens,
            end_state: Arc::new(Unit),
        }
    }
}

fn token_theme() -> ScopeTokenTheme {
    let rule = |scope: &str, hex: &str, font_style: Option<FontStyle>| {
        TokenThemeRule::new(
            scope,
            StyleModifier {
                foreground: Color::from_hex(hex).ok(),
                background: None,
                font_style,
            },
        )
    };
    ScopeTokenTheme::new(
        Style::default_for(ThemeType::Dark),
        vec![
            rule("keyword", "#569CD6", Some(FontStyle::BOLD)),
            rule("string", "#CE9178", None),
            rule("variable", "#9CDCFE", None),
        ],
    )
}

fn criterion_benchmark(c: &mut Criterion) {
    let line = "const answer = \"forty two\" + compute ( a , b ) ; // trailing words here";
    let theme: Arc<dyn TokenTheme> = Arc::new(token_theme());
    let adapter = TokenizationAdapter::new(
        Language::new("js", LanguageId(1)),
        Arc::new(SplitGrammar),
        Arc::clone(&theme),
    );
    let state = adapter.initial_state();

    c.bench_function("tokenize line", |b| {
        b.iter(|| std::hint::black_box(adapter.tokenize(line, &state, 0)))
    });

    c.bench_function("tokenize encoded line", |b| {
        b.iter(|| std::hint::black_box(adapter.tokenize_encoded(line, &state, 0)))
    });

    let encoded = adapter.tokenize_encoded(line, &state, 0);
    let colorizer = Colorizer::new(Arc::new(TokenizationRegistry::new()), theme);
    let options = ColorizeOptions::default();
    c.bench_function("colorize line", |b| {
        b.iter(|| std::hint::black_box(colorizer.colorize_line(line, &encoded.tokens, &options)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
