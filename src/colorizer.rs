use std::collections::HashMap;
use std::sync::Arc;

use futures::future::{self, Either};
use futures::pin_mut;

use crate::cancellation::CancellationToken;
use crate::error::{Error, TintaResult};
use crate::output::OutputBuffer;
use crate::tokenization::{
    PLAIN_LANGUAGE_NAME, PlainTokenization, StateRef, TokenMetadata, TokenTheme,
    TokenizationRegistry, TokenizationSupport,
};

/// Options for colorizing, NOT tokenizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorizeOptions {
    pub(crate) tab_size: usize,
    pub(crate) use_nbsp: bool,
    pub(crate) fallback_to_plain: bool,
}

impl Default for ColorizeOptions {
    fn default() -> Self {
        Self {
            tab_size: 4,
            use_nbsp: false,
            fallback_to_plain: false,
        }
    }
}

impl ColorizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tabs expand to the next multiple of that many columns. 0 is treated as 1.
    pub fn tab_size(mut self, value: usize) -> Self {
        self.tab_size = value;
        self
    }

    /// Renders every other space of a run of spaces, and tab expansions,
    /// as `&#160;` so browsers do not collapse them.
    pub fn use_nbsp(mut self, value: bool) -> Self {
        self.use_nbsp = value;
        self
    }

    /// Whether to fallback to plain text if no tokenizer is
    /// registered for the requested language.
    pub fn fallback_to_plain(mut self, value: bool) -> Self {
        self.fallback_to_plain = value;
        self
    }
}

/// An element to colorize: its text and the language hints found on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorizeElement<'a> {
    pub text: &'a str,
    /// Explicit language, like a `data-lang` attribute
    pub lang: Option<&'a str>,
    pub mime_type: Option<&'a str>,
}

/// Splits on `\r\n`, `\r` and `\n`. A trailing line break gives a trailing empty line.
pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let bytes = text.as_bytes();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                start = i + 1;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    lines.push(&text[start..]);
    lines
}

/// Turns text into HTML, line by line, using the tokenizers of a [`TokenizationRegistry`]
/// and the colors of a [`TokenTheme`].
pub struct Colorizer {
    registry: Arc<TokenizationRegistry>,
    token_theme: Arc<dyn TokenTheme>,
    mime_types: HashMap<String, String>,
    plain: Arc<dyn TokenizationSupport>,
}

impl std::fmt::Debug for Colorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Colorizer")
            .field("registry", &self.registry)
            .field("mime_types", &self.mime_types)
            .finish_non_exhaustive()
    }
}

impl Colorizer {
    pub fn new(registry: Arc<TokenizationRegistry>, token_theme: Arc<dyn TokenTheme>) -> Self {
        Self {
            registry,
            token_theme,
            mime_types: HashMap::new(),
            plain: Arc::new(PlainTokenization::default()),
        }
    }

    pub fn registry(&self) -> &TokenizationRegistry {
        &self.registry
    }

    /// Elements with that MIME type and no explicit language are colorized as `language`
    pub fn register_mime_type(&mut self, mime_type: &str, language: &str) {
        self.mime_types
            .insert(mime_type.to_ascii_lowercase(), language.to_owned());
    }

    pub fn language_for_mime_type(&self, mime_type: &str) -> Option<&str> {
        self.mime_types
            .get(&mime_type.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Waits for the tokenizer of `language`, giving up as soon as `cancellation` triggers.
    async fn tokenization_for(
        &self,
        language: &str,
        options: &ColorizeOptions,
        cancellation: &CancellationToken,
    ) -> TintaResult<Arc<dyn TokenizationSupport>> {
        let wait = self.registry.get_or_wait(language);
        let cancelled = cancellation.cancelled();
        pin_mut!(wait);
        let resolved = match future::select(wait, cancelled).await {
            Either::Left((resolved, _)) => resolved,
            Either::Right(((), _)) => {
                log::debug!("[tokenization_for] cancelled while waiting for {language:?}");
                return Err(Error::Cancelled);
            }
        };
        match resolved {
            Err(Error::NoProvider(_)) if options.fallback_to_plain => {
                log::debug!("[tokenization_for] no provider for {language:?}, using plain text");
                Ok(Arc::clone(&self.plain))
            }
            other => other,
        }
    }

    /// Colorizes a whole text. Every line is followed by `<br/>`.
    ///
    /// Waits for the tokenizer of `language` if its registration is pending. Fails with
    /// [`Error::NoProvider`] if there is none (unless falling back to plain text) and with
    /// [`Error::Cancelled`] if `cancellation` is triggered before all lines are done.
    pub async fn colorize(
        &self,
        text: &str,
        language: &str,
        options: &ColorizeOptions,
        cancellation: &CancellationToken,
    ) -> TintaResult<String> {
        let support = self
            .tokenization_for(language, options, cancellation)
            .await?;
        let lines = split_lines(text);
        let mut buffer = OutputBuffer::with_capacity(text.len() * 2);
        let mut state: StateRef = support.initial_state();

        for line in lines {
            if cancellation.is_cancelled() {
                log::debug!("[colorize] cancelled while colorizing {language:?}");
                return Err(Error::Cancelled);
            }
            let result = support.tokenize_encoded(line, &state, 0);
            self.render_line(&mut buffer, line, &result.tokens, options);
            buffer.append_str("<br/>");
            state = result.end_state;
        }

        Ok(buffer.into_string())
    }

    /// Colorizes an element, its language coming from `lang` or else from its MIME type.
    /// Elements without either are plain text.
    pub async fn colorize_element(
        &self,
        element: &ColorizeElement<'_>,
        options: &ColorizeOptions,
        cancellation: &CancellationToken,
    ) -> TintaResult<String> {
        let language = element
            .lang
            .or_else(|| {
                element
                    .mime_type
                    .and_then(|mime| self.language_for_mime_type(mime))
            })
            .unwrap_or(PLAIN_LANGUAGE_NAME);
        self.colorize(element.text, language, options, cancellation)
            .await
    }

    /// Renders a single line from its encoded tokens, as returned by
    /// [`TokenizationSupport::tokenize_encoded`] with an offset delta of 0.
    pub fn colorize_line(&self, line: &str, tokens: &[u32], options: &ColorizeOptions) -> String {
        let mut buffer = OutputBuffer::with_capacity(line.len() * 2);
        self.render_line(&mut buffer, line, tokens, options);
        buffer.into_string()
    }

    fn run_style(&self, metadata: TokenMetadata) -> String {
        let mut style = String::new();
        if let Some(color) = self.token_theme.color(metadata.foreground()) {
            style.push_str("color: ");
            style.push_str(&color.as_hex());
            style.push(';');
        }
        for css in metadata.font_style().css_attributes() {
            style.push_str(css);
        }
        style
    }

    fn render_line(
        &self,
        buffer: &mut OutputBuffer,
        line: &str,
        tokens: &[u32],
        options: &ColorizeOptions,
    ) {
        buffer.append_str("<span>");

        let chars: Vec<char> = line.chars().collect();
        let mut writer = LineWriter::new(buffer, options);

        if tokens.len() < 2 {
            writer.open_run("");
            writer.write_chars(&chars);
            writer.close_run();
        } else {
            let runs = tokens.len() / 2;
            for run in 0..runs {
                let start = if run == 0 {
                    0
                } else {
                    (tokens[run * 2] as usize).min(chars.len())
                };
                let end = if run + 1 < runs {
                    (tokens[(run + 1) * 2] as usize).clamp(start, chars.len())
                } else {
                    chars.len()
                };
                let style = self.run_style(TokenMetadata::from_bits(tokens[run * 2 + 1]));
                writer.open_run(&style);
                writer.write_chars(&chars[start..end]);
                writer.close_run();
            }
        }

        buffer.append_str("</span>");
    }
}

/// Writes escaped characters of one line, keeping track of the column for tabs
struct LineWriter<'a> {
    buffer: &'a mut OutputBuffer,
    tab_size: usize,
    use_nbsp: bool,
    column: usize,
    last_was_space: bool,
}

impl<'a> LineWriter<'a> {
    fn new(buffer: &'a mut OutputBuffer, options: &ColorizeOptions) -> Self {
        Self {
            buffer,
            tab_size: options.tab_size.max(1),
            use_nbsp: options.use_nbsp,
            column: 0,
            last_was_space: false,
        }
    }

    fn open_run(&mut self, style: &str) {
        if style.is_empty() {
            self.buffer.append_str("<span>");
        } else {
            self.buffer.append_str("<span style=\"");
            self.buffer.append_str(style);
            self.buffer.append_str("\">");
        }
    }

    fn close_run(&mut self) {
        self.buffer.append_str("</span>");
    }

    fn write_chars(&mut self, chars: &[char]) {
        for &c in chars {
            let mut space = false;
            match c {
                '\t' => {
                    let width = self.tab_size - self.column % self.tab_size;
                    let filler = if self.use_nbsp { "&#160;" } else { " " };
                    for _ in 0..width {
                        self.buffer.append_str(filler);
                    }
                    self.column += width;
                    self.last_was_space = !self.use_nbsp;
                    continue;
                }
                ' ' => {
                    if self.use_nbsp && self.last_was_space {
                        self.buffer.append_str("&#160;");
                    } else {
                        self.buffer.append_char(' ');
                        space = true;
                    }
                }
                '<' => self.buffer.append_str("&lt;"),
                '>' => self.buffer.append_str("&gt;"),
                '&' => self.buffer.append_str("&amp;"),
                '\0' => self.buffer.append_str("&#00;"),
                '\r' => self.buffer.append_str("&#8203;"),
                '\u{FEFF}' | '\u{2028}' | '\u{2029}' | '\u{0085}' => {
                    self.buffer.append_code_point(0xFFFD)
                }
                _ => self.buffer.append_char(c),
            }
            self.last_was_space = space;
            self.column += 1;
        }
    }
}
