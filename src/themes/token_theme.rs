use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::themes::font_style::FontStyle;
use crate::themes::raw::TokenColorSettings;
use crate::themes::{Color, ThemeType};
use crate::tokenization::{
    DEFAULT_BACKGROUND_INDEX, DEFAULT_FOREGROUND_INDEX, LanguageId, MAX_COLOR_INDEX,
    NONE_COLOR_INDEX, StandardTokenType, TokenMetadata, TokenTheme,
};

/// A complete style with foreground, background colors and font styling
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct Style {
    pub foreground: Color,
    pub background: Color,
    pub font_style: FontStyle,
}

impl Style {
    /// The fallback style of a theme type, used when a theme defines no editor colors
    pub fn default_for(theme_type: ThemeType) -> Style {
        let (foreground, background) = theme_type.default_colors();
        Style {
            foreground,
            background,
            font_style: FontStyle::empty(),
        }
    }
}

/// A style modifier with optional values for theme parsing
///
/// This represents theme entries where colors and font styles are optional.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct StyleModifier {
    pub foreground: Option<Color>,
    pub background: Option<Color>,
    pub font_style: Option<FontStyle>,
}

impl StyleModifier {
    pub fn apply_to(&self, style: &Style) -> Style {
        Style {
            foreground: self.foreground.unwrap_or(style.foreground),
            background: self.background.unwrap_or(style.background),
            font_style: self.font_style.unwrap_or(style.font_style),
        }
    }
}

impl TryFrom<TokenColorSettings> for StyleModifier {
    type Error = Error;

    fn try_from(settings: TokenColorSettings) -> Result<Self, Self::Error> {
        let foreground = settings.foreground().map(Color::from_hex).transpose()?;
        let background = settings.background().map(Color::from_hex).transpose()?;
        let font_style = settings.font_style.as_deref().map(FontStyle::from_str);

        Ok(Self {
            foreground,
            background,
            font_style,
        })
    }
}

/// A theme rule: a dotted scope and how it modifies the style of matching tokens.
///
/// `comment` matches `comment` and `comment.line.double-slash`; the rule with the most
/// segments wins.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenThemeRule {
    pub scope: String,
    pub style_modifier: StyleModifier,
}

impl TokenThemeRule {
    pub fn new(scope: impl Into<String>, style_modifier: StyleModifier) -> Self {
        Self {
            scope: scope.into(),
            style_modifier,
        }
    }
}

/// The color table behind the 9-bit color indices of a theme.
///
/// Index 0 is "no color", 1 the default foreground, 2 the default background, and
/// other colors get the next free index the first time they are seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorMap {
    // colors[i] is the color of index i + 1
    colors: Vec<Color>,
    ids: HashMap<Color, u16>,
}

impl ColorMap {
    fn new(foreground: Color, background: Color) -> Self {
        let mut ids = HashMap::new();
        ids.insert(foreground, DEFAULT_FOREGROUND_INDEX);
        ids.entry(background).or_insert(DEFAULT_BACKGROUND_INDEX);
        Self {
            colors: vec![foreground, background],
            ids,
        }
    }

    fn get_id(&mut self, color: Color, fallback: u16) -> u16 {
        if let Some(&id) = self.ids.get(&color) {
            return id;
        }
        if self.colors.len() >= MAX_COLOR_INDEX as usize {
            log::warn!(
                "[get_id] color map is full, {} will use index {fallback}",
                color.as_hex()
            );
            return fallback;
        }
        self.colors.push(color);
        let id = self.colors.len() as u16;
        self.ids.insert(color, id);
        id
    }

    pub fn get(&self, index: u16) -> Option<Color> {
        if index == NONE_COLOR_INDEX {
            return None;
        }
        self.colors.get(usize::from(index) - 1).copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// A [`StyleModifier`] with colors replaced by their index in the color map
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
struct CompiledModifier {
    foreground: Option<u16>,
    background: Option<u16>,
    font_style: Option<FontStyle>,
}

/// A [`TokenTheme`] made of [`TokenThemeRule`]s.
///
/// Each scope of a scope path, outermost first, applies its most specific rule on top
/// of the style accumulated so far, so inner scopes inherit what they do not override.
pub struct ScopeTokenTheme {
    default_style: Style,
    rules: HashMap<String, CompiledModifier>,
    color_map: ColorMap,
    // scope path -> metadata, without the language id
    cache: papaya::HashMap<String, TokenMetadata>,
}

impl fmt::Debug for ScopeTokenTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeTokenTheme")
            .field("default_style", &self.default_style)
            .field("rules", &self.rules)
            .field("color_map", &self.color_map)
            .finish()
    }
}

impl ScopeTokenTheme {
    pub fn new(default_style: Style, rules: impl IntoIterator<Item = TokenThemeRule>) -> Self {
        let mut color_map = ColorMap::new(default_style.foreground, default_style.background);
        let mut compiled: HashMap<String, CompiledModifier> = HashMap::new();

        for rule in rules {
            let modifier = rule.style_modifier;
            let foreground = modifier
                .foreground
                .map(|c| color_map.get_id(c, DEFAULT_FOREGROUND_INDEX));
            let background = modifier
                .background
                .map(|c| color_map.get_id(c, DEFAULT_BACKGROUND_INDEX));

            for selector in rule.scope.split(',') {
                // Parent selectors are not supported: only the innermost scope is kept
                let Some(scope) = selector.split_whitespace().last() else {
                    continue;
                };
                let entry = compiled.entry(scope.to_owned()).or_default();
                // Later rules win, field by field
                if foreground.is_some() {
                    entry.foreground = foreground;
                }
                if background.is_some() {
                    entry.background = background;
                }
                if modifier.font_style.is_some() {
                    entry.font_style = modifier.font_style;
                }
            }
        }

        Self {
            default_style,
            rules: compiled,
            color_map,
            cache: papaya::HashMap::new(),
        }
    }

    pub fn default_style(&self) -> Style {
        self.default_style
    }

    pub fn color_map(&self) -> &ColorMap {
        &self.color_map
    }

    /// Finds the rule with the longest dotted prefix of `scope`
    fn most_specific_rule(&self, scope: &str) -> Option<&CompiledModifier> {
        let mut candidate = scope;
        loop {
            if let Some(modifier) = self.rules.get(candidate) {
                return Some(modifier);
            }
            candidate = &candidate[..candidate.rfind('.')?];
        }
    }

    fn match_scopes_uncached(&self, scopes: &str) -> TokenMetadata {
        let mut foreground = DEFAULT_FOREGROUND_INDEX;
        let mut background = DEFAULT_BACKGROUND_INDEX;
        let mut font_style = self.default_style.font_style;

        for scope in scopes.split_whitespace() {
            if let Some(modifier) = self.most_specific_rule(scope) {
                foreground = modifier.foreground.unwrap_or(foreground);
                background = modifier.background.unwrap_or(background);
                font_style = modifier.font_style.unwrap_or(font_style);
            }
        }

        TokenMetadata::new(
            LanguageId(0),
            StandardTokenType::from_scopes(scopes),
            font_style,
            foreground,
            background,
        )
    }

    /// The resolved style of a scope path
    pub fn style_for(&self, scopes: &str) -> Style {
        let metadata = self.match_scopes(LanguageId(0), scopes);
        Style {
            foreground: self
                .color(metadata.foreground())
                .unwrap_or(self.default_style.foreground),
            background: self
                .color(metadata.background())
                .unwrap_or(self.default_style.background),
            font_style: metadata.font_style(),
        }
    }
}

impl TokenTheme for ScopeTokenTheme {
    fn match_scopes(&self, language: LanguageId, scopes: &str) -> TokenMetadata {
        let cache = self.cache.pin();
        if let Some(metadata) = cache.get(scopes) {
            return metadata.with_language(language);
        }

        let metadata = self.match_scopes_uncached(scopes);
        cache.insert(scopes.to_owned(), metadata);
        metadata.with_language(language)
    }

    fn color(&self, index: u16) -> Option<Color> {
        self.color_map.get(index)
    }
}
