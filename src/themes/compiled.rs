use std::collections::HashMap;
use std::path::Path;

use crate::colors::{ColorRegistry, EDITOR_BACKGROUND, EDITOR_FOREGROUND};
use crate::error::TintaResult;
use crate::themes::raw::RawTheme;
use crate::themes::token_theme::{ScopeTokenTheme, Style, StyleModifier, TokenThemeRule};
use crate::themes::{Color, Theme, ThemeType};

/// A theme: its type, the colors it defines for color identifiers and its token rules.
///
/// Colors the theme does not define fall back to the defaults of the color registry it
/// is attached to, if any.
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub name: String,
    pub theme_type: ThemeType,
    colors: HashMap<String, Color>,
    /// Settings of the `tokenColors` entry without scope, if any
    default_modifier: StyleModifier,
    token_rules: Vec<TokenThemeRule>,
    registry: Option<ColorRegistry>,
}

impl ColorTheme {
    pub fn new(name: impl Into<String>, theme_type: ThemeType) -> Self {
        Self {
            name: name.into(),
            theme_type,
            colors: HashMap::new(),
            default_modifier: StyleModifier::default(),
            token_rules: Vec::new(),
            registry: None,
        }
    }

    pub fn with_color(mut self, id: impl Into<String>, color: Color) -> Self {
        self.colors.insert(id.into(), color);
        self
    }

    pub fn with_token_rule(mut self, rule: TokenThemeRule) -> Self {
        self.token_rules.push(rule);
        self
    }

    /// Resolve colors not defined by the theme through the registry defaults
    pub fn with_registry(mut self, registry: ColorRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn from_raw_theme(raw_theme: RawTheme) -> TintaResult<Self> {
        let theme_type = raw_theme
            .type_
            .as_deref()
            .map(ThemeType::from_str)
            .unwrap_or_default();

        let mut colors = HashMap::with_capacity(raw_theme.colors.len());
        for (id, value) in raw_theme.colors {
            let color = Color::from_hex(&value)?;
            colors.insert(id, color);
        }

        let mut default_modifier = StyleModifier::default();
        let mut token_rules = Vec::new();
        for token_rule in raw_theme.token_colors {
            let style_modifier = StyleModifier::try_from(token_rule.settings)?;
            if token_rule.scope.is_empty() {
                default_modifier = style_modifier;
                continue;
            }
            for scope in token_rule.scope {
                token_rules.push(TokenThemeRule::new(scope, style_modifier));
            }
        }

        Ok(Self {
            name: raw_theme.name,
            theme_type,
            colors,
            default_modifier,
            token_rules,
            registry: None,
        })
    }

    /// Reads a VSCode-style JSON theme file
    pub fn load_from_file(path: impl AsRef<Path>) -> TintaResult<Self> {
        RawTheme::load_from_file(path)?.compile()
    }

    pub fn from_json(json: &str) -> TintaResult<Self> {
        RawTheme::from_json(json)?.compile()
    }

    /// Whether the theme itself defines that color
    pub fn defines(&self, id: &str) -> bool {
        self.colors.contains_key(id)
    }

    /// The style of tokens no rule matches: editor colors (or the theme type fallbacks)
    /// with the scope-less `tokenColors` entry applied.
    pub fn default_style(&self) -> Style {
        let fallback = Style::default_for(self.theme_type);
        let editor_style = Style {
            foreground: self
                .get_color(EDITOR_FOREGROUND)
                .unwrap_or(fallback.foreground),
            background: self
                .get_color(EDITOR_BACKGROUND)
                .unwrap_or(fallback.background),
            font_style: fallback.font_style,
        };
        self.default_modifier.apply_to(&editor_style)
    }

    /// Builds the token theme of that theme
    pub fn token_theme(&self) -> ScopeTokenTheme {
        ScopeTokenTheme::new(self.default_style(), self.token_rules.iter().cloned())
    }
}

impl Theme for ColorTheme {
    fn theme_type(&self) -> ThemeType {
        self.theme_type
    }

    fn get_color(&self, id: &str) -> Option<Color> {
        if let Some(color) = self.colors.get(id) {
            return Some(*color);
        }
        self.registry
            .as_ref()
            .and_then(|registry| registry.resolve_default_color(id, self))
    }
}
