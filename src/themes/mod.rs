use serde::{Deserialize, Serialize};

mod color;
mod compiled;
mod font_style;
mod raw;
mod token_theme;

pub use color::Color;
pub use compiled::ColorTheme;
pub use font_style::FontStyle;
pub use raw::{RawTheme, TokenColorRule, TokenColorSettings};
pub use token_theme::{ColorMap, ScopeTokenTheme, Style, StyleModifier, TokenThemeRule};

/// Theme variant, each color default can differ per variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ThemeType {
    Light,
    #[default]
    Dark,
    HighContrast,
}

impl ThemeType {
    // (fg, bg)
    pub fn default_colors(&self) -> (Color, Color) {
        match self {
            ThemeType::Light => (Color::rgb(0x33, 0x33, 0x33), Color::rgb(0xFF, 0xFF, 0xFE)),
            ThemeType::Dark => (Color::rgb(0xD4, 0xD4, 0xD4), Color::rgb(0x1E, 0x1E, 0x1E)),
            ThemeType::HighContrast => (Color::WHITE, Color::BLACK),
        }
    }

    pub fn from_str(s: &str) -> ThemeType {
        if s.eq_ignore_ascii_case("light") || s.eq_ignore_ascii_case("vs") {
            ThemeType::Light
        } else if ["hc", "hc-black", "high-contrast", "hc-light"]
            .iter()
            .any(|hc| s.eq_ignore_ascii_case(hc))
        {
            ThemeType::HighContrast
        } else {
            ThemeType::Dark
        }
    }
}

/// What color resolution needs from the active theme.
pub trait Theme {
    fn theme_type(&self) -> ThemeType;

    /// The concrete color for a color identifier, if the theme has one
    fn get_color(&self, id: &str) -> Option<Color>;
}
