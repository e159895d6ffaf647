use serde::{Deserialize, Serialize};

/// Font style bit-flags, laid out as in the 3 font style bits of a token metadata word.
#[derive(
    Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Debug,
)]
pub struct FontStyle {
    bits: u8,
}

impl FontStyle {
    /// Italic font style
    pub const ITALIC: Self = Self { bits: 1 };
    /// Bold font style
    pub const BOLD: Self = Self { bits: 2 };
    /// Underline font style
    pub const UNDERLINE: Self = Self { bits: 4 };

    /// Returns an empty set of flags
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Rebuilds a font style from its raw bits, dropping unknown ones
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self { bits: bits & 0b111 }
    }

    /// The raw bits
    pub const fn bits(&self) -> u8 {
        self.bits
    }

    /// Returns `true` if no flags are currently stored
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Returns `true` if all of the flags in `other` are contained within `self`
    pub const fn contains(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }

    /// Returns the font style from a theme font style string
    pub fn from_str(font_style_str: &str) -> Self {
        let mut font_style = Self::empty();
        if font_style_str.contains("bold") {
            font_style.insert(FontStyle::BOLD);
        }
        if font_style_str.contains("italic") {
            font_style.insert(FontStyle::ITALIC);
        }
        if font_style_str.contains("underline") {
            font_style.insert(FontStyle::UNDERLINE);
        }
        font_style
    }

    /// Inserts the specified flags in-place
    pub fn insert(&mut self, other: Self) {
        self.bits |= other.bits;
    }

    /// CSS declarations for each flag, in italic/bold/underline order
    pub(crate) fn css_attributes(&self) -> impl Iterator<Item = &'static str> + '_ {
        [
            (FontStyle::ITALIC, "font-style: italic;"),
            (FontStyle::BOLD, "font-weight: bold;"),
            (FontStyle::UNDERLINE, "text-decoration: underline;"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, css)| css)
    }
}
