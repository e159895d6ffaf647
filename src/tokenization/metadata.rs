//! Bit layout of the 32-bit metadata word attached to each binary token run.
//!
//! From least to most significant bit:
//! ```text
//! |bbbb bbbb bfff ffff ffFF FTTT LLLL LLLL|
//! ```
//! - L: 8 bits language id
//! - T: 3 bits standard token type
//! - F: 3 bits font style
//! - f: 9 bits foreground color index
//! - b: 9 bits background color index

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::themes::FontStyle;

const LANGUAGE_ID_MASK: u32 = 0b0000_0000_0000_0000_0000_0000_1111_1111;
const TOKEN_TYPE_MASK: u32 = 0b0000_0000_0000_0000_0000_0111_0000_0000;
const FONT_STYLE_MASK: u32 = 0b0000_0000_0000_0000_0011_1000_0000_0000;
const FOREGROUND_MASK: u32 = 0b0000_0000_0111_1111_1100_0000_0000_0000;
const BACKGROUND_MASK: u32 = 0b1111_1111_1000_0000_0000_0000_0000_0000;

const LANGUAGE_ID_OFFSET: u32 = 0;
const TOKEN_TYPE_OFFSET: u32 = 8;
const FONT_STYLE_OFFSET: u32 = 11;
const FOREGROUND_OFFSET: u32 = 14;
const BACKGROUND_OFFSET: u32 = 23;

/// Color index meaning "no color"
pub const NONE_COLOR_INDEX: u16 = 0;
/// Color index of the theme default foreground
pub const DEFAULT_FOREGROUND_INDEX: u16 = 1;
/// Color index of the theme default background
pub const DEFAULT_BACKGROUND_INDEX: u16 = 2;
/// Largest color index that fits in 9 bits
pub const MAX_COLOR_INDEX: u16 = 511;

/// Encoded language id, the low 8 bits of a metadata word
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct LanguageId(pub u8);

impl fmt::Debug for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LanguageId({})", self.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum StandardTokenType {
    #[default]
    Other = 0,
    Comment = 1,
    String = 2,
    RegEx = 4,
}

impl StandardTokenType {
    pub fn from_bits(bits: u8) -> Self {
        match bits {
            1 => StandardTokenType::Comment,
            2 => StandardTokenType::String,
            4 => StandardTokenType::RegEx,
            _ => StandardTokenType::Other,
        }
    }

    /// Infers the token type from a scope path.
    ///
    /// The innermost scope having a `comment`, `string` or `regex` segment decides, using
    /// its first such segment.
    pub fn from_scopes(scopes: &str) -> Self {
        for scope in scopes.split_whitespace().rev() {
            for segment in scope.split('.') {
                match segment {
                    "comment" => return StandardTokenType::Comment,
                    "string" => return StandardTokenType::String,
                    "regex" | "regexp" => return StandardTokenType::RegEx,
                    _ => {}
                }
            }
        }
        StandardTokenType::Other
    }
}

/// The packed metadata word of a binary token run
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TokenMetadata(u32);

impl TokenMetadata {
    /// Packs the fields. Color indices above [`MAX_COLOR_INDEX`] are truncated to 9 bits.
    pub const fn new(
        language: LanguageId,
        token_type: StandardTokenType,
        font_style: FontStyle,
        foreground: u16,
        background: u16,
    ) -> Self {
        Self(
            ((language.0 as u32) << LANGUAGE_ID_OFFSET)
                | (((token_type as u32) << TOKEN_TYPE_OFFSET) & TOKEN_TYPE_MASK)
                | (((font_style.bits() as u32) << FONT_STYLE_OFFSET) & FONT_STYLE_MASK)
                | (((foreground as u32) << FOREGROUND_OFFSET) & FOREGROUND_MASK)
                | (((background as u32) << BACKGROUND_OFFSET) & BACKGROUND_MASK),
        )
    }

    /// Metadata used when nothing matched: default colors, no style.
    pub const fn default_for(language: LanguageId) -> Self {
        Self::new(
            language,
            StandardTokenType::Other,
            FontStyle::empty(),
            DEFAULT_FOREGROUND_INDEX,
            DEFAULT_BACKGROUND_INDEX,
        )
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn language_id(self) -> LanguageId {
        LanguageId(((self.0 & LANGUAGE_ID_MASK) >> LANGUAGE_ID_OFFSET) as u8)
    }

    pub fn token_type(self) -> StandardTokenType {
        StandardTokenType::from_bits(((self.0 & TOKEN_TYPE_MASK) >> TOKEN_TYPE_OFFSET) as u8)
    }

    pub const fn font_style(self) -> FontStyle {
        FontStyle::from_bits_truncate(((self.0 & FONT_STYLE_MASK) >> FONT_STYLE_OFFSET) as u8)
    }

    pub const fn foreground(self) -> u16 {
        ((self.0 & FOREGROUND_MASK) >> FOREGROUND_OFFSET) as u16
    }

    pub const fn background(self) -> u16 {
        ((self.0 & BACKGROUND_MASK) >> BACKGROUND_OFFSET) as u16
    }

    /// Same style, stamped with another language id
    pub const fn with_language(self, language: LanguageId) -> Self {
        Self((self.0 & !LANGUAGE_ID_MASK) | ((language.0 as u32) << LANGUAGE_ID_OFFSET))
    }
}

impl fmt::Debug for TokenMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenMetadata")
            .field("language", &self.language_id().0)
            .field("token_type", &self.token_type())
            .field("font_style", &self.font_style().bits())
            .field("foreground", &self.foreground())
            .field("background", &self.background())
            .finish()
    }
}
