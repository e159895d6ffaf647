mod cancellation;
mod colorizer;
mod error;
mod output;

pub mod colors;
pub mod themes;
pub mod tokenization;

#[cfg(test)]
mod test_utils;

pub use cancellation::{CancellationToken, Cancelled};
pub use colorizer::{ColorizeElement, ColorizeOptions, Colorizer};
pub use colors::{ColorDefaults, ColorRegistry, ColorValue, register_standard_colors};
pub use error::Error;
pub use output::OutputBuffer;
pub use themes::{Color, ColorTheme, FontStyle, Theme, ThemeType};
pub use tokenization::{
    Grammar, Language, LanguageId, TokenMetadata, TokenTheme, TokenizationAdapter,
    TokenizationRegistry, TokenizationSupport,
};
