use std::fmt;
use std::io;

pub(crate) type TintaResult<T> = Result<T, Error>;

/// Errors that can occur during tinta usage
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred when reading a theme file
    Io(io::Error),

    /// JSON parsing failed when loading a theme.
    Json(serde_json::Error),

    /// An invalid hex color was encountered.
    /// Can only happen when loading a theme or parsing a color explicitly.
    #[allow(missing_docs)]
    InvalidHexColor { value: String, reason: String },

    /// No tokenization provider is registered for the language, or a deferred
    /// provider resolved to nothing.
    NoProvider(String),

    /// The colorize operation was cancelled between two lines.
    Cancelled,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Json(err) => write!(f, "JSON parsing error: {}", err),
            Error::InvalidHexColor { value, reason } => {
                write!(f, "invalid hex color '{}': {}", value, reason)
            }
            Error::NoProvider(language) => {
                write!(f, "no tokenization provider for language '{}'", language)
            }
            Error::Cancelled => write!(f, "operation cancelled"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::InvalidHexColor { .. }
            | Error::NoProvider(_)
            | Error::Cancelled => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}
