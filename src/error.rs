use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Why a raw code could not be turned into a GTIN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// Character at the given (0-based) position is not an ASCII digit.
    NonDigit { position: usize, found: char },
    /// Code has the given number of characters; only 12 or 13 are accepted.
    Length(usize),
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::NonDigit { position, found } => {
                write!(f, "non-digit character {found:?} at position {position}")
            }
            InvalidReason::Length(n) => write!(f, "expected 12 or 13 digits, got {n}"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid code {raw:?}: {reason}")]
pub struct InvalidInput {
    pub raw: String,
    pub reason: InvalidReason,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),

    #[error("source unavailable: {}: {message}", path.display())]
    SourceUnavailable { path: PathBuf, message: String },

    #[error("render failed: {0}")]
    Render(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("font error: {0}")]
    Font(String),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config { message: message.into() }
    }

    pub fn source_unavailable(path: impl Into<PathBuf>, message: impl fmt::Display) -> Self {
        Error::SourceUnavailable { path: path.into(), message: message.to_string() }
    }

    /// Fatal errors abort the whole run; everything else only skips a row.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::SourceUnavailable { .. } | Error::Config { .. } | Error::Font(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
