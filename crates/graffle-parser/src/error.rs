//! Error type for the graffle2svg decoders.

use thiserror::Error;

/// Errors raised while decoding property lists, coordinates or rich text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The property-list markup could not be parsed.
    #[error("malformed markup: {0}")]
    MalformedMarkup(String),

    /// A Cocoa coordinate string such as `{{0, 0}, {10, 10}}` was invalid.
    #[error("invalid coordinates `{input}`: {reason}")]
    InvalidCoordinates { input: String, reason: String },

    /// The RTF label text could not be tokenized.
    #[error("invalid rich text at byte {offset}")]
    InvalidRichText { offset: usize },
}

pub(crate) type Result<T> = std::result::Result<T, ParseError>;
