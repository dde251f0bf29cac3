//! Error types for graffle conversions.
//!
//! [`GraffleError`] covers the conditions that abort a conversion. Problems
//! confined to a single graphic are reported as
//! [`Diagnostic`](crate::Diagnostic)s instead and never stop the walk.

use std::io;

use thiserror::Error;

use graffle_parser::ParseError;

/// The main error type for graffle operations.
#[derive(Debug, Error)]
pub enum GraffleError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Graphics nesting exceeds the maximum depth of {depth}")]
    RecursionLimitExceeded { depth: usize },
}

impl GraffleError {
    /// Create a new `MalformedDocument` error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument(message.into())
    }
}
