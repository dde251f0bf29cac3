//! Error adapter for converting [`CliError`] to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Property-list
//! errors carry no source spans, so reports consist of a stable code, the
//! message chain and, where one exists, a hint.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use graffle::GraffleError;

use crate::CliError;

/// Adapter that renders a [`CliError`] through miette.
pub struct ErrorAdapter<'a>(pub &'a CliError);

impl ErrorAdapter<'_> {
    /// The stable diagnostic code of the wrapped error.
    pub fn code_str(&self) -> &'static str {
        match self.0 {
            CliError::Config(_) => "graffle::config",
            CliError::Graffle(GraffleError::Io(_)) => "graffle::io",
            CliError::Graffle(GraffleError::Parse(_)) => "graffle::parse",
            CliError::Graffle(GraffleError::MalformedDocument(_)) => "graffle::document",
            CliError::Graffle(GraffleError::RecursionLimitExceeded { .. }) => "graffle::recursion",
        }
    }
}

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code_str()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0 {
            CliError::Graffle(GraffleError::Parse(_)) => {
                "only uncompressed XML documents are supported; gunzip compressed files first"
            }
            CliError::Graffle(GraffleError::MalformedDocument(_)) => {
                "check that --page is within the document's sheets"
            }
            CliError::Graffle(GraffleError::RecursionLimitExceeded { .. }) => {
                "raise render.max_depth in the configuration file"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}
