//! Non-fatal problems found while rendering.
//!
//! A graphic that cannot be drawn (an unknown shape, a missing bounds string,
//! an image reference past the end of the image list) produces a
//! [`Diagnostic`] and the walk moves on to its siblings. Diagnostics are
//! collected in walk order and returned alongside the SVG.

use std::fmt;

/// Category of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// The document uses a class, shape or reference the renderer does not
    /// support.
    UnsupportedFeature,
    /// A supported graphic lacked the data needed to build its geometry.
    ShapeBuildFailure,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::UnsupportedFeature => write!(f, "unsupported feature"),
            DiagnosticKind::ShapeBuildFailure => write!(f, "shape build failure"),
        }
    }
}

/// A non-fatal rendering problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::UnsupportedFeature, message)
    }

    pub fn shape_failure(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::ShapeBuildFailure, message)
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic::unsupported("shape `Star`");
        assert_eq!(diagnostic.kind(), DiagnosticKind::UnsupportedFeature);
        assert_eq!(diagnostic.to_string(), "unsupported feature: shape `Star`");
    }

    #[test]
    fn test_diagnostic_shape_failure() {
        let diagnostic = Diagnostic::shape_failure("missing `Bounds`");
        assert_eq!(diagnostic.kind(), DiagnosticKind::ShapeBuildFailure);
        assert_eq!(diagnostic.message(), "missing `Bounds`");
    }
}
