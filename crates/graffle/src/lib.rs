//! graffle - Convert OmniGraffle diagrams to SVG.
//!
//! Decoding, page selection and rendering of OmniGraffle property-list
//! documents. The graphics tree of one page is walked depth-first with a
//! cascading style, each shape is turned into SVG geometry, and shared
//! arrowhead and shadow definitions are emitted once at the end.

pub mod config;
pub mod document;
pub mod graphic;
pub mod render;

mod diagnostic;
mod error;

pub use graffle_core::{color, geometry, style};

pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::GraffleError;
pub use render::Conversion;

use log::{debug, info, trace};

use config::AppConfig;
use document::Document;

/// Converter from OmniGraffle markup to SVG.
///
/// # Examples
///
/// ```rust,no_run
/// use graffle::{Converter, config::AppConfig};
///
/// let markup = std::fs::read_to_string("diagram.graffle").expect("readable file");
///
/// let converter = Converter::new(AppConfig::default());
///
/// // Decode and select the page
/// let document = converter.parse(&markup).expect("Failed to parse");
///
/// // Render it
/// let conversion = converter.render(&document).expect("Failed to render");
/// for diagnostic in conversion.diagnostics() {
///     eprintln!("warning: {diagnostic}");
/// }
/// println!("{}", conversion.svg());
/// ```
#[derive(Debug, Default)]
pub struct Converter {
    config: AppConfig,
}

impl Converter {
    /// Create a new converter with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Decode markup and select the configured page.
    ///
    /// # Errors
    ///
    /// Returns [`GraffleError::Parse`] for markup that is not a property
    /// list and [`GraffleError::MalformedDocument`] when the page cannot be
    /// selected.
    pub fn parse(&self, markup: &str) -> Result<Document, GraffleError> {
        info!(bytes = markup.len(); "Parsing document");

        let value = graffle_parser::decode(markup)?;
        let document = Document::from_value(&value, self.config.render().page())?;

        debug!(
            version = document.file_info().format_version(),
            sheets:? = document.sheet_count();
            "Document parsed successfully"
        );
        trace!(document:?; "Parsed document");

        Ok(document)
    }

    /// Render the selected page of a parsed document.
    ///
    /// # Errors
    ///
    /// Returns [`GraffleError::RecursionLimitExceeded`] when groups nest
    /// deeper than the configured maximum.
    pub fn render(&self, document: &Document) -> Result<Conversion, GraffleError> {
        render::render_document(document, &self.config)
    }

    /// Parse and render in one step.
    ///
    /// # Examples
    ///
    /// ```
    /// use graffle::Converter;
    ///
    /// let markup = r#"<?xml version="1.0" encoding="UTF-8"?>
    /// <plist version="1.0">
    /// <dict>
    ///     <key>GraphDocumentVersion</key><integer>6</integer>
    ///     <key>GraphicsList</key>
    ///     <array>
    ///         <dict>
    ///             <key>Class</key><string>ShapedGraphic</string>
    ///             <key>Shape</key><string>Diamond</string>
    ///             <key>Bounds</key><string>{{0, 0}, {10, 10}}</string>
    ///         </dict>
    ///     </array>
    /// </dict>
    /// </plist>"#;
    ///
    /// let conversion = Converter::default().convert(markup).unwrap();
    /// assert!(conversion.svg().contains("M 5,0 L 10,5 L 5,10 L 0,5 z"));
    /// assert!(conversion.diagnostics().is_empty());
    /// ```
    pub fn convert(&self, markup: &str) -> Result<Conversion, GraffleError> {
        let document = self.parse(markup)?;
        self.render(&document)
    }
}
