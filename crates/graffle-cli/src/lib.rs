//! CLI logic for graffle2svg.
//!
//! Reads an OmniGraffle document, converts the selected page with
//! [`graffle::Converter`] and writes the SVG next to it.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;
pub use config::ConfigError;

use std::{fs, io};

use log::{info, warn};
use thiserror::Error;

use graffle::{Converter, GraffleError};

/// Errors that stop the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Graffle(#[from] GraffleError),
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Graffle(GraffleError::Io(err))
    }
}

/// Run the graffle2svg CLI application
///
/// This function converts the input document and writes the resulting SVG
/// to the output file. Per-graphic problems do not fail the run; they are
/// logged as warnings and the SVG is still written.
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Markup that is not a property list
/// - Documents whose page cannot be selected
/// - Graphics nested deeper than the configured limit
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Converting document"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(page) = args.page {
        app_config = app_config.with_page(page);
    }

    let markup = fs::read_to_string(&args.input)?;

    let converter = Converter::new(app_config);
    let document = converter.parse(&markup)?;
    let (svg, diagnostics) = converter.render(&document)?.into_parts();

    if !diagnostics.is_empty() {
        warn!(
            diagnostics = diagnostics.len();
            "Some graphics were skipped or drawn incompletely"
        );
    }

    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}
