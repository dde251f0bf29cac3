//! Command-line argument definitions for graffle2svg.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, page selection,
//! configuration file selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the OmniGraffle to SVG converter
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input OmniGraffle document
    #[arg(help = "Path to the input .graffle file (uncompressed XML)")]
    pub input: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Zero-based sheet to convert in multi-page documents; overrides
    /// `render.page` from the configuration
    #[arg(short, long)]
    pub page: Option<usize>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
