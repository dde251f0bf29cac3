//! Decoders for the raw pieces of an OmniGraffle document.
//!
//! An OmniGraffle file is an Apple property list serialized as XML. Inside it,
//! geometry is stored as Cocoa coordinate strings (`{{x, y}, {w, h}}`) and
//! labels as RTF. This crate turns each of those into typed Rust values:
//!
//! - [`decode`] - property-list XML to a [`Value`] tree
//! - [`coords`] - coordinate strings to numbers
//! - [`rtf`] - RTF label text to styled [`rtf::TextRun`]s
//!
//! # Example
//!
//! ```
//! let markup = r#"<?xml version="1.0" encoding="UTF-8"?>
//! <plist version="1.0">
//! <dict>
//!     <key>GraphDocumentVersion</key>
//!     <integer>6</integer>
//! </dict>
//! </plist>"#;
//!
//! let value = graffle_parser::decode(markup).expect("valid plist");
//! assert_eq!(value.get("GraphDocumentVersion").and_then(|v| v.as_i64()), Some(6));
//! ```

pub mod coords;
pub mod error;
pub mod rtf;

mod plist;
mod value;

pub use error::ParseError;
pub use plist::decode;
pub use value::{Dict, Value};
