//! Configuration types for graffle conversions.
//!
//! All types implement [`serde::Deserialize`] with every field defaulted, so
//! a configuration file only needs to name the values it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining render and style settings.
//! - [`RenderConfig`] - Page selection, nesting limit and text line height.
//! - [`StyleConfig`] - Base fill/stroke and the font substitution table.
//!
//! # Example
//!
//! ```
//! # use graffle::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.render().page(), 0);
//! assert_eq!(config.style().substitute_font("Courier"), "Courier New");
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Render configuration section.
    #[serde(default)]
    render: RenderConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(render: RenderConfig, style: StyleConfig) -> Self {
        Self { render, style }
    }

    /// Returns the render configuration.
    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns a copy that renders the given page instead.
    pub fn with_page(mut self, page: usize) -> Self {
        self.render.page = page;
        self
    }
}

/// Controls what is rendered and how deep the walk may go.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Index into `Sheets` for multi-page documents.
    #[serde(default)]
    page: usize,

    /// Maximum graphics nesting depth before the conversion is aborted.
    #[serde(default = "default_max_depth")]
    max_depth: usize,

    /// Vertical distance between label lines, in user units.
    #[serde(default = "default_line_height")]
    line_height: f32,
}

impl RenderConfig {
    pub fn new(page: usize, max_depth: usize, line_height: f32) -> Self {
        Self {
            page,
            max_depth,
            line_height,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            page: 0,
            max_depth: default_max_depth(),
            line_height: default_line_height(),
        }
    }
}

/// Base style and font handling.
#[derive(Debug, Clone, Deserialize)]
pub struct StyleConfig {
    /// Fill of the base style scope.
    #[serde(default = "default_fill")]
    fill: String,

    /// Stroke of the base style scope.
    #[serde(default = "default_stroke")]
    stroke: String,

    /// Font family replacements applied to label fonts.
    #[serde(default = "default_font_substitutions")]
    font_substitutions: BTreeMap<String, String>,
}

impl StyleConfig {
    pub fn fill(&self) -> &str {
        &self.fill
    }

    pub fn stroke(&self) -> &str {
        &self.stroke
    }

    pub fn font_substitutions(&self) -> &BTreeMap<String, String> {
        &self.font_substitutions
    }

    /// Returns the replacement for `family`, or `family` itself when no
    /// substitution is configured.
    pub fn substitute_font<'a>(&'a self, family: &'a str) -> &'a str {
        self.font_substitutions
            .get(family)
            .map_or(family, String::as_str)
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            fill: default_fill(),
            stroke: default_stroke(),
            font_substitutions: default_font_substitutions(),
        }
    }
}

fn default_max_depth() -> usize {
    64
}

fn default_line_height() -> f32 {
    12.0
}

fn default_fill() -> String {
    "#fff".to_string()
}

fn default_stroke() -> String {
    "#000000".to_string()
}

fn default_font_substitutions() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("LucidaGrande".to_string(), "Luxi Sans".to_string()),
        ("Courier".to_string(), "Courier New".to_string()),
    ])
}
