//! Rendering of a [`Document`] page to SVG.
//!
//! # Overview
//!
//! - `walker` - Depth-first traversal of the graphics tree
//! - [`style`] - Style overrides, colors and fonts
//! - [`shape`] - Geometry for each shape kind
//! - [`defs`] - Shared marker and filter definitions
//! - [`emitter`] - SVG output tree construction
//!
//! All mutable state of one conversion lives in a single `Renderer` that is
//! threaded through the walk by `&mut`.

pub mod defs;
pub mod emitter;
pub mod shape;
pub mod style;

mod walker;

use log::{debug, info, warn};

use graffle_core::{geometry::Bounds, style::StyleCascade};

use crate::{
    config::AppConfig,
    diagnostic::Diagnostic,
    document::{Background, Document},
    error::GraffleError,
    graphic::GraphicNode,
};

use defs::DefinitionRegistry;
use emitter::Emitter;
use shape::Primitive;

/// The SVG produced for one page, with the diagnostics found on the way.
#[derive(Debug, Clone)]
pub struct Conversion {
    svg: String,
    diagnostics: Vec<Diagnostic>,
}

impl Conversion {
    /// The serialized SVG document.
    pub fn svg(&self) -> &str {
        &self.svg
    }

    /// Non-fatal problems, in walk order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Splits the conversion into its SVG text and diagnostics.
    pub fn into_parts(self) -> (String, Vec<Diagnostic>) {
        (self.svg, self.diagnostics)
    }
}

struct Renderer<'a> {
    config: &'a AppConfig,
    images: &'a [String],
    cascade: StyleCascade,
    registry: DefinitionRegistry,
    emitter: Emitter,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Renderer<'a> {
    fn new(config: &'a AppConfig, images: &'a [String]) -> Self {
        let cascade = StyleCascade::new(config.style().fill(), config.style().stroke());
        let emitter = Emitter::new(&cascade.to_style_string());
        Self {
            config,
            images,
            cascade,
            registry: DefinitionRegistry::new(),
            emitter,
            diagnostics: Vec::new(),
        }
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        warn!(kind:% = diagnostic.kind(), message = diagnostic.message(); "Rendering diagnostic");
        self.diagnostics.push(diagnostic);
    }

    fn draw_background(&mut self, background: Background<'_>) -> Result<(), GraffleError> {
        match background {
            Background::Graphic(graphic) => {
                debug!("Drawing background graphic");
                self.visit(GraphicNode::new(graphic), 1)
            }
            Background::Canvas { origin, size } => {
                debug!(origin:?, size:?; "Drawing legacy canvas background");
                let (width, height) = size;
                let rect = Primitive::Rect {
                    bounds: Bounds::new(origin.x(), origin.y(), width, height),
                    corner_radius: None,
                    rotation: None,
                };
                self.emitter.draw(&rect, &self.cascade.to_style_string());
                Ok(())
            }
            Background::None => {
                debug!("Page has no background");
                Ok(())
            }
        }
    }

    fn finish(self) -> Conversion {
        let defs = self.registry.materialize();
        Conversion {
            svg: self.emitter.finish(defs),
            diagnostics: self.diagnostics,
        }
    }
}

/// Renders the selected page of `document`.
///
/// # Errors
///
/// Returns [`GraffleError::RecursionLimitExceeded`] when groups nest deeper
/// than the configured maximum.
pub fn render_document(
    document: &Document,
    config: &AppConfig,
) -> Result<Conversion, GraffleError> {
    info!(
        page = document.page_index(),
        graphics = document.graphics().len();
        "Rendering page"
    );

    let mut renderer = Renderer::new(config, document.images());
    renderer.draw_background(document.background())?;
    renderer.walk(document.graphics(), 1)?;

    debug_assert_eq!(renderer.cascade.depth(), 1);
    debug_assert_eq!(renderer.emitter.depth(), 0);

    let conversion = renderer.finish();
    info!(diagnostics = conversion.diagnostics().len(); "Page rendered");
    Ok(conversion)
}
