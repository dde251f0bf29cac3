//! Shared marker and filter definitions.
//!
//! Styles reference arrowheads and the drop shadow by `url(#id)`. The
//! [`DefinitionRegistry`] records which ones were referenced during the walk
//! and materializes each of them once, in a fixed order, when the document
//! is finished.

use std::collections::BTreeSet;

use log::debug;
use svg::node::element::{
    Circle, Definitions, Filter, FilterEffectGaussianBlur, FilterEffectMerge,
    FilterEffectMergeNode, FilterEffectOffset, Marker, Path,
};

/// Stroke style of the filled arrowheads.
const ARROW_STYLE: &str = "fill-rule:evenodd;stroke:#000000;stroke-width:1.0px;marker-start:none";

/// Stroke style of the open crow's-foot and bar markers.
const OPEN_MARKER_STYLE: &str = "stroke:#000;stroke-width:1.0px;marker-start:none;fill:none;";

/// A shared definition. Variants are declared in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Definition {
    /// Filled arrowhead at the end of a line.
    ForwardArrow,
    /// Filled arrowhead at the start of a line.
    BackwardArrow,
    DropShadow,
    /// Crow's foot with a ball.
    CrowBall,
    Bar,
}

impl Definition {
    /// The element id referenced from styles.
    pub fn id(self) -> &'static str {
        match self {
            Definition::ForwardArrow => "Arrow1Lend",
            Definition::BackwardArrow => "Arrow1Lstart",
            Definition::DropShadow => "DropShadow",
            Definition::CrowBall => "mCrowBall",
            Definition::Bar => "mBar",
        }
    }

    /// `url(#id)`, for use as a style value.
    pub fn url(self) -> String {
        format!("url(#{})", self.id())
    }

    fn add_to(self, defs: Definitions) -> Definitions {
        match self {
            Definition::ForwardArrow => {
                defs.add(arrow_marker(self.id(), "M -10,0.0 L -10.0,-2.0 L 0.0,0.0 L -10.0,2.0 z"))
            }
            Definition::BackwardArrow => {
                defs.add(arrow_marker(self.id(), "M 10,0.0 L 10.0,-2.0 L 0.0,0.0 L 10.0,2.0 z"))
            }
            Definition::DropShadow => defs.add(drop_shadow(self.id())),
            Definition::CrowBall => defs.add(
                open_marker(self.id(), "M 0.0,2.5 L 7.5,0.0 L 0.0,-2.5").add(
                    Circle::new()
                        .set("cx", 10)
                        .set("cy", 0)
                        .set("r", 2.5)
                        .set("style", "stroke-width:1px;stroke:#000;fill:none;"),
                ),
            ),
            Definition::Bar => defs.add(open_marker(self.id(), "M -7.5,-2.5 L -7.5,2.5")),
        }
    }
}

fn arrow_marker(id: &str, data: &str) -> Marker {
    Marker::new()
        .set("id", id)
        .set("orient", "auto")
        .set("refX", 0)
        .set("refY", 0)
        .set("style", "overflow:visible")
        .add(Path::new().set("d", data).set("style", ARROW_STYLE))
}

fn open_marker(id: &str, data: &str) -> Marker {
    Marker::new()
        .set("id", id)
        .set("orient", "auto")
        .set("refX", 0)
        .set("refY", 0)
        .set("style", "overflow:visible")
        .add(Path::new().set("d", data).set("style", OPEN_MARKER_STYLE))
}

fn drop_shadow(id: &str) -> Filter {
    Filter::new()
        .set("id", id)
        .set("filterRes", 100)
        .set("x", 0)
        .set("y", 0)
        .add(
            FilterEffectGaussianBlur::new()
                .set("stdDeviation", 3)
                .set("result", "MyBlur"),
        )
        .add(
            FilterEffectOffset::new()
                .set("in", "MyBlur")
                .set("dx", 2)
                .set("dy", 4)
                .set("result", "movedBlur"),
        )
        .add(
            FilterEffectMerge::new()
                .add(FilterEffectMergeNode::new().set("in", "movedBlur"))
                .add(FilterEffectMergeNode::new().set("in", "SourceGraphic")),
        )
}

/// The set of definitions referenced so far.
#[derive(Debug, Default)]
pub struct DefinitionRegistry {
    required: BTreeSet<Definition>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a reference. Registering the same definition again has no
    /// further effect.
    pub fn register(&mut self, definition: Definition) {
        if self.required.insert(definition) {
            debug!(id = definition.id(); "Definition required");
        }
    }

    pub fn contains(&self, definition: Definition) -> bool {
        self.required.contains(&definition)
    }

    pub fn len(&self) -> usize {
        self.required.len()
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
    }

    /// Builds the `defs` section with one block per registered definition.
    pub fn materialize(&self) -> Definitions {
        self.required
            .iter()
            .fold(Definitions::new(), |defs, definition| definition.add_to(defs))
    }
}
