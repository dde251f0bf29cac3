//! Typed view over one graphic of the scene graph.
//!
//! Graphics are stored as plain property-list mappings. [`GraphicNode`]
//! borrows one mapping and exposes the keys the renderer reads, decoding
//! coordinate strings and flags on access. It never copies or mutates the
//! underlying tree.

use std::{fmt, str::FromStr};

use thiserror::Error;

use graffle_core::geometry::{Bounds, Point};
use graffle_parser::{Dict, Value, coords};

use crate::diagnostic::Diagnostic;

/// The `Class` tag of a graphic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphicClass {
    SolidGraphic,
    ShapedGraphic,
    LineGraphic,
    TableGroup,
    Group,
}

impl FromStr for GraphicClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SolidGraphic" => Ok(Self::SolidGraphic),
            "ShapedGraphic" => Ok(Self::ShapedGraphic),
            "LineGraphic" => Ok(Self::LineGraphic),
            "TableGroup" => Ok(Self::TableGroup),
            "Group" => Ok(Self::Group),
            _ => Err(format!("unknown graphic class `{s}`")),
        }
    }
}

/// The `Shape` tag of a shaped graphic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    RoundRect,
    Circle,
    Bezier,
    AdjustableArrow,
    Diamond,
    Subprocess,
    Cloud,
    HorizontalTriangle,
    RightTriangle,
    VerticalTriangle,
}

impl FromStr for ShapeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Rectangle" => Ok(Self::Rectangle),
            "RoundRect" => Ok(Self::RoundRect),
            "Circle" => Ok(Self::Circle),
            "Bezier" => Ok(Self::Bezier),
            "AdjustableArrow" => Ok(Self::AdjustableArrow),
            "Diamond" => Ok(Self::Diamond),
            "Subprocess" => Ok(Self::Subprocess),
            "Cloud" => Ok(Self::Cloud),
            "HorizontalTriangle" => Ok(Self::HorizontalTriangle),
            "RightTriangle" => Ok(Self::RightTriangle),
            "VerticalTriangle" => Ok(Self::VerticalTriangle),
            _ => Err(format!("unknown shape `{s}`")),
        }
    }
}

/// Why a graphic could not be read or drawn.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphicError {
    #[error("missing `{0}`")]
    Missing(&'static str),

    #[error("invalid `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("{0}")]
    Unsupported(String),
}

impl GraphicError {
    fn invalid(key: &'static str, reason: impl fmt::Display) -> Self {
        Self::Invalid {
            key,
            reason: reason.to_string(),
        }
    }

    /// Converts the error into a diagnostic about `node`.
    pub fn to_diagnostic(&self, node: &GraphicNode<'_>) -> Diagnostic {
        let message = format!("{node}: {self}");
        match self {
            GraphicError::Unsupported(_) => Diagnostic::unsupported(message),
            GraphicError::Missing(_) | GraphicError::Invalid { .. } => {
                Diagnostic::shape_failure(message)
            }
        }
    }
}

/// The `Text` block of a graphic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBlock<'a> {
    content: &'a str,
    pad: f32,
    vertical_pad: f32,
}

impl<'a> TextBlock<'a> {
    /// The label text, usually RTF.
    pub fn content(&self) -> &'a str {
        self.content
    }

    pub fn pad(&self) -> f32 {
        self.pad
    }

    pub fn vertical_pad(&self) -> f32 {
        self.vertical_pad
    }
}

/// Parameters from `ShapeData`.
#[derive(Debug, Clone, Copy)]
pub struct ShapeData<'a> {
    dict: &'a Dict,
}

impl<'a> ShapeData<'a> {
    /// Shaft thickness of an adjustable arrow, as a fraction of its height.
    pub fn ratio(&self) -> Result<f32, GraphicError> {
        self.number("ratio")
    }

    /// Head length of an adjustable arrow.
    pub fn width(&self) -> Result<f32, GraphicError> {
        self.number("width")
    }

    /// Bezier outline points in unit space, `(-1, -1)` to `(1, 1)` across the
    /// bounds.
    pub fn unit_points(&self) -> Result<Vec<Point>, GraphicError> {
        let items = self
            .dict
            .get("UnitPoints")
            .ok_or(GraphicError::Missing("ShapeData.UnitPoints"))?
            .as_array()
            .ok_or_else(|| GraphicError::invalid("ShapeData.UnitPoints", "expected an array"))?;
        point_list("ShapeData.UnitPoints", items)
    }

    fn number(&self, key: &'static str) -> Result<f32, GraphicError> {
        let value = self.dict.get(key).ok_or(GraphicError::Missing(key))?;
        value.as_f32().ok_or_else(|| {
            GraphicError::invalid(
                key,
                format!("expected a number, found a {}", value.kind_name()),
            )
        })
    }
}

/// A borrowed view over one graphic mapping.
#[derive(Debug, Clone, Copy)]
pub struct GraphicNode<'a> {
    dict: &'a Dict,
}

impl<'a> GraphicNode<'a> {
    pub fn new(dict: &'a Dict) -> Self {
        Self { dict }
    }

    /// Returns a view when `value` is a mapping.
    pub fn from_value(value: &'a Value) -> Option<Self> {
        value.as_dict().map(Self::new)
    }

    /// The raw `Class` string.
    pub fn class_name(&self) -> Option<&'a str> {
        self.dict.get("Class").and_then(Value::as_str)
    }

    pub fn class(&self) -> Result<GraphicClass, GraphicError> {
        let name = self.class_name().ok_or(GraphicError::Missing("Class"))?;
        name.parse().map_err(GraphicError::Unsupported)
    }

    /// The `Shape` tag. A shaped graphic without one is a rectangle.
    pub fn shape(&self) -> Result<ShapeKind, GraphicError> {
        match self.dict.get("Shape").and_then(Value::as_str) {
            Some(name) => name.parse().map_err(GraphicError::Unsupported),
            None => Ok(ShapeKind::Rectangle),
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.dict.get("ID").and_then(Value::as_i64)
    }

    pub fn bounds(&self) -> Result<Bounds, GraphicError> {
        let text = self
            .dict
            .get("Bounds")
            .ok_or(GraphicError::Missing("Bounds"))?
            .as_str()
            .ok_or_else(|| GraphicError::invalid("Bounds", "expected a string"))?;
        let [x, y, width, height] =
            coords::parse_rect(text).map_err(|err| GraphicError::invalid("Bounds", err))?;
        Ok(Bounds::new(x, y, width, height))
    }

    /// Line vertices from `Points`.
    pub fn points(&self) -> Result<Vec<Point>, GraphicError> {
        let items = self
            .dict
            .get("Points")
            .ok_or(GraphicError::Missing("Points"))?
            .as_array()
            .ok_or_else(|| GraphicError::invalid("Points", "expected an array"))?;
        point_list("Points", items)
    }

    pub fn style(&self) -> Option<&'a Dict> {
        self.dict.get("Style").and_then(Value::as_dict)
    }

    /// `Style.stroke.CornerRadius`.
    pub fn corner_radius(&self) -> Option<f32> {
        self.style()?
            .get("stroke")?
            .get("CornerRadius")?
            .as_f32()
    }

    pub fn text(&self) -> Option<TextBlock<'a>> {
        let text = self.dict.get("Text")?.as_dict()?;
        let number = |key: &str| text.get(key).and_then(Value::as_f32).unwrap_or(0.0);
        Some(TextBlock {
            content: text.get("Text").and_then(Value::as_str).unwrap_or_default(),
            pad: number("Pad"),
            vertical_pad: number("VerticalPad"),
        })
    }

    pub fn font_info(&self) -> Option<&'a Dict> {
        self.dict.get("FontInfo").and_then(Value::as_dict)
    }

    /// Child graphics of a group, in stored order.
    pub fn children(&self) -> Option<&'a [Value]> {
        self.dict.get("Graphics").and_then(Value::as_array)
    }

    /// Index into the document's image list.
    pub fn image_id(&self) -> Result<Option<usize>, GraphicError> {
        let Some(value) = self.dict.get("ImageID") else {
            return Ok(None);
        };
        value
            .as_i64()
            .and_then(|id| usize::try_from(id).ok())
            .map(Some)
            .ok_or_else(|| GraphicError::invalid("ImageID", "expected a non-negative integer"))
    }

    pub fn h_flip(&self) -> bool {
        self.flag("HFlip")
    }

    pub fn v_flip(&self) -> bool {
        self.flag("VFlip")
    }

    /// Clockwise rotation in degrees.
    pub fn rotation(&self) -> Option<f32> {
        self.dict.get("Rotation").and_then(Value::as_f32)
    }

    pub fn shape_data(&self) -> Result<ShapeData<'a>, GraphicError> {
        self.dict
            .get("ShapeData")
            .ok_or(GraphicError::Missing("ShapeData"))?
            .as_dict()
            .map(|dict| ShapeData { dict })
            .ok_or_else(|| GraphicError::invalid("ShapeData", "expected a mapping"))
    }

    /// The manual orthogonal bar position of a line, when automatic routing
    /// is switched off.
    pub fn orthogonal_bar_position(&self) -> Option<f32> {
        if self.dict.get("OrthogonalBarAutomatic").and_then(Value::as_bool) != Some(false) {
            return None;
        }
        self.dict.get("OrthogonalBarPosition").and_then(Value::as_f32)
    }

    fn flag(&self, key: &str) -> bool {
        match self.dict.get(key) {
            Some(Value::String(s)) => s == "YES",
            Some(Value::Bool(b)) => *b,
            _ => false,
        }
    }
}

impl fmt::Display for GraphicNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class_name().unwrap_or("graphic"))?;
        if let Some(id) = self.id() {
            write!(f, " {id}")?;
        }
        Ok(())
    }
}

fn point_list(key: &'static str, items: &[Value]) -> Result<Vec<Point>, GraphicError> {
    items
        .iter()
        .map(|item| {
            let text = item
                .as_str()
                .ok_or_else(|| GraphicError::invalid(key, "expected point strings"))?;
            let (x, y) = coords::parse_point(text).map_err(|err| GraphicError::invalid(key, err))?;
            Ok(Point::new(x, y))
        })
        .collect()
}
