//! Style overrides and font descriptors.
//!
//! OmniGraffle's `Style` mapping is translated into SVG style properties on
//! the innermost cascade scope. Arrowheads and shadows also register the
//! shared definitions they reference. `FontInfo` is resolved separately into
//! a style fragment for labels; fonts never enter the cascade.

use log::{debug, trace};

use graffle_core::{color::Color, style::StyleCascade};
use graffle_parser::{Dict, Value};

use super::defs::{Definition, DefinitionRegistry};
use crate::config::StyleConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineEnd {
    Head,
    Tail,
}

impl LineEnd {
    fn property(self) -> &'static str {
        match self {
            LineEnd::Head => "marker-end",
            LineEnd::Tail => "marker-start",
        }
    }
}

/// Applies a graphic's `Style` mapping to the innermost scope of `cascade`.
pub fn apply_style(cascade: &mut StyleCascade, registry: &mut DefinitionRegistry, style: &Dict) {
    if let Some(fill) = style.get("fill").and_then(Value::as_dict) {
        if !draws(fill) {
            cascade.set("fill", "none");
        } else if let Some(color) = fill.get("Color") {
            match parse_color(color) {
                Some(color) => cascade.set("fill", color.to_string()),
                None => debug!(kind = color.kind_name(); "Ignoring unreadable fill color"),
            }
        }
    }

    if let Some(stroke) = style.get("stroke").and_then(Value::as_dict) {
        apply_stroke(cascade, registry, stroke);
    }

    if style
        .get("shadow")
        .and_then(Value::as_dict)
        .is_some_and(draws)
    {
        registry.register(Definition::DropShadow);
        cascade.set("filter", Definition::DropShadow.url());
    }
}

fn apply_stroke(cascade: &mut StyleCascade, registry: &mut DefinitionRegistry, stroke: &Dict) {
    if draws(stroke) {
        let color = stroke
            .get("Color")
            .and_then(parse_color)
            .unwrap_or_else(Color::black);
        cascade.set("stroke", color.to_string());
    } else {
        cascade.set("stroke", "none");
    }

    if let Some(head) = stroke.get("HeadArrow") {
        apply_arrow(cascade, registry, LineEnd::Head, head);
    }
    if let Some(tail) = stroke.get("TailArrow") {
        apply_arrow(cascade, registry, LineEnd::Tail, tail);
    }

    if let Some(width) = stroke.get("Width").and_then(Value::as_f64) {
        cascade.set("stroke-width", format!("{width:.6}px"));
    }

    match stroke.get("Pattern").and_then(Value::as_i64) {
        Some(1) => cascade.set("stroke-dasharray", "3 3"),
        Some(2) => cascade.set("stroke-dasharray", "5 5"),
        _ => {}
    }
}

fn apply_arrow(
    cascade: &mut StyleCascade,
    registry: &mut DefinitionRegistry,
    end: LineEnd,
    value: &Value,
) {
    let name = match value {
        Value::String(name) => name.as_str(),
        Value::Integer(0) => "0",
        _ => return,
    };

    let definition = match (name, end) {
        ("FilledArrow", LineEnd::Head) => Definition::ForwardArrow,
        ("FilledArrow", LineEnd::Tail) => Definition::BackwardArrow,
        ("Bar", _) => Definition::Bar,
        ("CrowBall", _) => Definition::CrowBall,
        ("0", _) => {
            cascade.set(end.property(), "none");
            return;
        }
        _ => {
            trace!(arrow = name, end:?; "Ignoring unsupported arrowhead");
            return;
        }
    };

    registry.register(definition);
    cascade.set(end.property(), definition.url());
}

/// Whether a fill, stroke or shadow mapping is drawn. Only an explicit
/// `Draws = NO` turns it off.
fn draws(dict: &Dict) -> bool {
    match dict.get("Draws") {
        Some(Value::String(draws)) => draws != "NO",
        Some(Value::Bool(draws)) => *draws,
        _ => true,
    }
}

/// Decodes a color mapping with `r`, `g`, `b` channels, or a grayscale `w`
/// channel when none of those is present. Missing channels count as zero.
///
/// Returns `None` when `value` is not a mapping.
pub fn parse_color(value: &Value) -> Option<Color> {
    let dict = value.as_dict()?;
    let channel = |key: &str| dict.get(key).and_then(Value::as_f32);

    let (r, g, b) = (channel("r"), channel("g"), channel("b"));
    if r.is_none() && g.is_none() && b.is_none() {
        if let Some(white) = channel("w") {
            return Some(Color::gray(white));
        }
    }

    Some(Color::new(
        r.unwrap_or(0.0),
        g.unwrap_or(0.0),
        b.unwrap_or(0.0),
    ))
}

/// Resolves a `FontInfo` mapping into a label style fragment, e.g.
/// `fill:#ff0000;font-family:Luxi Sans;font-size:12px`.
///
/// Returns `None` when the graphic has no font.
pub fn resolve_font(font: Option<&Dict>, style: &StyleConfig) -> Option<String> {
    let font = font?;
    let mut parts = Vec::new();

    if let Some(color) = font.get("Color") {
        let hex = parse_color(color).unwrap_or_else(Color::black).to_hex();
        parts.push(format!("fill:#{hex}"));
    }

    if let Some(family) = font.get("Font").and_then(Value::as_str) {
        parts.push(format!("font-family:{}", style.substitute_font(family)));
    }

    if let Some(size) = font.get("Size").and_then(Value::as_f64) {
        parts.push(format!("font-size:{}px", size.trunc() as i64));
    }

    Some(parts.join(";"))
}
