//! Depth-first traversal of the graphics tree.
//!
//! Each graphic gets its own style scope for the duration of its visit, so
//! overrides apply to the graphic and everything nested inside it and
//! nothing else. Children of groups are stored front-to-back and are visited
//! in reverse so that later SVG elements paint over earlier ones.

use log::{debug, trace};

use graffle_core::geometry::Point;
use graffle_parser::{Value, rtf};

use super::{Renderer, shape, style};
use crate::{
    diagnostic::Diagnostic,
    error::GraffleError,
    graphic::{GraphicClass, GraphicNode, TextBlock},
};

impl Renderer<'_> {
    /// Visits `graphics` in stored order at nesting level `depth`.
    pub(super) fn walk(&mut self, graphics: &[Value], depth: usize) -> Result<(), GraffleError> {
        for value in graphics {
            self.visit_value(value, depth)?;
        }
        Ok(())
    }

    fn walk_reversed(&mut self, graphics: &[Value], depth: usize) -> Result<(), GraffleError> {
        for value in graphics.iter().rev() {
            self.visit_value(value, depth)?;
        }
        Ok(())
    }

    fn visit_value(&mut self, value: &Value, depth: usize) -> Result<(), GraffleError> {
        match GraphicNode::from_value(value) {
            Some(node) => self.visit(node, depth),
            None => {
                self.report(Diagnostic::unsupported(format!(
                    "graphics entry is a {}, expected a mapping",
                    value.kind_name()
                )));
                Ok(())
            }
        }
    }

    /// Visits one graphic inside its own style scope.
    ///
    /// # Errors
    ///
    /// Fails only when `depth` exceeds the configured maximum. Per-graphic
    /// problems are reported as diagnostics.
    pub(super) fn visit(
        &mut self,
        node: GraphicNode<'_>,
        depth: usize,
    ) -> Result<(), GraffleError> {
        let max_depth = self.config.render().max_depth();
        if depth > max_depth {
            return Err(GraffleError::RecursionLimitExceeded { depth: max_depth });
        }

        trace!(graphic:% = node, depth; "Visiting graphic");
        self.cascade.push_scope();
        debug_assert_eq!(self.cascade.depth(), depth + 1);

        let result = self.visit_scoped(node, depth);

        self.cascade.pop_scope();
        result
    }

    fn visit_scoped(&mut self, node: GraphicNode<'_>, depth: usize) -> Result<(), GraffleError> {
        if let Some(overrides) = node.style() {
            style::apply_style(&mut self.cascade, &mut self.registry, overrides);
        }

        match node.class() {
            Ok(GraphicClass::SolidGraphic | GraphicClass::ShapedGraphic) => self.draw_shape(node),
            Ok(GraphicClass::LineGraphic) => self.draw_line(node),
            Ok(GraphicClass::TableGroup | GraphicClass::Group) => self.draw_group(node, depth)?,
            Err(err) => self.report(err.to_diagnostic(&node)),
        }

        if let Some(text) = node.text() {
            self.draw_label(node, text);
        }
        Ok(())
    }

    fn draw_shape(&mut self, node: GraphicNode<'_>) {
        match shape::build(&node, self.images) {
            Ok(primitives) => {
                let style = self.cascade.to_style_string();
                for primitive in &primitives {
                    self.emitter.draw(primitive, &style);
                }
            }
            Err(err) => self.report(err.to_diagnostic(&node)),
        }
    }

    fn draw_line(&mut self, node: GraphicNode<'_>) {
        self.cascade.set("fill", "none");

        if let Some(position) = node.orthogonal_bar_position() {
            debug!(
                graphic:% = node,
                position;
                "Orthogonal routing is not supported, drawing straight segments"
            );
        }

        match shape::line(&node) {
            Ok(path) => {
                let style = self.cascade.to_style_string();
                self.emitter.draw(&path, &style);
            }
            Err(err) => self.report(err.to_diagnostic(&node)),
        }
    }

    fn draw_group(&mut self, node: GraphicNode<'_>, depth: usize) -> Result<(), GraffleError> {
        let Some(children) = node.children() else {
            trace!(graphic:% = node; "Group without graphics");
            return Ok(());
        };

        self.emitter.open_group(&self.cascade.to_style_string());
        let result = self.walk_reversed(children, depth + 1);
        self.emitter.close_group();
        result
    }

    fn draw_label(&mut self, node: GraphicNode<'_>, text: TextBlock<'_>) {
        let bounds = match node.bounds() {
            Ok(bounds) => bounds,
            Err(err) => {
                self.report(Diagnostic::shape_failure(format!("{node} label: {err}")));
                return;
            }
        };

        let runs = match rtf::extract_runs(text.content()) {
            Ok(runs) => runs,
            Err(err) => {
                self.report(Diagnostic::shape_failure(format!("{node} label: {err}")));
                return;
            }
        };

        let mut style = self.cascade.to_style_string();
        if let Some(font) = style::resolve_font(node.font_info(), self.config.style()) {
            style.push(';');
            style.push_str(&font);
        }

        let position = Point::new(bounds.x() + text.pad(), bounds.y() + text.vertical_pad());
        self.emitter
            .text(position, &style, runs, self.config.render().line_height());
    }
}

#[cfg(test)]
mod tests {
    use graffle_parser::Dict;

    use super::*;
    use crate::config::{AppConfig, RenderConfig, StyleConfig};

    fn dict(entries: Vec<(&str, Value)>) -> Dict {
        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    }

    fn shaped(id: i64) -> Value {
        Value::Dict(dict(vec![
            ("Class", Value::from("ShapedGraphic")),
            ("ID", Value::Integer(id)),
            ("Bounds", Value::from("{{0, 0}, {10, 10}}")),
        ]))
    }

    fn group(children: Vec<Value>) -> Value {
        Value::Dict(dict(vec![
            ("Class", Value::from("Group")),
            ("Graphics", Value::Array(children)),
        ]))
    }

    #[test]
    fn test_walk_restores_cascade() {
        let config = AppConfig::default();
        let mut renderer = Renderer::new(&config, &[]);
        let graphics = vec![group(vec![shaped(1), group(vec![shaped(2)])]), shaped(3)];

        renderer.walk(&graphics, 1).unwrap();
        assert_eq!(renderer.cascade.depth(), 1);
        assert_eq!(renderer.emitter.depth(), 0);
        assert!(renderer.diagnostics.is_empty());
    }

    #[test]
    fn test_walk_reports_unknown_class_and_continues() {
        let config = AppConfig::default();
        let mut renderer = Renderer::new(&config, &[]);
        let unknown = Value::Dict(dict(vec![("Class", Value::from("MagnetGraphic"))]));
        let graphics = vec![unknown, Value::Integer(3), shaped(1)];

        renderer.walk(&graphics, 1).unwrap();
        assert_eq!(renderer.diagnostics.len(), 2);
        assert!(
            renderer
                .diagnostics
                .iter()
                .all(|d| d.kind() == crate::diagnostic::DiagnosticKind::UnsupportedFeature)
        );
        assert_eq!(renderer.cascade.depth(), 1);
    }

    #[test]
    fn test_walk_recursion_limit() {
        let config = AppConfig::new(RenderConfig::new(0, 2, 12.0), StyleConfig::default());
        let mut renderer = Renderer::new(&config, &[]);
        let graphics = vec![group(vec![group(vec![shaped(1)])])];

        let err = renderer.walk(&graphics, 1).unwrap_err();
        assert!(matches!(err, GraffleError::RecursionLimitExceeded { depth: 2 }));
        assert_eq!(renderer.cascade.depth(), 1);
    }

    #[test]
    fn test_label_without_bounds() {
        let config = AppConfig::default();
        let mut renderer = Renderer::new(&config, &[]);
        let graphics = vec![Value::Dict(dict(vec![
            ("Class", Value::from("Group")),
            ("Text", Value::Dict(dict(vec![("Text", Value::from("label"))]))),
        ]))];

        renderer.walk(&graphics, 1).unwrap();
        assert_eq!(renderer.diagnostics.len(), 1);
        assert!(renderer.diagnostics[0].message().contains("label"));
    }
}
