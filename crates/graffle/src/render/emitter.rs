//! SVG output tree construction.
//!
//! The [`Emitter`] owns the root layer and a stack of open `g` containers.
//! Every primitive is appended to the innermost open container, or to the
//! root layer when none is open.

use log::{trace, warn};
use svg::{
    Document, Node as _,
    node::{Text as SvgText, element as svg_element},
};

use graffle_core::geometry::{Bounds, Point};
use graffle_parser::rtf::TextRun;

use super::shape::Primitive;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

#[derive(Debug)]
pub struct Emitter {
    root: svg_element::Group,
    open: Vec<svg_element::Group>,
}

impl Emitter {
    /// Creates an emitter whose root layer carries `style`.
    pub fn new(style: &str) -> Self {
        Self {
            root: svg_element::Group::new().set("style", style),
            open: Vec::new(),
        }
    }

    /// Number of open containers below the root layer.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    fn append<T>(&mut self, node: T)
    where
        T: Into<Box<dyn svg::Node>>,
    {
        match self.open.last_mut() {
            Some(group) => group.append(node),
            None => self.root.append(node),
        }
    }

    /// Opens a nested container. Subsequent elements go inside it until
    /// [`Emitter::close_group`].
    pub fn open_group(&mut self, style: &str) {
        self.open.push(svg_element::Group::new().set("style", style));
    }

    /// Closes the innermost container and appends it to its parent.
    pub fn close_group(&mut self) {
        match self.open.pop() {
            Some(group) => self.append(group),
            None => warn!("Attempted to close the root layer"),
        }
    }

    /// Appends one primitive with the given style.
    pub fn draw(&mut self, primitive: &Primitive, style: &str) {
        trace!(primitive:?; "Drawing primitive");
        match primitive {
            Primitive::Rect {
                bounds,
                corner_radius,
                rotation,
            } => {
                let mut rect = svg_element::Rectangle::new()
                    .set("x", bounds.x())
                    .set("y", bounds.y())
                    .set("width", bounds.width())
                    .set("height", bounds.height());
                if let Some(radius) = corner_radius {
                    rect = rect.set("rx", *radius).set("ry", *radius);
                }
                if let Some(degrees) = rotation {
                    rect = rect.set("transform", rotate(*degrees, bounds.center()));
                }
                self.append(rect.set("style", style));
            }
            Primitive::Ellipse {
                center,
                rx,
                ry,
                rotation,
            } => {
                let mut ellipse = svg_element::Ellipse::new()
                    .set("cx", center.x())
                    .set("cy", center.y())
                    .set("rx", *rx)
                    .set("ry", *ry);
                if let Some(degrees) = rotation {
                    ellipse = ellipse.set("transform", rotate(*degrees, *center));
                }
                self.append(ellipse.set("style", style));
            }
            Primitive::Path { data } => {
                let path = svg_element::Path::new()
                    .set("d", data.as_str())
                    .set("style", style);
                self.append(path);
            }
            Primitive::Image {
                bounds,
                href,
                rotation,
            } => {
                let mut image = image_element(*bounds, href);
                if let Some(degrees) = rotation {
                    image = image.set("transform", rotate(*degrees, bounds.center()));
                }
                self.append(image.set("style", style));
            }
        }
    }

    /// Appends a text element with one `tspan` per run.
    ///
    /// Line `i` is placed at `position.y + line_height * (i + 1)`.
    pub fn text<I>(&mut self, position: Point, style: &str, runs: I, line_height: f32)
    where
        I: IntoIterator<Item = TextRun>,
    {
        let mut text = svg_element::Text::new("")
            .set("x", position.x())
            .set("y", position.y())
            .set("style", style);

        for (index, run) in runs.into_iter().enumerate() {
            let offset = line_height * (index + 1) as f32;
            let mut tspan = svg_element::TSpan::new("")
                .set("x", position.x())
                .set("y", position.y() + offset);
            if !run.style().is_empty() {
                tspan = tspan.set("style", run.style());
            }
            text = text.add(tspan.add(SvgText::new(run.text())));
        }

        self.append(text);
    }

    /// Closes any open containers and serializes the document with `defs`
    /// ahead of the root layer.
    pub fn finish(mut self, defs: svg_element::Definitions) -> String {
        while !self.open.is_empty() {
            self.close_group();
        }

        Document::new()
            .set("xmlns", SVG_NAMESPACE)
            .set("xmlns:xlink", XLINK_NAMESPACE)
            .add(defs)
            .add(self.root)
            .to_string()
    }
}

fn image_element(bounds: Bounds, href: &str) -> svg_element::Image {
    svg_element::Image::new()
        .set("x", bounds.x())
        .set("y", bounds.y())
        .set("width", bounds.width())
        .set("height", bounds.height())
        .set("xlink:href", href)
}

fn rotate(degrees: f32, center: Point) -> String {
    format!("rotate({degrees} {} {})", center.x(), center.y())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(markup: &str) -> roxmltree::Document<'_> {
        roxmltree::Document::parse(markup).unwrap()
    }

    #[test]
    fn test_finish_empty_document() {
        let emitter = Emitter::new("fill:#fff;stroke:#000000");
        let markup = emitter.finish(svg_element::Definitions::new());
        let document = parse(&markup);

        let root = document.root_element();
        assert_eq!(root.tag_name().name(), "svg");
        let children: Vec<&str> = root
            .children()
            .filter(|node| node.is_element())
            .map(|node| node.tag_name().name())
            .collect();
        assert_eq!(children, ["defs", "g"]);
        assert_eq!(
            root.last_element_child().and_then(|g| g.attribute("style")),
            Some("fill:#fff;stroke:#000000")
        );
    }

    #[test]
    fn test_groups_nest() {
        let mut emitter = Emitter::new("");
        emitter.open_group("outer");
        emitter.draw(
            &Primitive::Path {
                data: "M 0,0 L 1,1".to_string(),
            },
            "a",
        );
        emitter.open_group("inner");
        assert_eq!(emitter.depth(), 2);
        emitter.close_group();
        emitter.close_group();
        assert_eq!(emitter.depth(), 0);

        let markup = emitter.finish(svg_element::Definitions::new());
        let document = parse(&markup);
        let outer = document
            .descendants()
            .find(|node| node.attribute("style") == Some("outer"))
            .unwrap();
        let kinds: Vec<&str> = outer
            .children()
            .filter(|node| node.is_element())
            .map(|node| node.tag_name().name())
            .collect();
        assert_eq!(kinds, ["path", "g"]);
    }

    #[test]
    fn test_rect_attributes() {
        let mut emitter = Emitter::new("");
        emitter.draw(
            &Primitive::Rect {
                bounds: Bounds::new(1.0, 2.0, 30.0, 40.0),
                corner_radius: Some(5.0),
                rotation: Some(90.0),
            },
            "fill:none",
        );
        let markup = emitter.finish(svg_element::Definitions::new());
        let document = parse(&markup);
        let rect = document
            .descendants()
            .find(|node| node.has_tag_name("rect"))
            .unwrap();

        assert_eq!(rect.attribute("x"), Some("1"));
        assert_eq!(rect.attribute("width"), Some("30"));
        assert_eq!(rect.attribute("rx"), Some("5"));
        assert_eq!(rect.attribute("ry"), Some("5"));
        assert_eq!(rect.attribute("transform"), Some("rotate(90 16 22)"));
        assert_eq!(rect.attribute("style"), Some("fill:none"));
    }

    #[test]
    fn test_text_lines() {
        let mut emitter = Emitter::new("");
        emitter.text(
            Point::new(10.0, 20.0),
            "fill:#fff;font-size:12px",
            vec![TextRun::new("first", "fill:#ff0000"), TextRun::new("second", "")],
            12.0,
        );
        let markup = emitter.finish(svg_element::Definitions::new());
        let document = parse(&markup);

        let text = document
            .descendants()
            .find(|node| node.has_tag_name("text"))
            .unwrap();
        assert_eq!(text.attribute("x"), Some("10"));
        assert_eq!(text.attribute("y"), Some("20"));
        assert_eq!(text.attribute("style"), Some("fill:#fff;font-size:12px"));

        let spans: Vec<_> = text
            .children()
            .filter(|node| node.has_tag_name("tspan"))
            .collect();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].attribute("y"), Some("32"));
        assert_eq!(spans[0].attribute("style"), Some("fill:#ff0000"));
        assert_eq!(spans[0].text().map(str::trim), Some("first"));
        assert_eq!(spans[1].attribute("y"), Some("44"));
        assert_eq!(spans[1].attribute("style"), None);
    }

    #[test]
    fn test_finish_closes_open_groups() {
        let mut emitter = Emitter::new("");
        emitter.open_group("left-open");
        let markup = emitter.finish(svg_element::Definitions::new());
        assert!(markup.contains("left-open"));
    }
}
