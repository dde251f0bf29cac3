//! Geometry for shaped graphics.
//!
//! Every shape is built from its bounding box into one or more
//! [`Primitive`]s. Outline shapes become point lists that go through the
//! graphic's flip and rotation modifiers before being turned into path data;
//! rectangles, ellipses and images are symmetric about the center, so flips
//! leave them unchanged and rotation is carried as a transform instead.

use graffle_core::geometry::{self, Bounds, Point};

use crate::graphic::{GraphicError, GraphicNode, ShapeKind};

/// Inset of the vertical bars of a subprocess box, as a fraction of its width.
const SUBPROCESS_INSET: f32 = 0.1;

/// A drawable output element.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect {
        bounds: Bounds,
        corner_radius: Option<f32>,
        rotation: Option<f32>,
    },
    Ellipse {
        center: Point,
        rx: f32,
        ry: f32,
        rotation: Option<f32>,
    },
    Path {
        data: String,
    },
    Image {
        bounds: Bounds,
        href: String,
        rotation: Option<f32>,
    },
}

/// Flip and rotation modifiers of one graphic, about its bounding-box center.
#[derive(Debug, Clone, Copy)]
struct ShapeTransform {
    h_flip: bool,
    v_flip: bool,
    rotation: Option<f32>,
    center: Point,
}

impl ShapeTransform {
    fn of(node: &GraphicNode<'_>, bounds: Bounds) -> Self {
        Self {
            h_flip: node.h_flip(),
            v_flip: node.v_flip(),
            rotation: node.rotation(),
            center: bounds.center(),
        }
    }

    fn apply(&self, points: Vec<Point>) -> Vec<Point> {
        let mut points = points;
        if self.h_flip {
            points = geometry::h_flip_points(&points, self.center);
        }
        if self.v_flip {
            points = geometry::v_flip_points(&points, self.center);
        }
        if let Some(degrees) = self.rotation {
            points = geometry::rotate_points(&points, degrees, self.center);
        }
        points
    }

    fn path(&self, points: Vec<Point>, closed: bool) -> Result<Primitive, GraphicError> {
        let data = path_data(&self.apply(points), closed)?;
        Ok(Primitive::Path { data })
    }
}

/// Builds the primitives of a shaped graphic.
///
/// # Errors
///
/// [`GraphicError::Unsupported`] for unknown shapes and image references past
/// the end of `images`; [`GraphicError::Missing`] or
/// [`GraphicError::Invalid`] when the bounds or shape parameters cannot be
/// read.
pub fn build(node: &GraphicNode<'_>, images: &[String]) -> Result<Vec<Primitive>, GraphicError> {
    let kind = node.shape()?;
    let bounds = node.bounds()?;
    let transform = ShapeTransform::of(node, bounds);

    let (x, y) = (bounds.x(), bounds.y());
    let (width, height) = (bounds.width(), bounds.height());
    let (right, bottom) = (bounds.max_x(), bounds.max_y());

    let primitives = match kind {
        ShapeKind::Rectangle | ShapeKind::RoundRect => match node.image_id()? {
            Some(id) => {
                let href = images.get(id).ok_or_else(|| {
                    GraphicError::Unsupported(format!(
                        "image {id} out of range, document has {} image(s)",
                        images.len()
                    ))
                })?;
                vec![Primitive::Image {
                    bounds,
                    href: href.clone(),
                    rotation: transform.rotation,
                }]
            }
            None => vec![Primitive::Rect {
                bounds,
                corner_radius: node.corner_radius(),
                rotation: transform.rotation,
            }],
        },
        ShapeKind::Circle => vec![Primitive::Ellipse {
            center: bounds.center(),
            rx: width / 2.0,
            ry: height / 2.0,
            rotation: transform.rotation,
        }],
        ShapeKind::HorizontalTriangle => vec![transform.path(
            vec![
                Point::new(x, y),
                Point::new(right, y + height / 2.0),
                Point::new(x, bottom),
            ],
            true,
        )?],
        ShapeKind::RightTriangle => vec![transform.path(
            vec![
                Point::new(x, y),
                Point::new(right, bottom),
                Point::new(x, bottom),
            ],
            true,
        )?],
        ShapeKind::VerticalTriangle => vec![transform.path(
            vec![
                Point::new(x, y),
                Point::new(right, y),
                Point::new(x + width / 2.0, bottom),
            ],
            true,
        )?],
        ShapeKind::Diamond => vec![transform.path(
            vec![
                Point::new(x + width / 2.0, y),
                Point::new(right, y + height / 2.0),
                Point::new(x + width / 2.0, bottom),
                Point::new(x, y + height / 2.0),
            ],
            true,
        )?],
        ShapeKind::Bezier => {
            let center = bounds.center();
            let (rx, ry) = (width / 2.0, height / 2.0);
            let points = node
                .shape_data()?
                .unit_points()?
                .into_iter()
                .map(|unit| {
                    Point::new(
                        unit.x().mul_add(rx, center.x()),
                        unit.y().mul_add(ry, center.y()),
                    )
                })
                .collect();
            vec![transform.path(points, false)?]
        }
        ShapeKind::AdjustableArrow => {
            let shape_data = node.shape_data()?;
            let ratio = shape_data.ratio()?;
            let neck = shape_data.width()?;
            let delta = height * (1.0 - ratio) / 2.0;
            let head = right - neck;
            vec![transform.path(
                vec![
                    Point::new(x, y + delta),
                    Point::new(head, y + delta),
                    Point::new(head, y),
                    Point::new(right, y + height / 2.0),
                    Point::new(head, bottom),
                    Point::new(head, bottom - delta),
                    Point::new(x, bottom - delta),
                ],
                true,
            )?]
        }
        ShapeKind::Subprocess => {
            let inset = width * SUBPROCESS_INSET;
            vec![
                Primitive::Rect {
                    bounds,
                    corner_radius: None,
                    rotation: transform.rotation,
                },
                transform.path(
                    vec![Point::new(x + inset, y), Point::new(x + inset, bottom)],
                    false,
                )?,
                transform.path(
                    vec![
                        Point::new(right - inset, y),
                        Point::new(right - inset, bottom),
                    ],
                    false,
                )?,
            ]
        }
        // No cloud outline yet; the bounding rectangle stands in for it.
        ShapeKind::Cloud => vec![Primitive::Rect {
            bounds,
            corner_radius: None,
            rotation: transform.rotation,
        }],
    };

    Ok(primitives)
}

/// Builds the open polyline of a line graphic from its `Points`.
pub fn line(node: &GraphicNode<'_>) -> Result<Primitive, GraphicError> {
    let points = node.points()?;
    let data = path_data(&points, false)?;
    Ok(Primitive::Path { data })
}

/// Formats points as SVG path data: `M x,y L x,y ...`, with a trailing `z`
/// when `closed`.
///
/// # Errors
///
/// Returns [`GraphicError::Invalid`] for an empty point list.
pub fn path_data(points: &[Point], closed: bool) -> Result<String, GraphicError> {
    let Some((first, rest)) = points.split_first() else {
        return Err(GraphicError::Invalid {
            key: "points",
            reason: "no points to draw".to_string(),
        });
    };

    let mut data = format!("M {},{}", first.x(), first.y());
    for point in rest {
        data.push_str(&format!(" L {},{}", point.x(), point.y()));
    }
    if closed {
        data.push_str(" z");
    }
    Ok(data)
}
