//! Geometric primitives for shape synthesis.
//!
//! This module provides the point and bounding-box types used when turning
//! OmniGraffle shapes into SVG geometry, plus the pure point-list transforms
//! applied to shapes that carry flip or rotation modifiers.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in canvas space
//! - [`Bounds`] - A rectangle given by its top-left corner and its size
//! - [`h_flip_points`], [`v_flip_points`], [`rotate_points`] - Transforms
//!   about an explicit center that return a new point list
//!
//! # Coordinate System
//!
//! OmniGraffle canvases use the same orientation as SVG:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! With Y growing downward, a positive rotation angle turns points clockwise
//! on screen.

/// A 2D point in canvas coordinates.
///
/// # Examples
///
/// ```
/// # use graffle_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

/// An axis-aligned rectangle as stored in OmniGraffle `Bounds` strings:
/// top-left corner plus width and height.
///
/// # Examples
///
/// ```
/// # use graffle_core::geometry::Bounds;
/// let bounds = Bounds::new(10.0, 20.0, 100.0, 50.0);
/// assert_eq!(bounds.center().x(), 60.0);
/// assert_eq!(bounds.center().y(), 45.0);
/// assert_eq!(bounds.max_x(), 110.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the left edge
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the top edge
    pub fn y(self) -> f32 {
        self.y
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns the right edge
    pub fn max_x(self) -> f32 {
        self.x + self.width
    }

    /// Returns the bottom edge
    pub fn max_y(self) -> f32 {
        self.y + self.height
    }

    /// Returns the center of the rectangle, the origin for flips and rotations
    pub fn center(self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Mirrors points across the vertical line through `center`.
pub fn h_flip_points(points: &[Point], center: Point) -> Vec<Point> {
    points
        .iter()
        .map(|p| Point::new(2.0 * center.x() - p.x(), p.y()))
        .collect()
}

/// Mirrors points across the horizontal line through `center`.
pub fn v_flip_points(points: &[Point], center: Point) -> Vec<Point> {
    points
        .iter()
        .map(|p| Point::new(p.x(), 2.0 * center.y() - p.y()))
        .collect()
}

/// Rotates points by `degrees` about `center`.
///
/// # Examples
///
/// ```
/// # use graffle_core::geometry::{Point, rotate_points};
/// let rotated = rotate_points(&[Point::new(1.0, 0.0)], 90.0, Point::default());
/// assert!((rotated[0].x() - 0.0).abs() < 1e-6);
/// assert!((rotated[0].y() - 1.0).abs() < 1e-6);
/// ```
pub fn rotate_points(points: &[Point], degrees: f32, center: Point) -> Vec<Point> {
    let (sin, cos) = degrees.to_radians().sin_cos();
    points
        .iter()
        .map(|p| {
            let d = p.sub_point(center);
            Point::new(
                d.x().mul_add(cos, -d.y() * sin),
                d.x().mul_add(sin, d.y() * cos),
            )
            .add_point(center)
        })
        .collect()
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn points_strategy() -> impl Strategy<Value = Vec<Point>> {
        prop::collection::vec(point_strategy(), 0..16)
    }

    fn close(a: Point, b: Point) -> bool {
        approx_eq!(f32, a.x(), b.x(), epsilon = 0.05)
            && approx_eq!(f32, a.y(), b.y(), epsilon = 0.05)
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Flipping twice about the same center restores the original points.
    fn check_double_flip_is_identity(
        points: Vec<Point>,
        center: Point,
    ) -> Result<(), TestCaseError> {
        let h = h_flip_points(&h_flip_points(&points, center), center);
        let v = v_flip_points(&v_flip_points(&points, center), center);
        for ((original, h), v) in points.iter().zip(h.iter()).zip(v.iter()) {
            prop_assert!(close(*original, *h), "{original:?} != {h:?}");
            prop_assert!(close(*original, *v), "{original:?} != {v:?}");
        }
        Ok(())
    }

    /// Rotation preserves the distance of every point from the center.
    fn check_rotation_preserves_distance(
        points: Vec<Point>,
        degrees: f32,
        center: Point,
    ) -> Result<(), TestCaseError> {
        let rotated = rotate_points(&points, degrees, center);
        prop_assert_eq!(rotated.len(), points.len());
        for (before, after) in points.iter().zip(rotated.iter()) {
            let r0 = before.sub_point(center);
            let r1 = after.sub_point(center);
            let d0 = r0.x().hypot(r0.y());
            let d1 = r1.x().hypot(r1.y());
            prop_assert!(approx_eq!(f32, d0, d1, epsilon = 0.1), "{d0} != {d1}");
        }
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn double_flip_is_identity(points in points_strategy(), center in point_strategy()) {
            check_double_flip_is_identity(points, center)?;
        }

        #[test]
        fn rotation_preserves_distance(
            points in points_strategy(),
            degrees in -720.0f32..720.0,
            center in point_strategy(),
        ) {
            check_rotation_preserves_distance(points, degrees, center)?;
        }
    }
}
