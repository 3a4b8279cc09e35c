//! Ellipse shape.

use super::{default_opacity, default_scale, default_true, ShapeId, ShapeStyle};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ellipse, anchored like the other box shapes at the top-left corner of
/// its extent; the radii are derived from width and height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub(crate) id: ShapeId,
    /// Top-left corner of the ellipse's extent.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_scale")]
    pub scale: Vec2,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default = "default_true")]
    pub draggable: bool,
    pub style: ShapeStyle,
}

impl Ellipse {
    /// Create a new ellipse. Zero width/height is allowed while a draw
    /// gesture is in progress.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            rotation: 0.0,
            scale: default_scale(),
            opacity: 1.0,
            draggable: true,
            style: ShapeStyle::default(),
        }
    }

    /// Create an ellipse inscribed in the rectangle spanning two corners.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        Self::new(
            Point::new(p1.x.min(p2.x), p1.y.min(p2.y)),
            (p2.x - p1.x).abs(),
            (p2.y - p1.y).abs(),
        )
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.position.x + self.width / 2.0,
            self.position.y + self.height / 2.0,
        )
    }

    pub fn radius_x(&self) -> f64 {
        self.width / 2.0
    }

    pub fn radius_y(&self) -> f64 {
        self.height / 2.0
    }

    /// Extent spanned by the ellipse with its scale factor applied.
    pub(crate) fn scaled_rect(&self) -> Rect {
        Rect::from_points(
            self.position,
            Point::new(
                self.position.x + self.width * self.scale.x,
                self.position.y + self.height * self.scale.y,
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ellipse_creation() {
        let ellipse = Ellipse::new(Point::new(20.0, 30.0), 60.0, 40.0);
        assert!((ellipse.radius_x() - 30.0).abs() < f64::EPSILON);
        assert!((ellipse.radius_y() - 20.0).abs() < f64::EPSILON);
        let center = ellipse.center();
        assert!((center.x - 50.0).abs() < f64::EPSILON);
        assert!((center.y - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ellipse_from_corners() {
        let ellipse = Ellipse::from_corners(Point::new(100.0, 80.0), Point::new(40.0, 20.0));
        assert!((ellipse.position.x - 40.0).abs() < f64::EPSILON);
        assert!((ellipse.position.y - 20.0).abs() < f64::EPSILON);
        assert!((ellipse.width - 60.0).abs() < f64::EPSILON);
        assert!((ellipse.height - 60.0).abs() < f64::EPSILON);
    }
}
