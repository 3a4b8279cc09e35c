//! Point-sequence shapes: lines, polylines, and polygons.
//!
//! All three store geometry as a flat list of alternating x,y coordinates
//! relative to the shape's position.

use super::{default_opacity, default_scale, default_true, ShapeId, ShapeStyle};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Coerce a flat coordinate list into a valid point sequence: an odd trailing
/// value is dropped, and fewer than two pairs are padded by doubling the last
/// pair (or the origin).
pub(crate) fn normalize_points(mut points: Vec<f64>) -> Vec<f64> {
    if points.len() % 2 != 0 {
        points.pop();
    }
    while points.len() < 4 {
        let n = points.len();
        if n == 0 {
            points.extend([0.0, 0.0]);
        } else {
            points.extend([points[n - 2], points[n - 1]]);
        }
    }
    points
}

/// Bounding rectangle of a flat coordinate list, scaled by the shape's own
/// scale factor and offset by its position.
pub(crate) fn points_bounds(origin: Point, points: &[f64], scale: Vec2) -> Rect {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for pair in points.chunks_exact(2) {
        let x = origin.x + pair[0] * scale.x;
        let y = origin.y + pair[1] * scale.y;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    if !min_x.is_finite() {
        return Rect::from_origin_size(origin, kurbo::Size::ZERO);
    }
    Rect::new(min_x, min_y, max_x, max_y)
}

/// Total polyline length of a flat coordinate list.
pub(crate) fn path_length(points: &[f64]) -> f64 {
    let mut length = 0.0;
    let mut prev: Option<(f64, f64)> = None;
    for pair in points.chunks_exact(2) {
        if let Some((px, py)) = prev {
            length += ((pair[0] - px).powi(2) + (pair[1] - py).powi(2)).sqrt();
        }
        prev = Some((pair[0], pair[1]));
    }
    length
}

/// Multiply every coordinate by the matching scale component.
pub(crate) fn scale_points(points: &mut [f64], scale: Vec2) {
    for pair in points.chunks_exact_mut(2) {
        pair[0] *= scale.x;
        pair[1] *= scale.y;
    }
}

/// A straight segment between two locally-addressed endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub(crate) id: ShapeId,
    pub position: Point,
    /// Flat alternating x,y coordinates relative to `position`.
    pub points: Vec<f64>,
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

impl Line {
    /// Create a line from `position` to `position + end`.
    pub fn new(position: Point, end: Vec2) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            points: vec![0.0, 0.0, end.x, end.y],
            rotation: 0.0,
            scale: default_scale(),
            opacity: 1.0,
            draggable: true,
            style: ShapeStyle::default(),
        }
    }

    /// Build from a flat coordinate list (coerced to at least two pairs).
    pub fn from_points(position: Point, points: Vec<f64>) -> Self {
        let mut line = Self::new(position, Vec2::ZERO);
        line.points = normalize_points(points);
        line
    }

    /// Replace the terminal point (used while a draw gesture is in progress).
    pub fn set_end(&mut self, end: Vec2) {
        let n = self.points.len();
        self.points[n - 2] = end.x;
        self.points[n - 1] = end.y;
    }

    pub fn length(&self) -> f64 {
        path_length(&self.points)
    }
}

/// An open sequence of connected segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub(crate) id: ShapeId,
    pub position: Point,
    /// Flat alternating x,y coordinates relative to `position`.
    pub points: Vec<f64>,
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

impl Polyline {
    /// Create a polyline from a flat coordinate list (coerced to at least two
    /// pairs).
    pub fn new(position: Point, points: Vec<f64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            points: normalize_points(points),
            rotation: 0.0,
            scale: default_scale(),
            opacity: 1.0,
            draggable: true,
            style: ShapeStyle::default(),
        }
    }

    /// Append a point (relative to `position`).
    pub fn push_point(&mut self, x: f64, y: f64) {
        self.points.extend([x, y]);
    }

    pub fn length(&self) -> f64 {
        path_length(&self.points)
    }
}

/// A closed sequence of connected segments; the outline returns from the last
/// point to the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub(crate) id: ShapeId,
    pub position: Point,
    /// Flat alternating x,y coordinates relative to `position`.
    pub points: Vec<f64>,
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

impl Polygon {
    /// Create a polygon from a flat coordinate list (coerced to at least two
    /// pairs).
    pub fn new(position: Point, points: Vec<f64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            points: normalize_points(points),
            rotation: 0.0,
            scale: default_scale(),
            opacity: 1.0,
            draggable: true,
            style: ShapeStyle::default(),
        }
    }

    /// Append a point (relative to `position`).
    pub fn push_point(&mut self, x: f64, y: f64) {
        self.points.extend([x, y]);
    }

    /// Open-path length of the outline, excluding the closing edge.
    pub fn length(&self) -> f64 {
        path_length(&self.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_points_pads_single_pair() {
        assert_eq!(normalize_points(vec![3.0, 4.0]), vec![3.0, 4.0, 3.0, 4.0]);
    }

    #[test]
    fn test_normalize_points_drops_odd_tail() {
        assert_eq!(
            normalize_points(vec![0.0, 0.0, 1.0, 2.0, 9.0]),
            vec![0.0, 0.0, 1.0, 2.0]
        );
    }

    #[test]
    fn test_line_length() {
        let line = Line::new(Point::new(5.0, 5.0), Vec2::new(3.0, 4.0));
        assert!((line.length() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_end() {
        let mut line = Line::new(Point::new(0.0, 0.0), Vec2::ZERO);
        line.set_end(Vec2::new(10.0, 0.0));
        assert_eq!(line.points, vec![0.0, 0.0, 10.0, 0.0]);
    }

    #[test]
    fn test_points_bounds_scaled_and_offset() {
        let bounds = points_bounds(
            Point::new(100.0, 100.0),
            &[0.0, 0.0, 10.0, -20.0],
            Vec2::new(2.0, 1.0),
        );
        assert!((bounds.x0 - 100.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 80.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 120.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_polyline_accumulates_points() {
        let mut poly = Polyline::new(Point::new(0.0, 0.0), vec![0.0, 0.0, 1.0, 0.0]);
        poly.push_point(1.0, 1.0);
        assert_eq!(poly.points.len(), 6);
        assert!((poly.length() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_path_length_multi_segment() {
        assert!((path_length(&[0.0, 0.0, 3.0, 4.0, 3.0, 10.0]) - 11.0).abs() < f64::EPSILON);
    }
}
