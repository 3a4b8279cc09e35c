//! Shape definitions for the sketchdeck scene model.

mod ellipse;
mod group;
mod path;
mod rectangle;
mod text;

pub use ellipse::Ellipse;
pub use group::Group;
pub use path::{Line, Polygon, Polyline};
pub use rectangle::Rectangle;
pub use text::{FontStyle, Text, TextAlign, TextDecoration, VerticalAlign};

use kurbo::{Point, Rect, Vec2};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Smallest extent a finalized or transformed shape may have, in canvas units.
/// Draw gestures below this threshold are discarded; transforms that would
/// shrink a shape below it are rejected.
pub const MIN_SHAPE_EXTENT: f64 = 5.0;

/// RGBA color, serialized as a CSS-style hex string (`#rrggbb` / `#rrggbbaa`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Format as a hex string; the alpha component is omitted when opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Parse `#rgb`, `#rrggbb`, or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?.trim();
        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
                Some(Self::new(r, g, b, 255))
            }
            6 | 8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                let a = if hex.len() == 8 {
                    u8::from_str_radix(&hex[6..8], 16).ok()?
                } else {
                    255
                };
                Some(Self::new(r, g, b, a))
            }
            _ => None,
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).ok_or_else(|| D::Error::custom(format!("invalid color: {s}")))
    }
}

/// Style properties shared by every shape variant except Group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Fill color (None = no fill).
    pub fill: Option<Color>,
    /// Stroke color.
    pub stroke: Color,
    /// Stroke width.
    pub stroke_width: f64,
    /// Dash pattern (empty = solid).
    #[serde(default)]
    pub dash: Vec<f64>,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: Color::black(),
            stroke_width: 2.0,
            dash: Vec::new(),
        }
    }
}

pub(crate) fn default_opacity() -> f64 {
    1.0
}

pub(crate) fn default_scale() -> Vec2 {
    Vec2::new(1.0, 1.0)
}

pub(crate) fn default_true() -> bool {
    true
}

/// Enum wrapper for all shape variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Line(Line),
    Polyline(Polyline),
    Polygon(Polygon),
    Text(Text),
    Group(Group),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Rectangle(s) => s.id,
            Shape::Ellipse(s) => s.id,
            Shape::Line(s) => s.id,
            Shape::Polyline(s) => s.id,
            Shape::Polygon(s) => s.id,
            Shape::Text(s) => s.id,
            Shape::Group(s) => s.id,
        }
    }

    /// Mint a fresh identifier for this shape, recursing into group children.
    /// Used when cloning shapes into or out of templates and groups so no two
    /// canvas shapes ever alias an id.
    pub fn regenerate_ids(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            Shape::Rectangle(s) => s.id = new_id,
            Shape::Ellipse(s) => s.id = new_id,
            Shape::Line(s) => s.id = new_id,
            Shape::Polyline(s) => s.id = new_id,
            Shape::Polygon(s) => s.id = new_id,
            Shape::Text(s) => s.id = new_id,
            Shape::Group(s) => {
                s.id = new_id;
                for child in &mut s.children {
                    child.regenerate_ids();
                }
            }
        }
    }

    pub fn position(&self) -> Point {
        match self {
            Shape::Rectangle(s) => s.position,
            Shape::Ellipse(s) => s.position,
            Shape::Line(s) => s.position,
            Shape::Polyline(s) => s.position,
            Shape::Polygon(s) => s.position,
            Shape::Text(s) => s.position,
            Shape::Group(s) => s.position,
        }
    }

    pub fn set_position(&mut self, position: Point) {
        match self {
            Shape::Rectangle(s) => s.position = position,
            Shape::Ellipse(s) => s.position = position,
            Shape::Line(s) => s.position = position,
            Shape::Polyline(s) => s.position = position,
            Shape::Polygon(s) => s.position = position,
            Shape::Text(s) => s.position = position,
            Shape::Group(s) => s.position = position,
        }
    }

    /// Rotation in degrees.
    pub fn rotation(&self) -> f64 {
        match self {
            Shape::Rectangle(s) => s.rotation,
            Shape::Ellipse(s) => s.rotation,
            Shape::Line(s) => s.rotation,
            Shape::Polyline(s) => s.rotation,
            Shape::Polygon(s) => s.rotation,
            Shape::Text(s) => s.rotation,
            Shape::Group(s) => s.rotation,
        }
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        match self {
            Shape::Rectangle(s) => s.rotation = degrees,
            Shape::Ellipse(s) => s.rotation = degrees,
            Shape::Line(s) => s.rotation = degrees,
            Shape::Polyline(s) => s.rotation = degrees,
            Shape::Polygon(s) => s.rotation = degrees,
            Shape::Text(s) => s.rotation = degrees,
            Shape::Group(s) => s.rotation = degrees,
        }
    }

    pub fn scale(&self) -> Vec2 {
        match self {
            Shape::Rectangle(s) => s.scale,
            Shape::Ellipse(s) => s.scale,
            Shape::Line(s) => s.scale,
            Shape::Polyline(s) => s.scale,
            Shape::Polygon(s) => s.scale,
            Shape::Text(s) => s.scale,
            Shape::Group(s) => s.scale,
        }
    }

    pub fn set_scale(&mut self, scale: Vec2) {
        match self {
            Shape::Rectangle(s) => s.scale = scale,
            Shape::Ellipse(s) => s.scale = scale,
            Shape::Line(s) => s.scale = scale,
            Shape::Polyline(s) => s.scale = scale,
            Shape::Polygon(s) => s.scale = scale,
            Shape::Text(s) => s.scale = scale,
            Shape::Group(s) => s.scale = scale,
        }
    }

    pub fn opacity(&self) -> f64 {
        match self {
            Shape::Rectangle(s) => s.opacity,
            Shape::Ellipse(s) => s.opacity,
            Shape::Line(s) => s.opacity,
            Shape::Polyline(s) => s.opacity,
            Shape::Polygon(s) => s.opacity,
            Shape::Text(s) => s.opacity,
            Shape::Group(s) => s.opacity,
        }
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        let opacity = opacity.clamp(0.0, 1.0);
        match self {
            Shape::Rectangle(s) => s.opacity = opacity,
            Shape::Ellipse(s) => s.opacity = opacity,
            Shape::Line(s) => s.opacity = opacity,
            Shape::Polyline(s) => s.opacity = opacity,
            Shape::Polygon(s) => s.opacity = opacity,
            Shape::Text(s) => s.opacity = opacity,
            Shape::Group(s) => s.opacity = opacity,
        }
    }

    pub fn draggable(&self) -> bool {
        match self {
            Shape::Rectangle(s) => s.draggable,
            Shape::Ellipse(s) => s.draggable,
            Shape::Line(s) => s.draggable,
            Shape::Polyline(s) => s.draggable,
            Shape::Polygon(s) => s.draggable,
            Shape::Text(s) => s.draggable,
            Shape::Group(s) => s.draggable,
        }
    }

    pub fn set_draggable(&mut self, draggable: bool) {
        match self {
            Shape::Rectangle(s) => s.draggable = draggable,
            Shape::Ellipse(s) => s.draggable = draggable,
            Shape::Line(s) => s.draggable = draggable,
            Shape::Polyline(s) => s.draggable = draggable,
            Shape::Polygon(s) => s.draggable = draggable,
            Shape::Text(s) => s.draggable = draggable,
            Shape::Group(s) => s.draggable = draggable,
        }
    }

    /// Style properties; None for groups, whose appearance derives from their
    /// children.
    pub fn style(&self) -> Option<&ShapeStyle> {
        match self {
            Shape::Rectangle(s) => Some(&s.style),
            Shape::Ellipse(s) => Some(&s.style),
            Shape::Line(s) => Some(&s.style),
            Shape::Polyline(s) => Some(&s.style),
            Shape::Polygon(s) => Some(&s.style),
            Shape::Text(s) => Some(&s.style),
            Shape::Group(_) => None,
        }
    }

    pub fn style_mut(&mut self) -> Option<&mut ShapeStyle> {
        match self {
            Shape::Rectangle(s) => Some(&mut s.style),
            Shape::Ellipse(s) => Some(&mut s.style),
            Shape::Line(s) => Some(&mut s.style),
            Shape::Polyline(s) => Some(&mut s.style),
            Shape::Polygon(s) => Some(&mut s.style),
            Shape::Text(s) => Some(&mut s.style),
            Shape::Group(_) => None,
        }
    }

    /// Bounding box in canvas coordinates.
    ///
    /// Box shapes span `[x, x + width * scale.x] x [y, y + height * scale.y]`;
    /// point-sequence shapes take the min/max of their points scaled by the
    /// shape's own scale factor and offset by its position.
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rectangle(s) => s.scaled_rect(),
            Shape::Ellipse(s) => s.scaled_rect(),
            Shape::Line(s) => path::points_bounds(s.position, &s.points, s.scale),
            Shape::Polyline(s) => path::points_bounds(s.position, &s.points, s.scale),
            Shape::Polygon(s) => path::points_bounds(s.position, &s.points, s.scale),
            Shape::Text(s) => s.scaled_rect(),
            Shape::Group(s) => s.scaled_rect(),
        }
    }

    /// Move the shape by a delta.
    pub fn translate(&mut self, delta: Vec2) {
        let p = self.position();
        self.set_position(Point::new(p.x + delta.x, p.y + delta.y));
    }

    /// Fold the current scale factor into the shape's stored geometry and
    /// reset the scale to 1. Box shapes absorb it into width/height,
    /// point-sequence shapes into their coordinates, and groups additionally
    /// push it down into each child's position and scale so the composite
    /// appearance is unchanged.
    pub fn bake_scale(&mut self) {
        let scale = self.scale();
        if (scale.x - 1.0).abs() < f64::EPSILON && (scale.y - 1.0).abs() < f64::EPSILON {
            return;
        }
        match self {
            Shape::Rectangle(s) => {
                s.width *= scale.x.abs();
                s.height *= scale.y.abs();
            }
            Shape::Ellipse(s) => {
                s.width *= scale.x.abs();
                s.height *= scale.y.abs();
            }
            Shape::Text(s) => {
                s.width *= scale.x.abs();
                s.height *= scale.y.abs();
            }
            Shape::Line(s) => path::scale_points(&mut s.points, scale),
            Shape::Polyline(s) => path::scale_points(&mut s.points, scale),
            Shape::Polygon(s) => path::scale_points(&mut s.points, scale),
            Shape::Group(s) => {
                s.width *= scale.x.abs();
                s.height *= scale.y.abs();
                for child in &mut s.children {
                    let p = child.position();
                    child.set_position(Point::new(p.x * scale.x, p.y * scale.y));
                    let cs = child.scale();
                    child.set_scale(Vec2::new(cs.x * scale.x, cs.y * scale.y));
                }
            }
        }
        self.set_scale(Vec2::new(1.0, 1.0));
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Shape::Group(_))
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Shape::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut Group> {
        match self {
            Shape::Group(g) => Some(g),
            _ => None,
        }
    }
}

/// Closed-interval overlap test between two rectangles (any overlap counts,
/// including shared edges and zero-extent rectangles such as the bounds of a
/// horizontal line).
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    let (ax0, ax1) = (a.x0.min(a.x1), a.x0.max(a.x1));
    let (ay0, ay1) = (a.y0.min(a.y1), a.y0.max(a.y1));
    let (bx0, bx1) = (b.x0.min(b.x1), b.x0.max(b.x1));
    let (by0, by1) = (b.y0.min(b.y1), b.y0.max(b.y1));
    ax0 <= bx1 && bx0 <= ax1 && ay0 <= by1 && by0 <= ay1
}
