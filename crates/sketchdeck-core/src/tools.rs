//! Tool system: the active tool and in-progress pointer interactions.

use crate::shapes::{
    Ellipse, Line, Polygon, Polyline, Rectangle, Shape, ShapeStyle, Text, MIN_SHAPE_EXTENT,
};
use crate::stamps::Template;
use kurbo::{Point, Rect, Vec2};
use log::debug;
use serde::{Deserialize, Serialize};

/// Minimum spacing between accumulated points while dragging out a polyline
/// or polygon.
const MIN_POINT_SPACING: f64 = 2.0;

/// Default extent of a text box placed with a click.
const DEFAULT_TEXT_WIDTH: f64 = 120.0;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Rectangle,
    Ellipse,
    Line,
    Polyline,
    Polygon,
    Text,
    Stamp,
}

impl ToolKind {
    /// Whether this tool creates shapes with a pointer drag.
    pub fn creates_shapes(&self) -> bool {
        !matches!(self, ToolKind::Select | ToolKind::Stamp)
    }
}

/// State of the current pointer interaction.
#[derive(Debug, Clone, Default)]
pub enum ToolState {
    /// No interaction in progress.
    #[default]
    Idle,
    /// A shape is being dragged out.
    Drawing {
        /// Anchor point of the gesture in world coordinates.
        anchor: Point,
        /// The in-progress shape.
        shape: Shape,
    },
    /// The rubber-band selection rectangle is being dragged.
    Marquee { anchor: Point, current: Point },
    /// A template instance follows the pointer, waiting for a click.
    PlacingStamp { template: Template },
}

/// Tracks the active tool, the in-progress interaction, and the style applied
/// to newly created shapes.
#[derive(Debug, Clone, Default)]
pub struct ToolController {
    pub current: ToolKind,
    pub state: ToolState,
    /// Style defaults applied to new shapes.
    pub style: ShapeStyle,
}

impl ToolController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch tools; any in-progress interaction is abandoned.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current = tool;
        self.state = ToolState::Idle;
    }

    /// Whether a pointer interaction is in progress.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, ToolState::Idle)
    }

    /// The in-progress shape, for preview rendering.
    pub fn preview(&self) -> Option<&Shape> {
        match &self.state {
            ToolState::Drawing { shape, .. } => Some(shape),
            _ => None,
        }
    }

    /// Begin a draw gesture: allocate a degenerate shape anchored at the
    /// pointer. No-op for tools that do not create shapes.
    pub fn begin_draw(&mut self, world: Point) {
        let shape = match self.current {
            ToolKind::Rectangle => Some(Shape::Rectangle(Rectangle::new(world, 0.0, 0.0))),
            ToolKind::Ellipse => Some(Shape::Ellipse(Ellipse::new(world, 0.0, 0.0))),
            ToolKind::Line => Some(Shape::Line(Line::new(world, Vec2::ZERO))),
            ToolKind::Polyline => Some(Shape::Polyline(Polyline::new(world, vec![0.0, 0.0]))),
            ToolKind::Polygon => Some(Shape::Polygon(Polygon::new(world, vec![0.0, 0.0]))),
            ToolKind::Text => Some(Shape::Text(Text::new(world, String::new()))),
            ToolKind::Select | ToolKind::Stamp => None,
        };
        if let Some(mut shape) = shape {
            if let Some(style) = shape.style_mut() {
                *style = self.style.clone();
            }
            self.state = ToolState::Drawing {
                anchor: world,
                shape,
            };
        }
    }

    /// Recompute the in-progress shape's geometry for the current pointer
    /// position.
    pub fn update_draw(&mut self, world: Point) {
        let ToolState::Drawing { anchor, shape } = &mut self.state else {
            return;
        };
        let delta = Vec2::new(world.x - anchor.x, world.y - anchor.y);
        match shape {
            Shape::Rectangle(rect) => {
                rect.width = delta.x;
                rect.height = delta.y;
            }
            Shape::Ellipse(ellipse) => {
                ellipse.width = delta.x;
                ellipse.height = delta.y;
            }
            Shape::Text(text) => {
                text.width = delta.x;
                text.height = delta.y;
            }
            Shape::Line(line) => line.set_end(delta),
            Shape::Polyline(poly) => {
                if spaced_out(&poly.points, delta) {
                    poly.push_point(delta.x, delta.y);
                }
            }
            Shape::Polygon(poly) => {
                if spaced_out(&poly.points, delta) {
                    poly.push_point(delta.x, delta.y);
                }
            }
            Shape::Group(_) => {}
        }
    }

    /// Finish the draw gesture. Returns the finalized shape, or None when the
    /// gesture stayed below the minimum size threshold and is discarded.
    pub fn finish_draw(&mut self, world: Point) -> Option<Shape> {
        self.update_draw(world);
        let state = std::mem::take(&mut self.state);
        let ToolState::Drawing { anchor, shape } = state else {
            return None;
        };

        match shape {
            Shape::Rectangle(mut rect) => {
                let (pos, w, h) = normalized_box(anchor, rect.width, rect.height);
                if w < MIN_SHAPE_EXTENT || h < MIN_SHAPE_EXTENT {
                    debug!("discarding rectangle gesture below minimum size");
                    return None;
                }
                rect.position = pos;
                rect.width = w;
                rect.height = h;
                Some(Shape::Rectangle(rect))
            }
            Shape::Ellipse(mut ellipse) => {
                let (pos, w, h) = normalized_box(anchor, ellipse.width, ellipse.height);
                if w < MIN_SHAPE_EXTENT || h < MIN_SHAPE_EXTENT {
                    debug!("discarding ellipse gesture below minimum size");
                    return None;
                }
                ellipse.position = pos;
                ellipse.width = w;
                ellipse.height = h;
                Some(Shape::Ellipse(ellipse))
            }
            Shape::Text(mut text) => {
                // A click (or tiny drag) places a default-sized text box.
                let (pos, w, h) = normalized_box(anchor, text.width, text.height);
                if w < MIN_SHAPE_EXTENT || h < MIN_SHAPE_EXTENT {
                    text.position = anchor;
                    text.width = DEFAULT_TEXT_WIDTH;
                    text.height = text.line_box_height();
                } else {
                    text.position = pos;
                    text.width = w;
                    text.height = h;
                }
                Some(Shape::Text(text))
            }
            Shape::Line(line) => {
                if line.length() < MIN_SHAPE_EXTENT {
                    debug!("discarding line gesture below minimum length");
                    return None;
                }
                Some(Shape::Line(line))
            }
            Shape::Polyline(poly) => {
                if poly.length() < MIN_SHAPE_EXTENT {
                    debug!("discarding polyline gesture below minimum length");
                    return None;
                }
                Some(Shape::Polyline(poly))
            }
            Shape::Polygon(poly) => {
                if poly.length() < MIN_SHAPE_EXTENT {
                    debug!("discarding polygon gesture below minimum length");
                    return None;
                }
                Some(Shape::Polygon(poly))
            }
            Shape::Group(_) => None,
        }
    }

    /// Begin dragging the rubber-band selection rectangle.
    pub fn begin_marquee(&mut self, world: Point) {
        self.state = ToolState::Marquee {
            anchor: world,
            current: world,
        };
    }

    /// Resize the marquee to the current pointer position.
    pub fn update_marquee(&mut self, world: Point) {
        if let ToolState::Marquee { current, .. } = &mut self.state {
            *current = world;
        }
    }

    /// The marquee rectangle, normalized, if one is being dragged.
    pub fn marquee_rect(&self) -> Option<Rect> {
        match self.state {
            ToolState::Marquee { anchor, current } => Some(Rect::from_points(anchor, current)),
            _ => None,
        }
    }

    /// Finish the marquee drag, returning its final rectangle.
    pub fn finish_marquee(&mut self) -> Option<Rect> {
        let rect = self.marquee_rect();
        if rect.is_some() {
            self.state = ToolState::Idle;
        }
        rect
    }

    /// Arm stamp placement with the given template.
    pub fn begin_placement(&mut self, template: Template) {
        self.current = ToolKind::Stamp;
        self.state = ToolState::PlacingStamp { template };
    }

    /// The template armed for placement, if any.
    pub fn placing_template(&self) -> Option<&Template> {
        match &self.state {
            ToolState::PlacingStamp { template } => Some(template),
            _ => None,
        }
    }

    /// Abandon the current interaction.
    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
    }
}

/// Flip a box with possibly negative extents so its origin is the minimum
/// corner.
fn normalized_box(anchor: Point, width: f64, height: f64) -> (Point, f64, f64) {
    let (x, w) = if width < 0.0 {
        (anchor.x + width, -width)
    } else {
        (anchor.x, width)
    };
    let (y, h) = if height < 0.0 {
        (anchor.y + height, -height)
    } else {
        (anchor.y, height)
    };
    (Point::new(x, y), w, h)
}

/// Whether the pointer has moved far enough from the last accumulated point
/// to record a new one.
fn spaced_out(points: &[f64], delta: Vec2) -> bool {
    let n = points.len();
    if n < 2 {
        return true;
    }
    let dx = delta.x - points[n - 2];
    let dy = delta.y - points[n - 1];
    (dx * dx + dy * dy).sqrt() >= MIN_POINT_SPACING
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_switch_resets_state() {
        let mut tools = ToolController::new();
        tools.set_tool(ToolKind::Rectangle);
        tools.begin_draw(Point::new(0.0, 0.0));
        assert!(tools.is_active());

        tools.set_tool(ToolKind::Select);
        assert!(!tools.is_active());
    }

    #[test]
    fn test_rectangle_gesture() {
        let mut tools = ToolController::new();
        tools.set_tool(ToolKind::Rectangle);

        tools.begin_draw(Point::new(10.0, 10.0));
        tools.update_draw(Point::new(60.0, 40.0));
        assert!(tools.preview().is_some());

        let shape = tools.finish_draw(Point::new(60.0, 40.0)).unwrap();
        let Shape::Rectangle(rect) = shape else {
            panic!("expected rectangle");
        };
        assert_eq!(rect.position, Point::new(10.0, 10.0));
        assert!((rect.width - 50.0).abs() < f64::EPSILON);
        assert!((rect.height - 30.0).abs() < f64::EPSILON);
        assert!(!tools.is_active());
    }

    #[test]
    fn test_up_left_gesture_flips_origin() {
        let mut tools = ToolController::new();
        tools.set_tool(ToolKind::Rectangle);

        tools.begin_draw(Point::new(10.0, 10.0));
        let shape = tools.finish_draw(Point::new(4.0, 4.0)).unwrap();
        let Shape::Rectangle(rect) = shape else {
            panic!("expected rectangle");
        };
        assert_eq!(rect.position, Point::new(4.0, 4.0));
        assert!((rect.width - 6.0).abs() < f64::EPSILON);
        assert!((rect.height - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tiny_box_gesture_discarded() {
        let mut tools = ToolController::new();
        tools.set_tool(ToolKind::Ellipse);

        tools.begin_draw(Point::new(0.0, 0.0));
        assert!(tools.finish_draw(Point::new(3.0, 3.0)).is_none());
    }

    #[test]
    fn test_short_line_discarded() {
        let mut tools = ToolController::new();
        tools.set_tool(ToolKind::Line);

        tools.begin_draw(Point::new(0.0, 0.0));
        assert!(tools.finish_draw(Point::new(0.0, 2.0)).is_none());
    }

    #[test]
    fn test_line_gesture_keeps_anchor_relative_points() {
        let mut tools = ToolController::new();
        tools.set_tool(ToolKind::Line);

        tools.begin_draw(Point::new(100.0, 100.0));
        let shape = tools.finish_draw(Point::new(130.0, 140.0)).unwrap();
        let Shape::Line(line) = shape else {
            panic!("expected line");
        };
        assert_eq!(line.position, Point::new(100.0, 100.0));
        assert_eq!(line.points, vec![0.0, 0.0, 30.0, 40.0]);
    }

    #[test]
    fn test_polyline_accumulates_while_dragging() {
        let mut tools = ToolController::new();
        tools.set_tool(ToolKind::Polyline);

        tools.begin_draw(Point::new(0.0, 0.0));
        tools.update_draw(Point::new(10.0, 0.0));
        tools.update_draw(Point::new(10.0, 10.0));
        let shape = tools.finish_draw(Point::new(20.0, 10.0)).unwrap();
        let Shape::Polyline(poly) = shape else {
            panic!("expected polyline");
        };
        assert!(poly.points.len() >= 8);
        assert!((poly.length() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_text_click_gets_default_box() {
        let mut tools = ToolController::new();
        tools.set_tool(ToolKind::Text);

        tools.begin_draw(Point::new(50.0, 50.0));
        let shape = tools.finish_draw(Point::new(50.0, 50.0)).unwrap();
        let Shape::Text(text) = shape else {
            panic!("expected text");
        };
        assert_eq!(text.position, Point::new(50.0, 50.0));
        assert!(text.width > 0.0);
        assert!(text.height > 0.0);
    }

    #[test]
    fn test_marquee_normalizes_rect() {
        let mut tools = ToolController::new();
        tools.begin_marquee(Point::new(50.0, 50.0));
        tools.update_marquee(Point::new(10.0, 20.0));

        let rect = tools.finish_marquee().unwrap();
        assert_eq!(rect, Rect::new(10.0, 20.0, 50.0, 50.0));
        assert!(!tools.is_active());
    }

    #[test]
    fn test_new_shape_takes_controller_style() {
        use crate::shapes::Color;

        let mut tools = ToolController::new();
        tools.style.stroke = Color::new(255, 0, 0, 255);
        tools.set_tool(ToolKind::Rectangle);

        tools.begin_draw(Point::new(0.0, 0.0));
        let shape = tools.finish_draw(Point::new(20.0, 20.0)).unwrap();
        assert_eq!(shape.style().unwrap().stroke, Color::new(255, 0, 0, 255));
    }
}
