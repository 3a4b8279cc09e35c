//! Text shape.

use super::{default_opacity, default_scale, default_true, ShapeId, ShapeStyle};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Font style variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
    Italic,
    BoldItalic,
}

/// Text decoration variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    LineThrough,
}

/// Horizontal alignment within the text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical alignment within the text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// A text box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    /// Top-left corner position.
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
    pub text: String,
    pub font_family: String,
    pub font_size: f64,
    #[serde(default)]
    pub font_style: FontStyle,
    #[serde(default)]
    pub text_decoration: TextDecoration,
    #[serde(default)]
    pub align: TextAlign,
    #[serde(default)]
    pub vertical_align: VerticalAlign,
    #[serde(default)]
    pub padding: f64,
    #[serde(default = "default_line_height")]
    pub line_height: f64,
    pub style: ShapeStyle,
}

fn default_line_height() -> f64 {
    1.0
}

impl Text {
    pub const DEFAULT_FONT_SIZE: f64 = 16.0;

    /// Create a text box with zero extent; the editor sizes it on placement.
    pub fn new(position: Point, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width: 0.0,
            height: 0.0,
            rotation: 0.0,
            scale: default_scale(),
            opacity: 1.0,
            draggable: true,
            text: text.into(),
            font_family: "sans-serif".to_string(),
            font_size: Self::DEFAULT_FONT_SIZE,
            font_style: FontStyle::default(),
            text_decoration: TextDecoration::default(),
            align: TextAlign::default(),
            vertical_align: VerticalAlign::default(),
            padding: 0.0,
            line_height: default_line_height(),
            style: ShapeStyle::default(),
        }
    }

    /// Height of a single line including padding.
    pub fn line_box_height(&self) -> f64 {
        self.font_size * self.line_height + self.padding * 2.0
    }

    /// Extent spanned by the text box with its scale factor applied.
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
