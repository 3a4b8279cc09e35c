//! Stage view transform (pan and zoom).

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Minimum allowed zoom level.
pub const MIN_SCALE: f64 = 0.1;
/// Maximum allowed zoom level.
pub const MAX_SCALE: f64 = 10.0;

/// Pan offset and zoom of the stage, as persisted in scene files.
///
/// Pointer coordinates arriving from the render surface are stage
/// coordinates; this transform converts them to world (canvas) coordinates
/// for shape math.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewParams {
    /// Horizontal pan offset.
    pub x: f64,
    /// Vertical pan offset.
    pub y: f64,
    /// Zoom level (1.0 = 100%).
    pub scale: f64,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }
}

impl ViewParams {
    pub fn new(x: f64, y: f64, scale: f64) -> Self {
        Self {
            x,
            y,
            scale: scale.clamp(MIN_SCALE, MAX_SCALE),
        }
    }

    /// Convert a stage point to world coordinates.
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point::new((screen.x - self.x) / self.scale, (screen.y - self.y) / self.scale)
    }

    /// Convert a world point to stage coordinates.
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point::new(world.x * self.scale + self.x, world.y * self.scale + self.y)
    }

    /// Pan by a delta in stage coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Zoom by a factor, keeping the given stage point fixed.
    pub fn zoom_at(&mut self, screen: Point, factor: f64) {
        let new_scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        if (new_scale - self.scale).abs() < f64::EPSILON {
            return;
        }
        let world = self.screen_to_world(screen);
        self.scale = new_scale;
        let moved = self.world_to_screen(world);
        self.x += screen.x - moved.x;
        self.y += screen.y - moved.y;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
