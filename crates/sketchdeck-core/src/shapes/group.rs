//! Group shape for manipulating multiple shapes as a single unit.

use super::{default_opacity, default_scale, default_true, Shape, ShapeId};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A composite shape. Children carry coordinates in the group's local space
/// (relative to the group's position); the group node itself carries absolute
/// position, rotation, and scale. Groups can nest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub(crate) id: ShapeId,
    /// Absolute position of the group's local origin.
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
    /// Child shapes, positioned in group-local space.
    pub children: Vec<Shape>,
}

impl Group {
    /// Create a new group from children already expressed in group-local
    /// coordinates.
    pub fn new(position: Point, width: f64, height: f64, children: Vec<Shape>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            rotation: 0.0,
            scale: default_scale(),
            opacity: 1.0,
            draggable: true,
            children,
        }
    }

    pub fn children(&self) -> &[Shape] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Shape> {
        &mut self.children
    }

    /// Dissolve the group, converting each child from group-local to absolute
    /// canvas coordinates by composing the group's position, rotation, and
    /// scale with the child's own placement. Each child receives a fresh id
    /// and becomes individually draggable.
    pub fn into_absolute_children(self) -> Vec<Shape> {
        let rot = self.rotation.to_radians();
        let (sin, cos) = rot.sin_cos();
        let (gx, gy) = (self.position.x, self.position.y);
        let gs = self.scale;

        self.children
            .into_iter()
            .map(|mut child| {
                let local = child.position();
                let sx = local.x * gs.x;
                let sy = local.y * gs.y;
                child.set_position(Point::new(
                    gx + cos * sx - sin * sy,
                    gy + sin * sx + cos * sy,
                ));
                child.set_rotation(child.rotation() + self.rotation);
                let cs = child.scale();
                child.set_scale(Vec2::new(cs.x * gs.x, cs.y * gs.y));
                child.set_draggable(true);
                child.regenerate_ids();
                child
            })
            .collect()
    }

    /// All shape ids in this group, including nested groups.
    pub fn all_shape_ids(&self) -> Vec<ShapeId> {
        let mut ids = vec![self.id];
        for child in &self.children {
            if let Shape::Group(group) = child {
                ids.extend(group.all_shape_ids());
            } else {
                ids.push(child.id());
            }
        }
        ids
    }

    /// Extent spanned by the group with its scale factor applied.
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
    use crate::shapes::Rectangle;

    #[test]
    fn test_group_creation() {
        let rect1 = Rectangle::new(Point::new(0.0, 0.0), 100.0, 50.0);
        let rect2 = Rectangle::new(Point::new(200.0, 200.0), 50.0, 100.0);

        let group = Group::new(
            Point::new(0.0, 0.0),
            250.0,
            300.0,
            vec![Shape::Rectangle(rect1), Shape::Rectangle(rect2)],
        );
        assert_eq!(group.children().len(), 2);
    }

    #[test]
    fn test_into_absolute_children_translation_only() {
        let rect = Rectangle::new(Point::new(20.0, 20.0), 10.0, 10.0);
        let group = Group::new(Point::new(100.0, 50.0), 30.0, 30.0, vec![Shape::Rectangle(rect)]);

        let children = group.into_absolute_children();
        assert_eq!(children.len(), 1);
        let p = children[0].position();
        assert!((p.x - 120.0).abs() < 1e-9);
        assert!((p.y - 70.0).abs() < 1e-9);
        assert!(children[0].draggable());
    }

    #[test]
    fn test_into_absolute_children_rotated_scaled() {
        let rect = Rectangle::new(Point::new(10.0, 0.0), 10.0, 10.0);
        let mut group = Group::new(Point::new(0.0, 0.0), 20.0, 10.0, vec![Shape::Rectangle(rect)]);
        group.rotation = 90.0;
        group.scale = Vec2::new(2.0, 1.0);

        let children = group.into_absolute_children();
        let p = children[0].position();
        // Local (10, 0) scaled to (20, 0), rotated 90 degrees to (0, 20).
        assert!(p.x.abs() < 1e-9);
        assert!((p.y - 20.0).abs() < 1e-9);
        assert!((children[0].rotation() - 90.0).abs() < 1e-9);
        assert_eq!(children[0].scale(), Vec2::new(2.0, 1.0));
    }

    #[test]
    fn test_into_absolute_children_fresh_ids() {
        let rect = Rectangle::new(Point::new(0.0, 0.0), 10.0, 10.0);
        let original_id = rect.id;
        let group = Group::new(Point::new(0.0, 0.0), 10.0, 10.0, vec![Shape::Rectangle(rect)]);

        let children = group.into_absolute_children();
        assert_ne!(children[0].id(), original_id);
    }

    #[test]
    fn test_all_shape_ids_nested() {
        let rect1 = Rectangle::new(Point::new(0.0, 0.0), 10.0, 10.0);
        let rect2 = Rectangle::new(Point::new(20.0, 0.0), 10.0, 10.0);
        let inner = Group::new(Point::new(0.0, 0.0), 10.0, 10.0, vec![Shape::Rectangle(rect1)]);
        let outer = Group::new(
            Point::new(0.0, 0.0),
            30.0,
            10.0,
            vec![Shape::Group(inner), Shape::Rectangle(rect2)],
        );

        assert_eq!(outer.all_shape_ids().len(), 4);
    }
}
