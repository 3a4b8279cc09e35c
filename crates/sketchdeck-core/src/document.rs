//! Scene document: the ordered shape list plus persisted view parameters.

use crate::error::{EditorError, EditorResult};
use crate::shapes::{rects_overlap, Group, Shape, ShapeId};
use crate::view::ViewParams;
use kurbo::{Point, Rect, Size};
use log::debug;
use serde::{Deserialize, Serialize};

/// Extent of the fallback box used when a grouping selection has a degenerate
/// or non-finite bounding box.
const FALLBACK_GROUP_EXTENT: f64 = 10.0;

/// Logical canvas dimensions, persisted in scene files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// A scene document. Shape order is z-order, back to front.
///
/// Serializes to the interchange format:
/// `{ "shapes": [...], "viewParams": {...}, "canvasDimensions": {...} }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub shapes: Vec<Shape>,
    #[serde(default)]
    pub view_params: ViewParams,
    #[serde(default)]
    pub canvas_dimensions: CanvasSize,
}

impl Document {
    /// Create an empty document with default view parameters.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Append a shape at the front of the z-order.
    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn find(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn find_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    pub fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.id() == id)
    }

    /// Remove a shape by id.
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let idx = self.index_of(id)?;
        Some(self.shapes.remove(idx))
    }

    /// Ids of shapes whose bounding boxes overlap the given rectangle (any
    /// overlap counts, not full containment), in z-order.
    pub fn shapes_in_rect(&self, rect: Rect) -> Vec<ShapeId> {
        self.shapes
            .iter()
            .filter(|s| rects_overlap(s.bounds(), rect))
            .map(|s| s.id())
            .collect()
    }

    /// Union bounding box of the given shapes, or None when no id matches.
    pub fn union_bounds(&self, ids: &[ShapeId]) -> Option<Rect> {
        let mut bounds: Option<Rect> = None;
        for shape in self.shapes.iter().filter(|s| ids.contains(&s.id())) {
            let b = shape.bounds();
            bounds = Some(match bounds {
                Some(acc) => acc.union(b),
                None => b,
            });
        }
        bounds
    }

    /// Combine the given shapes into a new group positioned at their union
    /// bounding box's minimum corner, with each child translated into
    /// group-local coordinates and marked non-draggable. The group replaces
    /// its members in the z-order and its id is returned.
    pub fn group_shapes(&mut self, ids: &[ShapeId]) -> EditorResult<ShapeId> {
        if ids.len() < 2 {
            return Err(EditorError::UserInput(
                "select at least two shapes to group".to_string(),
            ));
        }

        let mut members: Vec<(usize, Shape)> = Vec::new();
        for (idx, shape) in self.shapes.iter().enumerate() {
            if ids.contains(&shape.id()) {
                members.push((idx, shape.clone()));
            }
        }
        if members.len() < 2 {
            return Err(EditorError::UserInput(
                "select at least two shapes to group".to_string(),
            ));
        }

        let mut bbox = members[0].1.bounds();
        for (_, shape) in &members[1..] {
            bbox = bbox.union(shape.bounds());
        }
        let finite = bbox.x0.is_finite() && bbox.y0.is_finite() && bbox.x1.is_finite() && bbox.y1.is_finite();
        if !finite || (bbox.width() == 0.0 && bbox.height() == 0.0) {
            bbox = Rect::from_origin_size(
                members[0].1.position(),
                Size::new(FALLBACK_GROUP_EXTENT, FALLBACK_GROUP_EXTENT),
            );
            debug!("degenerate grouping bounds, using fallback box {bbox:?}");
        }

        let origin = Point::new(bbox.x0, bbox.y0);
        let max_idx = members.iter().map(|(idx, _)| *idx).max().unwrap_or(0);
        let count = members.len();

        let children: Vec<Shape> = members
            .into_iter()
            .map(|(_, mut shape)| {
                let p = shape.position();
                shape.set_position(Point::new(p.x - origin.x, p.y - origin.y));
                shape.set_draggable(false);
                shape
            })
            .collect();

        let group = Group::new(origin, bbox.width(), bbox.height(), children);
        let group_id = group.id;

        self.shapes.retain(|s| !ids.contains(&s.id()));
        let insert_at = max_idx.saturating_sub(count - 1).min(self.shapes.len());
        self.shapes.insert(insert_at, Shape::Group(group));

        debug!("grouped {count} shapes into {group_id}");
        Ok(group_id)
    }

    /// Dissolve a group back into its children at the group's z-order slot.
    /// Children come back in absolute coordinates with fresh ids and
    /// `draggable = true`; their ids are returned in order.
    pub fn ungroup_shape(&mut self, id: ShapeId) -> EditorResult<Vec<ShapeId>> {
        let idx = self
            .index_of(id)
            .ok_or_else(|| EditorError::UserInput("no such shape".to_string()))?;
        let group = match &self.shapes[idx] {
            Shape::Group(g) => g.clone(),
            _ => {
                return Err(EditorError::UserInput(
                    "selection is not a group".to_string(),
                ))
            }
        };

        self.shapes.remove(idx);
        let children = group.into_absolute_children();
        let child_ids: Vec<ShapeId> = children.iter().map(|s| s.id()).collect();
        for (offset, child) in children.into_iter().enumerate() {
            self.shapes.insert(idx + offset, child);
        }

        debug!("ungrouped {id} into {} shapes", child_ids.len());
        Ok(child_ids)
    }

    /// Move a shape to a new absolute position.
    pub fn move_shape(&mut self, id: ShapeId, position: Point) -> bool {
        match self.find_mut(id) {
            Some(shape) => {
                shape.set_position(position);
                true
            }
            None => false,
        }
    }

    /// Serialize to the interchange JSON format.
    pub fn to_json(&self) -> EditorResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| EditorError::Format(e.to_string()))
    }

    /// Parse a scene file. The `shapes` key must be present and an array;
    /// `viewParams` and `canvasDimensions` fall back to defaults when absent.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| EditorError::Format(e.to_string()))?;
        match value.get("shapes") {
            None => return Err(EditorError::Format("missing `shapes` array".to_string())),
            Some(shapes) if !shapes.is_array() => {
                return Err(EditorError::Format("`shapes` is not an array".to_string()))
            }
            Some(_) => {}
        }
        serde_json::from_value(value).map_err(|e| EditorError::Format(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Line, Rectangle};
    use kurbo::Vec2;

    fn rect_at(x: f64, y: f64, w: f64, h: f64) -> Shape {
        Shape::Rectangle(Rectangle::new(Point::new(x, y), w, h))
    }

    #[test]
    fn test_push_find_remove() {
        let mut doc = Document::new();
        let shape = rect_at(0.0, 0.0, 10.0, 10.0);
        let id = shape.id();
        doc.push(shape);

        assert_eq!(doc.len(), 1);
        assert!(doc.find(id).is_some());
        assert!(doc.remove(id).is_some());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_group_positions_and_extent() {
        let mut doc = Document::new();
        let a = rect_at(0.0, 0.0, 10.0, 10.0);
        let b = rect_at(20.0, 20.0, 10.0, 10.0);
        let ids = vec![a.id(), b.id()];
        doc.push(a);
        doc.push(b);

        let group_id = doc.group_shapes(&ids).unwrap();
        assert_eq!(doc.len(), 1);

        let group = doc.find(group_id).unwrap().as_group().unwrap();
        assert_eq!(group.position, Point::new(0.0, 0.0));
        assert!((group.width - 30.0).abs() < 1e-9);
        assert!((group.height - 30.0).abs() < 1e-9);
        assert_eq!(group.children[0].position(), Point::new(0.0, 0.0));
        assert_eq!(group.children[1].position(), Point::new(20.0, 20.0));
        assert!(!group.children[0].draggable());
    }

    #[test]
    fn test_group_requires_two_shapes() {
        let mut doc = Document::new();
        let a = rect_at(0.0, 0.0, 10.0, 10.0);
        let ids = vec![a.id()];
        doc.push(a);

        assert!(matches!(
            doc.group_shapes(&ids),
            Err(EditorError::UserInput(_))
        ));
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_group_uses_scaled_extents() {
        let mut doc = Document::new();
        let mut rect = Rectangle::new(Point::new(0.0, 0.0), 10.0, 10.0);
        rect.scale = Vec2::new(2.0, 2.0);
        let a = Shape::Rectangle(rect);
        let b = rect_at(30.0, 0.0, 10.0, 10.0);
        let ids = vec![a.id(), b.id()];
        doc.push(a);
        doc.push(b);

        let group_id = doc.group_shapes(&ids).unwrap();
        let group = doc.find(group_id).unwrap().as_group().unwrap();
        // First rect spans 20x20 when scaled.
        assert!((group.width - 40.0).abs() < 1e-9);
        assert!((group.height - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_group_degenerate_bounds_fallback() {
        let mut doc = Document::new();
        let a = rect_at(50.0, 60.0, 0.0, 0.0);
        let b = rect_at(50.0, 60.0, 0.0, 0.0);
        let ids = vec![a.id(), b.id()];
        doc.push(a);
        doc.push(b);

        let group_id = doc.group_shapes(&ids).unwrap();
        let group = doc.find(group_id).unwrap().as_group().unwrap();
        assert_eq!(group.position, Point::new(50.0, 60.0));
        assert!(group.width > 0.0);
        assert!(group.height > 0.0);
    }

    #[test]
    fn test_ungroup_is_inverse_of_group() {
        let mut doc = Document::new();
        let a = rect_at(0.0, 0.0, 10.0, 10.0);
        let b = rect_at(20.0, 20.0, 10.0, 10.0);
        let ids = vec![a.id(), b.id()];
        doc.push(a);
        doc.push(b);

        let group_id = doc.group_shapes(&ids).unwrap();
        let child_ids = doc.ungroup_shape(group_id).unwrap();

        assert_eq!(child_ids.len(), 2);
        assert_eq!(doc.len(), 2);
        let p0 = doc.shapes[0].position();
        let p1 = doc.shapes[1].position();
        assert!((p0.x - 0.0).abs() < 1e-9 && (p0.y - 0.0).abs() < 1e-9);
        assert!((p1.x - 20.0).abs() < 1e-9 && (p1.y - 20.0).abs() < 1e-9);
        // Restored shapes carry fresh ids and are draggable again.
        assert!(!ids.contains(&child_ids[0]));
        assert!(doc.shapes[0].draggable());
    }

    #[test]
    fn test_ungroup_rejects_non_group() {
        let mut doc = Document::new();
        let a = rect_at(0.0, 0.0, 10.0, 10.0);
        let id = a.id();
        doc.push(a);

        assert!(matches!(
            doc.ungroup_shape(id),
            Err(EditorError::UserInput(_))
        ));
    }

    #[test]
    fn test_shapes_in_rect_any_overlap() {
        let mut doc = Document::new();
        let a = rect_at(0.0, 0.0, 10.0, 10.0);
        let b = rect_at(50.0, 50.0, 10.0, 10.0);
        let a_id = a.id();
        doc.push(a);
        doc.push(b);

        // Marquee only clips the corner of the first shape.
        let hits = doc.shapes_in_rect(Rect::new(8.0, 8.0, 20.0, 20.0));
        assert_eq!(hits, vec![a_id]);
    }

    #[test]
    fn test_union_bounds() {
        let mut doc = Document::new();
        let a = rect_at(0.0, 0.0, 10.0, 10.0);
        let b = rect_at(40.0, 20.0, 10.0, 10.0);
        let ids = vec![a.id(), b.id()];
        doc.push(a);
        doc.push(b);

        let bounds = doc.union_bounds(&ids).unwrap();
        assert_eq!(bounds, Rect::new(0.0, 0.0, 50.0, 30.0));
        assert!(doc.union_bounds(&[]).is_none());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut doc = Document::new();
        doc.push(rect_at(1.0, 2.0, 30.0, 40.0));
        doc.push(Shape::Line(Line::new(
            Point::new(5.0, 5.0),
            Vec2::new(10.0, 0.0),
        )));
        doc.view_params = ViewParams::new(12.0, -7.0, 2.0);
        doc.canvas_dimensions = CanvasSize {
            width: 1024.0,
            height: 768.0,
        };

        let json = doc.to_json().unwrap();
        let restored = Document::from_json(&json).unwrap();
        assert_eq!(doc, restored);
    }

    #[test]
    fn test_json_uses_interchange_field_names() {
        let doc = Document::new();
        let json = doc.to_json().unwrap();
        assert!(json.contains("\"viewParams\""));
        assert!(json.contains("\"canvasDimensions\""));
    }

    #[test]
    fn test_import_missing_shapes_is_format_error() {
        assert!(matches!(
            Document::from_json("{\"viewParams\": {\"x\": 0, \"y\": 0, \"scale\": 1}}"),
            Err(EditorError::Format(_))
        ));
        assert!(matches!(
            Document::from_json("{\"shapes\": 42}"),
            Err(EditorError::Format(_))
        ));
        assert!(matches!(
            Document::from_json("not json"),
            Err(EditorError::Format(_))
        ));
    }

    #[test]
    fn test_import_defaults_for_missing_view() {
        let doc = Document::from_json("{\"shapes\": []}").unwrap();
        assert_eq!(doc.view_params, ViewParams::default());
        assert_eq!(doc.canvas_dimensions, CanvasSize::default());
    }
}
