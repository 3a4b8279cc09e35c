//! Stamp (template) library: named, reusable shape clusters persisted
//! outside the undo history.

use crate::error::{EditorError, EditorResult};
use crate::shapes::{Group, Shape};
use crate::storage::{StoreError, TemplateStore};
use kurbo::Point;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Namespace key the template list is persisted under.
pub const TEMPLATE_STORE_KEY: &str = "sketchdeck.templates";

/// A named, reusable cluster of shapes with normalized coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    pub shapes: Vec<Shape>,
}

/// The persisted template library.
///
/// The list is read from the store once at construction and written back
/// after every save or delete. Library edits are not undoable through the
/// canvas history.
pub struct StampLibrary {
    templates: Vec<Template>,
    store: Box<dyn TemplateStore>,
}

impl StampLibrary {
    /// Create a library backed by the given store, loading any persisted
    /// templates. A corrupt or unreadable payload logs a warning and starts
    /// the library empty rather than failing the session.
    pub fn new(store: Box<dyn TemplateStore>) -> Self {
        let templates = match store.read(TEMPLATE_STORE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(templates) => templates,
                Err(e) => {
                    warn!("ignoring corrupt template store payload: {e}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("failed to read template store: {e}");
                Vec::new()
            }
        };
        Self { templates, store }
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn get(&self, id: Uuid) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Save the selected shapes as a named template and persist the list.
    ///
    /// Stored coordinates are normalized: a single group contributes its
    /// (already group-local) children, a single shape is reset to the origin,
    /// and multiple shapes are translated by the negative of their union
    /// bounding box's minimum corner. Every stored shape receives fresh ids,
    /// recursively, so templates never alias canvas shapes.
    pub fn save(&mut self, name: &str, selection: &[Shape]) -> EditorResult<Uuid> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditorError::UserInput("template name is empty".to_string()));
        }
        if selection.is_empty() {
            return Err(EditorError::UserInput(
                "select shapes to save as a template".to_string(),
            ));
        }

        let shapes = normalize_for_template(selection);
        let template = Template {
            id: Uuid::new_v4(),
            name: name.to_string(),
            shapes,
        };
        let id = template.id;
        self.templates.push(template);
        self.persist()?;
        debug!("saved template {name:?} ({id})");
        Ok(id)
    }

    /// Remove a template by id and persist the list. Shapes already placed
    /// on the canvas are unaffected.
    pub fn delete(&mut self, id: Uuid) -> EditorResult<()> {
        let before = self.templates.len();
        self.templates.retain(|t| t.id != id);
        if self.templates.len() == before {
            return Err(EditorError::UserInput("no such template".to_string()));
        }
        self.persist()?;
        debug!("deleted template {id}");
        Ok(())
    }

    fn persist(&self) -> EditorResult<()> {
        let json = serde_json::to_string(&self.templates)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.write(TEMPLATE_STORE_KEY, &json)?;
        Ok(())
    }
}

/// Clone the selection into template-local coordinates.
fn normalize_for_template(selection: &[Shape]) -> Vec<Shape> {
    let mut shapes: Vec<Shape> = match selection {
        [Shape::Group(group)] => group.children.clone(),
        [single] => {
            let mut shape = single.clone();
            shape.set_position(Point::new(0.0, 0.0));
            vec![shape]
        }
        many => {
            let mut bbox = many[0].bounds();
            for shape in &many[1..] {
                bbox = bbox.union(shape.bounds());
            }
            many.iter()
                .map(|shape| {
                    let mut shape = shape.clone();
                    let p = shape.position();
                    shape.set_position(Point::new(p.x - bbox.x0, p.y - bbox.y0));
                    shape
                })
                .collect()
        }
    };
    for shape in &mut shapes {
        shape.regenerate_ids();
    }
    shapes
}

/// Build a canvas instance of a template at the given world point.
///
/// A single-shape template is cloned directly (offset by the shape's own
/// normalized position); a multi-shape template is wrapped in a new group at
/// the point, sized from the template shapes' bounding box, with children
/// kept in template-relative coordinates and individually non-draggable.
/// All instances receive fresh ids.
pub fn instantiate(template: &Template, at: Point) -> Option<Shape> {
    match template.shapes.as_slice() {
        [] => None,
        [single] => {
            let mut shape = single.clone();
            shape.regenerate_ids();
            let p = shape.position();
            shape.set_position(Point::new(at.x + p.x, at.y + p.y));
            // Standalone instances are always individually draggable, even
            // when the template was saved from group-local children.
            shape.set_draggable(true);
            Some(shape)
        }
        many => {
            let mut bbox = many[0].bounds();
            for shape in &many[1..] {
                bbox = bbox.union(shape.bounds());
            }
            let children: Vec<Shape> = many
                .iter()
                .map(|shape| {
                    let mut shape = shape.clone();
                    shape.regenerate_ids();
                    shape.set_draggable(false);
                    shape
                })
                .collect();
            let group = Group::new(at, bbox.width(), bbox.height(), children);
            Some(Shape::Group(group))
        }
    }
}
