//! Editor session: the state machine driving selection, tools, history, and
//! the stamp library.

use crate::document::Document;
use crate::error::{EditorError, EditorResult};
use crate::history::{History, HistoryEntry};
use crate::input::{command_for_key, Command, Key, Modifiers, PointerEvent};
use crate::render::RenderSurface;
use crate::shapes::{Shape, ShapeId, ShapeStyle, MIN_SHAPE_EXTENT};
use crate::stamps::{self, StampLibrary};
use crate::storage::TemplateStore;
use crate::tools::{ToolController, ToolKind, ToolState};
use kurbo::{Point, Vec2};
use log::{debug, info, warn};
use uuid::Uuid;

/// Resulting geometry of a transform handle release, as reported by the
/// render surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformUpdate {
    pub position: Point,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Scale factor accumulated by the handles; baked into the shape's
    /// stored geometry on commit.
    pub scale: Vec2,
}

/// The editor session owns the scene document, the history log, the current
/// selection, the tool state, and the stamp library. All mutations of the
/// shape list flow through the history commit in one synchronous step, so a
/// snapshot is never observed half-applied.
pub struct EditorSession {
    pub document: Document,
    pub tools: ToolController,
    pub stamps: StampLibrary,
    history: History,
    selection: Vec<ShapeId>,
}

impl EditorSession {
    /// Create a session with an empty document, seeding the history with the
    /// initial scene and loading the persisted template library.
    pub fn new(store: Box<dyn TemplateStore>) -> Self {
        Self::with_document(Document::new(), store)
    }

    /// Create a session around an existing document.
    pub fn with_document(document: Document, store: Box<dyn TemplateStore>) -> Self {
        let history = History::new(HistoryEntry::new(document.shapes.clone(), Vec::new()));
        Self {
            document,
            tools: ToolController::new(),
            stamps: StampLibrary::new(store),
            history,
            selection: Vec::new(),
        }
    }

    /// Record the current shapes and selection as a history entry.
    fn commit(&mut self) {
        self.history
            .commit(self.document.shapes.clone(), self.selection.clone());
    }

    pub fn selection(&self) -> &[ShapeId] {
        &self.selection
    }

    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selection.contains(&id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn select_all(&mut self) {
        self.selection = self.document.shapes.iter().map(|s| s.id()).collect();
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Switch the active tool. Picking a shape-creating tool clears the
    /// selection (the cleared selection is recorded with the next commit, not
    /// as its own history entry).
    pub fn set_tool(&mut self, tool: ToolKind) {
        if tool.creates_shapes() {
            self.selection.clear();
        }
        self.tools.set_tool(tool);
    }

    /// Pointer pressed on the stage.
    pub fn pointer_down(&mut self, event: PointerEvent) {
        let world = self.document.view_params.screen_to_world(event.position);

        if let Some(template) = self.tools.placing_template().cloned() {
            self.place_stamp(&template, world);
            return;
        }

        if self.tools.current.creates_shapes() {
            self.tools.begin_draw(world);
            return;
        }

        if self.tools.current != ToolKind::Select {
            return;
        }

        match event.target {
            Some(id) if self.document.find(id).is_some() => {
                if event.modifiers.command() {
                    // Modifier-click toggles membership.
                    if let Some(pos) = self.selection.iter().position(|&s| s == id) {
                        self.selection.remove(pos);
                    } else {
                        self.selection.push(id);
                    }
                } else {
                    self.selection = vec![id];
                }
            }
            Some(id) => {
                warn!("pointer event targeted unknown shape {id}");
            }
            None => {
                self.selection.clear();
                self.tools.begin_marquee(world);
            }
        }
    }

    /// Pointer moved on the stage.
    pub fn pointer_move(&mut self, event: PointerEvent) {
        let world = self.document.view_params.screen_to_world(event.position);
        if matches!(self.tools.state, ToolState::Drawing { .. }) {
            self.tools.update_draw(world);
        } else if matches!(self.tools.state, ToolState::Marquee { .. }) {
            self.tools.update_marquee(world);
        }
    }

    /// Pointer released on the stage.
    pub fn pointer_up(&mut self, event: PointerEvent) {
        let world = self.document.view_params.screen_to_world(event.position);
        if matches!(self.tools.state, ToolState::Drawing { .. }) {
            if let Some(shape) = self.tools.finish_draw(world) {
                let id = shape.id();
                self.document.push(shape);
                self.selection = vec![id];
                self.commit();
                debug!("finalized drawn shape {id}");
            }
            // Back to the select tool whether or not the gesture produced a
            // shape.
            self.tools.set_tool(ToolKind::Select);
        } else if matches!(self.tools.state, ToolState::Marquee { .. }) {
            if let Some(rect) = self.tools.finish_marquee() {
                self.selection = self.document.shapes_in_rect(rect);
                debug!("marquee selected {} shapes", self.selection.len());
            }
        }
    }

    fn place_stamp(&mut self, template: &stamps::Template, world: Point) {
        match stamps::instantiate(template, world) {
            Some(shape) => {
                let id = shape.id();
                self.document.push(shape);
                self.selection = vec![id];
                self.commit();
                info!("placed template {:?} as {id}", template.name);
            }
            None => warn!("template {:?} holds no shapes", template.name),
        }
        self.tools.set_tool(ToolKind::Select);
    }

    /// A shape drag finished; commit its new position.
    pub fn drag_end(&mut self, id: ShapeId, position: Point) {
        if self.document.move_shape(id, position) {
            self.commit();
        } else {
            warn!("drag end for unknown shape {id}");
        }
    }

    /// A transform handle was released; commit the resulting geometry with
    /// the scale factor baked into width/height (or point coordinates), so
    /// shapes never persist a non-unit scale. A transform that would shrink
    /// the shape below the minimum extent is rejected and the prior geometry
    /// kept.
    pub fn transform_end(&mut self, id: ShapeId, update: TransformUpdate) {
        let Some(shape) = self.document.find(id) else {
            warn!("transform end for unknown shape {id}");
            return;
        };

        let mut updated = shape.clone();
        updated.set_position(update.position);
        updated.set_rotation(update.rotation);
        updated.set_scale(update.scale);
        updated.bake_scale();

        if !meets_minimum_extent(&updated) {
            debug!("rejecting transform of {id} below minimum extent");
            return;
        }

        if let Some(slot) = self.document.find_mut(id) {
            *slot = updated;
            self.commit();
        }
    }

    /// Replace a shape's style properties (single-shape property editing).
    pub fn update_style(&mut self, id: ShapeId, style: ShapeStyle) -> EditorResult<()> {
        let shape = self
            .document
            .find_mut(id)
            .ok_or_else(|| EditorError::UserInput("no such shape".to_string()))?;
        match shape.style_mut() {
            Some(slot) => {
                *slot = style;
                self.commit();
                Ok(())
            }
            None => Err(EditorError::UserInput(
                "groups have no style of their own".to_string(),
            )),
        }
    }

    /// Set a shape's opacity (clamped to 0..=1).
    pub fn update_opacity(&mut self, id: ShapeId, opacity: f64) -> EditorResult<()> {
        let shape = self
            .document
            .find_mut(id)
            .ok_or_else(|| EditorError::UserInput("no such shape".to_string()))?;
        shape.set_opacity(opacity);
        self.commit();
        Ok(())
    }

    /// Step the history back one entry and apply it.
    pub fn undo(&mut self) -> bool {
        match self.history.undo().cloned() {
            Some(entry) => {
                self.document.shapes = entry.shapes;
                self.selection = entry.selection;
                true
            }
            None => false,
        }
    }

    /// Step the history forward one entry and apply it.
    pub fn redo(&mut self) -> bool {
        match self.history.redo().cloned() {
            Some(entry) => {
                self.document.shapes = entry.shapes;
                self.selection = entry.selection;
                true
            }
            None => false,
        }
    }

    /// Group the current selection into a single group shape.
    pub fn group_selected(&mut self) -> EditorResult<ShapeId> {
        let ids = self.selection.clone();
        let group_id = self.document.group_shapes(&ids)?;
        self.selection = vec![group_id];
        self.commit();
        Ok(group_id)
    }

    /// Ungroup the currently selected group back into its children.
    pub fn ungroup_selected(&mut self) -> EditorResult<Vec<ShapeId>> {
        let [id] = self.selection.as_slice() else {
            return Err(EditorError::UserInput(
                "select exactly one group to ungroup".to_string(),
            ));
        };
        let children = self.document.ungroup_shape(*id)?;
        self.selection = children.clone();
        self.commit();
        Ok(children)
    }

    /// Delete the selected shapes.
    pub fn delete_selected(&mut self) -> EditorResult<()> {
        if self.selection.is_empty() {
            return Err(EditorError::UserInput("nothing selected".to_string()));
        }
        for id in std::mem::take(&mut self.selection) {
            self.document.remove(id);
        }
        self.commit();
        Ok(())
    }

    /// Save the current selection as a named template.
    pub fn save_stamp(&mut self, name: &str) -> EditorResult<Uuid> {
        let selected: Vec<Shape> = self
            .document
            .shapes
            .iter()
            .filter(|s| self.selection.contains(&s.id()))
            .cloned()
            .collect();
        self.stamps.save(name, &selected)
    }

    /// Remove a template from the library. Shapes already placed from it are
    /// unaffected.
    pub fn delete_stamp(&mut self, id: Uuid) -> EditorResult<()> {
        self.stamps.delete(id)
    }

    /// Arm placement of the given template; the next pointer-down places an
    /// instance.
    pub fn begin_stamp_placement(&mut self, template_id: Uuid) -> EditorResult<()> {
        let template = self
            .stamps
            .get(template_id)
            .cloned()
            .ok_or_else(|| EditorError::UserInput("no such template".to_string()))?;
        self.tools.begin_placement(template);
        Ok(())
    }

    /// Leave stamp placement without mutating the scene.
    pub fn cancel_stamp_placement(&mut self) {
        if self.tools.placing_template().is_some() {
            self.tools.set_tool(ToolKind::Select);
            debug!("stamp placement cancelled");
        }
    }

    /// Serialize the scene to the interchange JSON format.
    pub fn export_json(&self) -> EditorResult<String> {
        self.document.to_json()
    }

    /// Replace the scene with an imported document. On success the history is
    /// reset to a single entry with an empty selection; on failure nothing is
    /// mutated.
    pub fn import_json(&mut self, json: &str) -> EditorResult<()> {
        let document = Document::from_json(json)?;
        self.history
            .reset(HistoryEntry::new(document.shapes.clone(), Vec::new()));
        self.document = document;
        self.selection.clear();
        self.tools.set_tool(ToolKind::Select);
        info!("imported scene with {} shapes", self.document.len());
        Ok(())
    }

    /// Rasterize the current view through the render surface.
    pub fn export_png(&self, surface: &dyn RenderSurface) -> EditorResult<Vec<u8>> {
        surface.rasterize_png()
    }

    /// Dispatch a keyboard shortcut. Returns whether the key mapped to a
    /// command; command failures (e.g. grouping a single shape) surface as
    /// errors with the state unchanged.
    pub fn handle_key(
        &mut self,
        key: Key,
        modifiers: Modifiers,
        text_input_focused: bool,
    ) -> EditorResult<bool> {
        let Some(command) = command_for_key(key, modifiers, text_input_focused) else {
            return Ok(false);
        };
        match command {
            Command::Undo => {
                self.undo();
            }
            Command::Redo => {
                self.redo();
            }
            Command::Group => {
                self.group_selected()?;
            }
            Command::Ungroup => {
                self.ungroup_selected()?;
            }
            Command::DeleteSelection => {
                self.delete_selected()?;
            }
            Command::SelectAll => self.select_all(),
            Command::CancelPlacement => self.cancel_stamp_placement(),
        }
        Ok(true)
    }
}

/// Post-commit size floor: box shapes must keep at least the minimum extent
/// on each axis, point-sequence shapes at least the minimum path length.
fn meets_minimum_extent(shape: &Shape) -> bool {
    match shape {
        Shape::Rectangle(s) => s.width >= MIN_SHAPE_EXTENT && s.height >= MIN_SHAPE_EXTENT,
        Shape::Ellipse(s) => s.width >= MIN_SHAPE_EXTENT && s.height >= MIN_SHAPE_EXTENT,
        Shape::Text(s) => s.width >= MIN_SHAPE_EXTENT && s.height >= MIN_SHAPE_EXTENT,
        Shape::Group(s) => s.width >= MIN_SHAPE_EXTENT && s.height >= MIN_SHAPE_EXTENT,
        Shape::Line(s) => s.length() >= MIN_SHAPE_EXTENT,
        Shape::Polyline(s) => s.length() >= MIN_SHAPE_EXTENT,
        Shape::Polygon(s) => s.length() >= MIN_SHAPE_EXTENT,
    }
}
