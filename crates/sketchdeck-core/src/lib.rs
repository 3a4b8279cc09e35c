//! Sketchdeck Core Library
//!
//! Rendering-agnostic scene model and editor state machine for the
//! sketchdeck vector editor: shape creation, selection, transform,
//! grouping, bounded undo/redo history, scene import/export, and the
//! persisted stamp (template) library.

pub mod document;
pub mod error;
pub mod history;
pub mod input;
pub mod render;
pub mod session;
pub mod shapes;
pub mod stamps;
pub mod storage;
pub mod tools;
pub mod view;

pub use document::{CanvasSize, Document};
pub use error::{EditorError, EditorResult};
pub use history::{History, HistoryEntry, DEFAULT_HISTORY_CAPACITY};
pub use input::{command_for_key, Command, Key, Modifiers, PointerEvent};
pub use render::RenderSurface;
pub use session::{EditorSession, TransformUpdate};
pub use shapes::{Color, Shape, ShapeId, ShapeStyle, MIN_SHAPE_EXTENT};
pub use stamps::{StampLibrary, Template, TEMPLATE_STORE_KEY};
pub use storage::{MemoryStore, StoreError, TemplateStore};
pub use tools::{ToolController, ToolKind, ToolState};
pub use view::ViewParams;

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStore;
