//! Boundary to the external rendering collaborator.

use crate::error::EditorResult;
use crate::view::ViewParams;

/// The rendering surface the editor session talks to.
///
/// The core never assumes a specific rendering technology: the surface
/// receives the shape list and selection through the embedding layer, and
/// the session only calls back into it for view queries and rasterization.
pub trait RenderSurface {
    /// Current stage pan/zoom.
    fn view(&self) -> ViewParams;

    /// Apply a stage pan/zoom.
    fn set_view(&mut self, view: ViewParams);

    /// Rasterize the current view to encoded PNG bytes.
    ///
    /// Returns `EditorError::SurfaceUnavailable` when the surface is not
    /// ready (e.g. before the first frame).
    fn rasterize_png(&self) -> EditorResult<Vec<u8>>;
}
