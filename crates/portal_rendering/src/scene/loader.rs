//! Scene loading seam.

use crate::error::RenderResult;
use crate::scene::SceneGraph;

/// Produces the scene graph for a model path.
///
/// Loading runs once, off the render thread, before the scene is drawn.
pub trait SceneLoader {
    /// Loads the scene at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RenderError::SceneLoad`] when the scene cannot be
    /// produced.
    fn load(&self, path: &str) -> RenderResult<SceneGraph>;
}
