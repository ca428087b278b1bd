//! # Rendering Error Types

use portal_core::PortalError;
use thiserror::Error;

/// Errors that can occur while setting up or driving the renderer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The window surface could not be created.
    #[error("failed to create surface: {0}")]
    CreateSurface(String),

    /// No adapter is compatible with the surface.
    #[error("no compatible GPU adapter found")]
    NoAdapter,

    /// The adapter refused to open a device.
    #[error("failed to request device: {0}")]
    RequestDevice(String),

    /// Acquiring or presenting a frame failed in a way a reconfigure cannot fix.
    #[error("surface error: {0}")]
    Surface(String),

    /// The scene could not be loaded.
    #[error("failed to load scene {path}: {reason}")]
    SceneLoad {
        /// Model path handed to the loader.
        path: String,
        /// Why loading failed.
        reason: String,
    },

    /// A node the materials depend on is missing from the scene.
    #[error("scene has no node named {0}")]
    MissingNode(String),

    /// A core operation failed.
    #[error(transparent)]
    Core(#[from] PortalError),
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
