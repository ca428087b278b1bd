//! # Application Error Types

use portal_core::PortalError;
use portal_rendering::RenderError;
use thiserror::Error;

/// Errors surfaced by [`crate::Application`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Core state rejected an operation (bad config, wrong value kind).
    #[error(transparent)]
    Core(#[from] PortalError),

    /// The renderer failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// A worker thread could not be started.
    #[error("failed to spawn {name} thread: {reason}")]
    Spawn {
        /// Thread name.
        name: &'static str,
        /// OS error text.
        reason: String,
    },
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;
