//! # Portal
//!
//! The application layer of the portal scene.
//!
//! ```text
//! PortalConfig ──► ParticleField ──► FireflyCloud ──► renderer
//!
//! scene loader thread ──channel──► poll_scene ──► upload_scene
//!
//! key ──► DebugPanel ──► set_parameter ──► observers ──► uniforms
//!
//! redraw ──► run_frame: clock → uniforms → render → controls
//! ```
//!
//! Everything runs on the event-loop thread except the one-shot scene
//! load, whose result is applied on the next redraw.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod app;
pub mod controls;
pub mod error;
pub mod loading;

pub use app::Application;
pub use controls::OrbitControls;
pub use error::{AppError, AppResult};
pub use loading::{SceneLoadHandle, SceneState};

// Re-export the layers
pub use portal_core as core;
pub use portal_rendering as rendering;
pub use portal_ui as ui;
