//! # Frame Integration
//!
//! The per-frame update rule and the seams it drives:
//!
//! - `SceneRenderer` - draws the scene with the current uniforms
//! - `CameraControls` - moves the camera after the draw
//! - `RenderLoop` - sample clock, write uniforms, render, update controls

mod render_loop;
mod viewport;

pub use render_loop::{
    CameraControls, FrameOutcome, FrameResult, RenderLoop, RenderLoopConfig, RenderLoopStats,
    SceneRenderer,
};
pub use viewport::Viewport;
