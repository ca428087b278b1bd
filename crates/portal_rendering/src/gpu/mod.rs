//! # wgpu Backend
//!
//! ```text
//! GpuContext   surface + device + queue, configured at the window's physical size
//! Pipelines    one pipeline per material, shared camera/material bind group layouts
//! GpuRenderer  implements SceneRenderer
//! ```

mod context;
mod pipelines;
mod renderer;

pub use context::GpuContext;
pub use pipelines::{Pipelines, DEPTH_FORMAT};
pub use renderer::GpuRenderer;
