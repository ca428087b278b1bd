//! # Portal Rendering
//!
//! Everything between the core state and the screen:
//!
//! - **Shaders** - the portal glow and firefly sprite programs, with CPU
//!   reference formulas for both
//! - **Uniforms** - the `#[repr(C)]` blocks those programs read
//! - **Scene** - named meshes, material assignment by node name, and the
//!   procedural portal scene
//! - **Integration** - the per-frame update rule and resize handling
//! - **GPU** - the `wgpu` renderer behind [`SceneRenderer`]
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        FRAME                                │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Clock → AnimationState → ShaderUniforms::set_time          │
//! │       ↓                                                     │
//! │  GpuRenderer: camera block → scene meshes → fireflies       │
//! │       ↓                                                     │
//! │  CameraControls::update                                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//!
//! - Uniform writes land before the draw of the same frame
//! - The particle field is uploaded once and never mutated
//! - Pixel ratio is capped before it reaches the surface or a shader

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod camera;
pub mod effects;
pub mod error;
pub mod gpu;
pub mod integration;
pub mod scene;
pub mod shaders;
pub mod uniforms;

pub use camera::PerspectiveCamera;
pub use effects::{FireflyCloud, FireflyInstance};
pub use error::{RenderError, RenderResult};
pub use gpu::{GpuContext, GpuRenderer};
pub use integration::{
    CameraControls, FrameOutcome, FrameResult, RenderLoop, RenderLoopConfig, RenderLoopStats,
    SceneRenderer, Viewport,
};
pub use scene::{
    assign_materials, MaterialAssignment, MaterialKind, ProceduralPortalScene, SceneGraph,
    SceneLoader,
};
pub use shaders::{BlendMode, DepthMode, MaterialRenderState, ShaderProgram};
pub use uniforms::{
    CameraUniforms, FirefliesUniforms, FlatColorUniforms, PortalUniforms, ShaderUniforms,
};
