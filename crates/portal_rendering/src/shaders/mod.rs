//! WGSL programs and their CPU reference formulas.
//!
//! Three programs, all sharing the camera block at group 0:
//!
//! - **scene** - baked vertex colours (`fs_baked`) and the flat pole lamp
//!   colour (`fs_flat`)
//! - **portal** - radial glow from `color_start` to `color_end`, animated by
//!   `time`, scaled by `strength`
//! - **fireflies** - instanced camera-facing sprites, sized by distance and a
//!   per-particle twinkle
//!
//! Each shader module also exposes the same formulas as plain Rust so the
//! numbers can be checked without a GPU.

pub mod blend;
pub mod fireflies;
pub mod portal;
pub mod scene;

pub use blend::{BlendMode, DepthMode, MaterialRenderState};

/// Camera block prepended to every program (group 0, binding 0).
macro_rules! camera_block {
    () => {
        r"
struct CameraUniforms {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    view_proj: mat4x4<f32>,
    viewport: vec4<f32>,
}

@group(0) @binding(0) var<uniform> camera: CameraUniforms;
"
    };
}
pub(crate) use camera_block;

/// The shader programs of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderProgram {
    /// Baked and flat-colour scene meshes.
    Scene,
    /// Portal glow disc.
    Portal,
    /// Firefly sprites.
    Fireflies,
}

impl ShaderProgram {
    /// All programs.
    pub const ALL: [Self; 3] = [Self::Scene, Self::Portal, Self::Fireflies];

    /// WGSL source.
    #[must_use]
    pub const fn source(self) -> &'static str {
        match self {
            Self::Scene => scene::SCENE_WGSL,
            Self::Portal => portal::PORTAL_WGSL,
            Self::Fireflies => fireflies::FIREFLIES_WGSL,
        }
    }

    /// Debug label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scene => "Scene Shader",
            Self::Portal => "Portal Shader",
            Self::Fireflies => "Fireflies Shader",
        }
    }

    /// Vertex entry point.
    #[must_use]
    pub const fn vertex_entry(self) -> &'static str {
        "vs_main"
    }

    /// Fragment entry points.
    #[must_use]
    pub const fn fragment_entries(self) -> &'static [&'static str] {
        match self {
            Self::Scene => &[scene::BAKED_ENTRY, scene::FLAT_ENTRY],
            Self::Portal | Self::Fireflies => &["fs_main"],
        }
    }

    /// Builds the `wgpu` shader module.
    #[must_use]
    pub fn create_module(self, device: &wgpu::Device) -> wgpu::ShaderModule {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(self.label()),
            source: wgpu::ShaderSource::Wgsl(self.source().into()),
        })
    }
}
