//! Firefly instance buffer.
//!
//! The particle field is packed once into `FireflyInstance` records (one
//! per particle, 16 bytes each) and uploaded as an instance-rate vertex
//! buffer. Each instance expands to a 6-vertex quad in the vertex stage.
//!
//! CPU work per frame: none. Only the uniforms change.

use bytemuck::{Pod, Zeroable};
use portal_core::ParticleField;

use crate::camera::PerspectiveCamera;
use crate::shaders::fireflies::{bob_offset, point_size, VERTICES_PER_SPRITE};
use crate::shaders::MaterialRenderState;
use crate::uniforms::FirefliesUniforms;

/// One firefly as seen by the vertex stage.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct FireflyInstance {
    /// World position.
    pub position: [f32; 3],
    /// Per-particle scale in `[0, 1)`, read as `a_scale`.
    pub scale: f32,
}

impl FireflyInstance {
    /// Size of an instance in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32];

    /// Instance-rate buffer layout.
    #[must_use]
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::SIZE as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// The packed firefly cloud.
#[derive(Debug, Clone, PartialEq)]
pub struct FireflyCloud {
    instances: Vec<FireflyInstance>,
    render_state: MaterialRenderState,
}

impl FireflyCloud {
    /// Packs `field` into instances, preserving particle order.
    #[must_use]
    pub fn from_field(field: &ParticleField) -> Self {
        let instances = field
            .iter()
            .map(|(position, scale)| FireflyInstance { position, scale })
            .collect();
        Self {
            instances,
            render_state: MaterialRenderState::FIREFLIES,
        }
    }

    /// Instances in particle order.
    #[must_use]
    pub fn instances(&self) -> &[FireflyInstance] {
        &self.instances
    }

    /// Bytes for the instance buffer.
    #[must_use]
    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Number of instances to draw.
    #[must_use]
    pub fn instance_count(&self) -> u32 {
        u32::try_from(self.instances.len()).unwrap_or(u32::MAX)
    }

    /// Vertices per instance.
    #[must_use]
    pub const fn vertex_count(&self) -> u32 {
        VERTICES_PER_SPRITE
    }

    /// Blend and depth state of the sprites.
    #[must_use]
    pub const fn render_state(&self) -> MaterialRenderState {
        self.render_state
    }

    /// World position of each sprite at `time`, bob included.
    pub fn animated_positions(&self, time: f32) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.instances.iter().map(move |instance| {
            let [x, y, z] = instance.position;
            [x, y + bob_offset(time, x, instance.scale), z]
        })
    }

    /// On-screen size of each sprite for the given camera and uniforms,
    /// matching what the vertex stage computes.
    pub fn point_sizes<'a>(
        &'a self,
        camera: &'a PerspectiveCamera,
        uniforms: &'a FirefliesUniforms,
    ) -> impl Iterator<Item = f32> + 'a {
        self.animated_positions(uniforms.time)
            .zip(self.instances.iter())
            .map(move |(world, instance)| {
                point_size(uniforms, camera.view_depth(world), instance.scale)
            })
    }
}
