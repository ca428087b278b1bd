//! Render pipelines for every material.

use crate::effects::FireflyInstance;
use crate::scene::{MaterialKind, SceneVertex};
use crate::shaders::{scene, MaterialRenderState, ShaderProgram};

/// Depth attachment format.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Bind group layouts and one pipeline per material.
#[derive(Debug)]
pub struct Pipelines {
    /// Group 0: the camera block.
    pub camera_layout: wgpu::BindGroupLayout,
    /// Group 1: the material block.
    pub material_layout: wgpu::BindGroupLayout,
    /// Baked vertex-colour meshes.
    pub baked: wgpu::RenderPipeline,
    /// Flat-colour pole lamps.
    pub flat: wgpu::RenderPipeline,
    /// Portal glow.
    pub portal: wgpu::RenderPipeline,
    /// Firefly sprites.
    pub fireflies: wgpu::RenderPipeline,
}

impl Pipelines {
    /// Compiles every program and builds the pipelines for `color_format`.
    #[must_use]
    pub fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> Self {
        let camera_layout = uniform_layout(device, "Camera Bind Group Layout");
        let material_layout = uniform_layout(device, "Material Bind Group Layout");

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Portal Pipeline Layout"),
            bind_group_layouts: &[&camera_layout, &material_layout],
            push_constant_ranges: &[],
        });

        let scene_module = ShaderProgram::Scene.create_module(device);
        let portal_module = ShaderProgram::Portal.create_module(device);
        let fireflies_module = ShaderProgram::Fireflies.create_module(device);

        let builder = PipelineBuilder {
            device,
            layout: &layout,
            color_format,
        };

        let baked = builder.build(
            "Baked Pipeline",
            &scene_module,
            scene::BAKED_ENTRY,
            SceneVertex::desc(),
            MaterialRenderState::OPAQUE,
        );
        let flat = builder.build(
            "Pole Light Pipeline",
            &scene_module,
            scene::FLAT_ENTRY,
            SceneVertex::desc(),
            MaterialRenderState::OPAQUE,
        );
        let portal = builder.build(
            "Portal Pipeline",
            &portal_module,
            "fs_main",
            SceneVertex::desc(),
            MaterialRenderState::OPAQUE,
        );
        let fireflies = builder.build(
            "Fireflies Pipeline",
            &fireflies_module,
            "fs_main",
            FireflyInstance::desc(),
            MaterialRenderState::FIREFLIES,
        );

        Self {
            camera_layout,
            material_layout,
            baked,
            flat,
            portal,
            fireflies,
        }
    }

    /// Pipeline for a scene material.
    #[must_use]
    pub const fn for_material(&self, kind: MaterialKind) -> &wgpu::RenderPipeline {
        match kind {
            MaterialKind::Baked => &self.baked,
            MaterialKind::PoleLight => &self.flat,
            MaterialKind::Portal => &self.portal,
        }
    }
}

fn uniform_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

struct PipelineBuilder<'a> {
    device: &'a wgpu::Device,
    layout: &'a wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
}

impl PipelineBuilder<'_> {
    fn build(
        &self,
        label: &str,
        module: &wgpu::ShaderModule,
        fragment_entry: &str,
        buffer: wgpu::VertexBufferLayout<'static>,
        state: MaterialRenderState,
    ) -> wgpu::RenderPipeline {
        self.device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(self.layout),
                vertex: wgpu::VertexState {
                    module,
                    entry_point: "vs_main",
                    buffers: &[buffer],
                },
                fragment: Some(wgpu::FragmentState {
                    module,
                    entry_point: fragment_entry,
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.color_format,
                        blend: state.blend.to_wgpu(),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(state.depth.depth_stencil(DEPTH_FORMAT)),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
            })
    }
}
