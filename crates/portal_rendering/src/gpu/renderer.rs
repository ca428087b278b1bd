//! The `wgpu` implementation of [`SceneRenderer`].

use tracing::{debug, info, warn};
use wgpu::util::DeviceExt;

use crate::camera::PerspectiveCamera;
use crate::effects::FireflyCloud;
use crate::error::{RenderError, RenderResult};
use crate::gpu::{GpuContext, Pipelines, DEPTH_FORMAT};
use crate::integration::{FrameOutcome, SceneRenderer, Viewport};
use crate::scene::{MaterialAssignment, MaterialKind, SceneGraph};
use crate::shaders::{fireflies::VERTICES_PER_SPRITE, scene::POLE_LIGHT_COLOR};
use crate::uniforms::{CameraUniforms, FlatColorUniforms, ShaderUniforms};

struct UniformSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl UniformSlot {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        contents: &[u8],
    ) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self { buffer, bind_group }
    }
}

struct GpuMesh {
    material: MaterialKind,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// Draws the portal scene and the fireflies into a window surface.
///
/// The surface is sized in physical pixels ([`GpuRenderer::resize_surface`]);
/// the camera viewport follows the logical size times the capped pixel ratio
/// ([`SceneRenderer::set_size`], [`SceneRenderer::set_pixel_ratio`]).
pub struct GpuRenderer {
    context: GpuContext,
    pipelines: Pipelines,
    depth_view: wgpu::TextureView,
    camera: UniformSlot,
    portal: UniformSlot,
    fireflies: UniformSlot,
    flat: UniformSlot,
    firefly_instances: wgpu::Buffer,
    firefly_count: u32,
    meshes: Vec<GpuMesh>,
    logical_size: (u32, u32),
    pixel_ratio: f32,
    frames: u64,
}

impl GpuRenderer {
    /// Builds pipelines, uniform buffers and the firefly instance buffer.
    #[must_use]
    pub fn new(context: GpuContext, fireflies: &FireflyCloud, logical_size: (u32, u32)) -> Self {
        let device = &context.device;
        let pipelines = Pipelines::new(device, context.config.format);
        let depth_view = create_depth_view(device, context.config.width, context.config.height);

        let uniforms = ShaderUniforms::default();
        let camera = UniformSlot::new(
            device,
            &pipelines.camera_layout,
            "Camera Uniforms",
            bytemuck::bytes_of(&CameraUniforms::from_camera(
                &PerspectiveCamera::default(),
                1.0,
                1.0,
            )),
        );
        let portal = UniformSlot::new(
            device,
            &pipelines.material_layout,
            "Portal Uniforms",
            bytemuck::bytes_of(&uniforms.portal),
        );
        let fireflies_slot = UniformSlot::new(
            device,
            &pipelines.material_layout,
            "Fireflies Uniforms",
            bytemuck::bytes_of(&uniforms.fireflies),
        );
        let flat = UniformSlot::new(
            device,
            &pipelines.material_layout,
            "Pole Light Uniforms",
            bytemuck::bytes_of(&FlatColorUniforms::opaque(POLE_LIGHT_COLOR)),
        );

        let firefly_instances = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Firefly Instances"),
            contents: fireflies.instance_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        });

        info!(
            fireflies = fireflies.instance_count(),
            adapter = context.adapter_name(),
            "renderer ready"
        );

        Self {
            context,
            pipelines,
            depth_view,
            camera,
            portal,
            fireflies: fireflies_slot,
            flat,
            firefly_instances,
            firefly_count: fireflies.instance_count(),
            meshes: Vec::new(),
            logical_size,
            pixel_ratio: 1.0,
            frames: 0,
        }
    }

    /// Resizes the surface and depth buffer to `width` x `height` physical pixels.
    pub fn resize_surface(&mut self, width: u32, height: u32) {
        if self.context.resize(width, height) {
            self.depth_view = create_depth_view(&self.context.device, width, height);
            debug!(width, height, "surface resized");
        }
    }

    /// Logical size and pixel ratio currently applied to the viewport.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        Viewport::new(self.logical_size.0, self.logical_size.1, self.pixel_ratio)
    }

    /// Number of uploaded scene meshes.
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Frames presented so far.
    #[must_use]
    pub const fn frames_presented(&self) -> u64 {
        self.frames
    }

    /// The underlying GPU context.
    #[must_use]
    pub const fn context(&self) -> &GpuContext {
        &self.context
    }

    fn write_uniforms(&self, uniforms: &ShaderUniforms, camera: &PerspectiveCamera) {
        let (width, height) = self.viewport().drawing_buffer_size(self.pixel_ratio);
        #[allow(clippy::cast_precision_loss)]
        let camera_block = CameraUniforms::from_camera(camera, width as f32, height as f32);

        let queue = &self.context.queue;
        queue.write_buffer(&self.camera.buffer, 0, bytemuck::bytes_of(&camera_block));
        queue.write_buffer(&self.portal.buffer, 0, bytemuck::bytes_of(&uniforms.portal));
        queue.write_buffer(
            &self.fireflies.buffer,
            0,
            bytemuck::bytes_of(&uniforms.fireflies),
        );
    }
}

impl SceneRenderer for GpuRenderer {
    fn render(
        &mut self,
        uniforms: &ShaderUniforms,
        camera: &PerspectiveCamera,
    ) -> RenderResult<FrameOutcome> {
        self.write_uniforms(uniforms, camera);

        let frame = match self.context.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("surface lost, reconfiguring");
                self.context.reconfigure();
                return Ok(FrameOutcome::Skipped);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("surface timeout, skipping frame");
                return Ok(FrameOutcome::Skipped);
            }
            Err(error) => return Err(RenderError::Surface(error.to_string())),
        };

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Portal Frame"),
                });

        let [r, g, b] = uniforms.clear_color.to_linear();
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Portal Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(r),
                            g: f64::from(g),
                            b: f64::from(b),
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.camera.bind_group, &[]);

            for mesh in &self.meshes {
                let material = match mesh.material {
                    MaterialKind::Portal => &self.portal.bind_group,
                    MaterialKind::Baked | MaterialKind::PoleLight => &self.flat.bind_group,
                };
                pass.set_pipeline(self.pipelines.for_material(mesh.material));
                pass.set_bind_group(1, material, &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }

            // Transparent sprites go last so they test against the finished depth buffer.
            pass.set_pipeline(&self.pipelines.fireflies);
            pass.set_bind_group(1, &self.fireflies.bind_group, &[]);
            pass.set_vertex_buffer(0, self.firefly_instances.slice(..));
            pass.draw(0..VERTICES_PER_SPRITE, 0..self.firefly_count);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        self.frames += 1;
        Ok(FrameOutcome::Presented)
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.logical_size = (width, height);
    }

    fn set_pixel_ratio(&mut self, ratio: f32) {
        self.pixel_ratio = ratio;
    }

    fn upload_scene(
        &mut self,
        scene: &SceneGraph,
        materials: &MaterialAssignment,
    ) -> RenderResult<()> {
        let device = &self.context.device;
        let mut meshes = Vec::with_capacity(scene.len());

        for (node, &material) in scene.nodes().iter().zip(&materials.kinds) {
            if node.mesh.is_empty() {
                debug!(node = %node.name, "skipping empty mesh");
                continue;
            }
            let index_count = u32::try_from(node.mesh.indices.len()).map_err(|_| {
                RenderError::SceneLoad {
                    path: node.name.clone(),
                    reason: "index count exceeds u32".into(),
                }
            })?;
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&node.name),
                contents: node.mesh.vertex_bytes(),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&node.name),
                contents: node.mesh.index_bytes(),
                usage: wgpu::BufferUsages::INDEX,
            });
            meshes.push(GpuMesh {
                material,
                vertex_buffer,
                index_buffer,
                index_count,
            });
        }

        info!(
            meshes = meshes.len(),
            triangles = scene.triangle_count(),
            "scene uploaded"
        );
        self.meshes = meshes;
        Ok(())
    }
}

impl std::fmt::Debug for GpuRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuRenderer")
            .field("adapter", &self.context.adapter_name())
            .field("meshes", &self.meshes.len())
            .field("fireflies", &self.firefly_count)
            .field("logical_size", &self.logical_size)
            .field("pixel_ratio", &self.pixel_ratio)
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
