//! Surface, device and queue.

use tracing::info;

use crate::error::{RenderError, RenderResult};

/// The GPU objects every other part of the backend borrows.
#[derive(Debug)]
pub struct GpuContext {
    /// Window surface.
    pub surface: wgpu::Surface<'static>,
    /// Logical device.
    pub device: wgpu::Device,
    /// Submission queue.
    pub queue: wgpu::Queue,
    /// Current surface configuration.
    pub config: wgpu::SurfaceConfiguration,
    adapter_name: String,
}

impl GpuContext {
    /// Opens a device for `window` and configures its surface at
    /// `width` x `height` physical pixels.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::CreateSurface`], [`RenderError::NoAdapter`] or
    /// [`RenderError::RequestDevice`] when the corresponding step fails.
    pub async fn new<W>(window: W, width: u32, height: u32, vsync: bool) -> RenderResult<Self>
    where
        W: wgpu::WindowHandle + 'static,
    {
        // Only Vulkan is compiled in among the primary backends (default features are off).
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            dx12_shader_compiler: wgpu::Dx12Compiler::Fxc,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| RenderError::CreateSurface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;

        let adapter_name = adapter.get_info().name;
        info!(adapter = %adapter_name, "GPU adapter selected");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Portal"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                },
                None,
            )
            .await
            .map_err(|e| RenderError::RequestDevice(e.to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or_else(|| RenderError::CreateSurface("surface reports no formats".into()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: if vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        info!(?format, width = config.width, height = config.height, "surface configured");

        Ok(Self {
            surface,
            device,
            queue,
            config,
            adapter_name,
        })
    }

    /// Resizes the surface; zero sizes (minimised window) are ignored.
    ///
    /// Returns whether the surface was reconfigured.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.config.width = width;
        self.config.height = height;
        self.reconfigure();
        true
    }

    /// Re-applies the current configuration (after a lost surface).
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Name of the adapter in use.
    #[must_use]
    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }
}
