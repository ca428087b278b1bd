//! Uniform blocks shared by the CPU and the WGSL shaders.
//!
//! Every struct here is `#[repr(C)]` + `Pod` and padded to WGSL's uniform
//! layout rules (`vec3<f32>` aligns to 16 bytes, so each one is paired with a
//! trailing scalar).
//!
//! Ownership of the fields is split:
//! - `time` and `pixel_ratio` are written by the frame loop only
//! - colours, `strength` and `size` are written by tunable observers only

use bytemuck::{Pod, Zeroable};
use portal_core::{Color, ObserverRegistry, ParameterId, TunableParameters};

use crate::camera::{Mat4, PerspectiveCamera};

/// Portal glow parameters.
///
/// ```wgsl
/// struct PortalUniforms {
///     color_start: vec3<f32>,
///     time: f32,
///     color_end: vec3<f32>,
///     strength: f32,
/// }
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PortalUniforms {
    /// Centre colour (linear RGB).
    pub color_start: [f32; 3],
    /// Seconds since the loop started.
    pub time: f32,
    /// Rim colour (linear RGB).
    pub color_end: [f32; 3],
    /// Glow multiplier.
    pub strength: f32,
}

impl PortalUniforms {
    /// Size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

impl Default for PortalUniforms {
    fn default() -> Self {
        let params = TunableParameters::default();
        Self {
            color_start: params.portal_color_start.to_linear(),
            time: 0.0,
            color_end: params.portal_color_end.to_linear(),
            strength: params.portal_strength,
        }
    }
}

/// Firefly sprite parameters.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FirefliesUniforms {
    /// Seconds since the loop started.
    pub time: f32,
    /// Device pixel ratio after the cap.
    pub pixel_ratio: f32,
    /// Base sprite size in pixels.
    pub size: f32,
    _padding: f32,
}

impl FirefliesUniforms {
    /// Size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Creates the block.
    #[must_use]
    pub const fn new(time: f32, pixel_ratio: f32, size: f32) -> Self {
        Self {
            time,
            pixel_ratio,
            size,
            _padding: 0.0,
        }
    }
}

impl Default for FirefliesUniforms {
    fn default() -> Self {
        Self::new(0.0, 1.0, TunableParameters::default().fireflies_size)
    }
}

/// Camera block bound at group 0 for every pipeline.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraUniforms {
    /// World to view.
    pub view: Mat4,
    /// View to clip.
    pub projection: Mat4,
    /// World to clip.
    pub view_proj: Mat4,
    /// Drawing buffer size in pixels: `(width, height, 1/width, 1/height)`.
    pub viewport: [f32; 4],
}

impl CameraUniforms {
    /// Size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Snapshot of `camera` for a drawing buffer of `width` x `height` pixels.
    #[must_use]
    pub fn from_camera(camera: &PerspectiveCamera, width: f32, height: f32) -> Self {
        let width = width.max(1.0);
        let height = height.max(1.0);
        let view = camera.view();
        let projection = camera.projection();
        Self {
            view,
            projection,
            view_proj: crate::camera::multiply_matrices(projection, view),
            viewport: [width, height, 1.0 / width, 1.0 / height],
        }
    }
}

/// Flat colour for the pole lamps.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FlatColorUniforms {
    /// Linear RGBA.
    pub color: [f32; 4],
}

impl FlatColorUniforms {
    /// Block for an opaque sRGB colour.
    #[must_use]
    pub fn opaque(color: Color) -> Self {
        let [r, g, b] = color.to_linear();
        Self {
            color: [r, g, b, 1.0],
        }
    }
}

/// Everything the renderer reads per frame besides the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderUniforms {
    /// Portal material.
    pub portal: PortalUniforms,
    /// Fireflies material.
    pub fireflies: FirefliesUniforms,
    /// Background colour (sRGB).
    pub clear_color: Color,
}

impl ShaderUniforms {
    /// Uniforms for the given tunables at `time = 0`.
    #[must_use]
    pub fn from_parameters(params: &TunableParameters, pixel_ratio: f32) -> Self {
        let mut uniforms = Self {
            portal: PortalUniforms::default(),
            fireflies: FirefliesUniforms::new(0.0, pixel_ratio, params.fireflies_size),
            clear_color: params.clear_color,
        };
        let mut bindings = Self::bindings();
        bindings.apply_all(params, &mut uniforms);
        uniforms
    }

    /// Writes this frame's time into both shaders.
    pub fn set_time(&mut self, time: f32) {
        self.portal.time = time;
        self.fireflies.time = time;
    }

    /// The standard tunable to uniform bindings.
    ///
    /// Colours are converted to linear space on the way in.
    #[must_use]
    pub fn bindings() -> ObserverRegistry<Self> {
        let mut registry = ObserverRegistry::new();
        registry
            .on_change(ParameterId::PortalColorStart, |value, u: &mut Self| {
                if let Some(color) = value.as_color() {
                    u.portal.color_start = color.to_linear();
                }
            })
            .on_change(ParameterId::PortalColorEnd, |value, u: &mut Self| {
                if let Some(color) = value.as_color() {
                    u.portal.color_end = color.to_linear();
                }
            })
            .on_change(ParameterId::PortalStrength, |value, u: &mut Self| {
                if let Some(strength) = value.as_scalar() {
                    u.portal.strength = strength;
                }
            })
            .on_change(ParameterId::FirefliesSize, |value, u: &mut Self| {
                if let Some(size) = value.as_scalar() {
                    u.fireflies.size = size;
                }
            })
            .on_change(ParameterId::ClearColor, |value, u: &mut Self| {
                if let Some(color) = value.as_color() {
                    u.clear_color = color;
                }
            });
        registry
    }
}

impl Default for ShaderUniforms {
    fn default() -> Self {
        Self::from_parameters(&TunableParameters::default(), 1.0)
    }
}
