//! Blend and depth state per material.
//!
//! ```text
//! material    blend                        depth
//! baked       REPLACE                      read + write
//! pole light  REPLACE                      read + write
//! portal      REPLACE                      read + write
//! fireflies   ONE + ONE (additive)         read only
//! ```
//!
//! Additive blending is commutative, so the firefly sprites need no sorting
//! and can be drawn in buffer order after the opaque geometry.

/// Blend mode of a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// No blending, the fragment replaces the target.
    Opaque,
    /// ONE + ONE - glowing sprites, order independent.
    Additive,
}

impl BlendMode {
    /// Blend equation for this mode.
    #[must_use]
    pub const fn blend_state(&self) -> Option<BlendStateConfig> {
        match self {
            Self::Opaque => None,
            Self::Additive => Some(BlendStateConfig {
                color_src: BlendFactor::One,
                color_dst: BlendFactor::One,
                alpha_src: BlendFactor::One,
                alpha_dst: BlendFactor::One,
            }),
        }
    }

    /// `wgpu` blend state (`None` means REPLACE).
    #[must_use]
    pub fn to_wgpu(self) -> Option<wgpu::BlendState> {
        self.blend_state().map(BlendStateConfig::to_wgpu)
    }
}

/// Blend factor (mirrors WGPU).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    /// 1
    One,
}

impl BlendFactor {
    const fn to_wgpu(self) -> wgpu::BlendFactor {
        match self {
            Self::One => wgpu::BlendFactor::One,
        }
    }
}

/// Blend equation, always with the ADD operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendStateConfig {
    /// Source factor for colour.
    pub color_src: BlendFactor,
    /// Destination factor for colour.
    pub color_dst: BlendFactor,
    /// Source factor for alpha.
    pub alpha_src: BlendFactor,
    /// Destination factor for alpha.
    pub alpha_dst: BlendFactor,
}

impl BlendStateConfig {
    /// Converts to the `wgpu` descriptor.
    #[must_use]
    pub const fn to_wgpu(self) -> wgpu::BlendState {
        wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: self.color_src.to_wgpu(),
                dst_factor: self.color_dst.to_wgpu(),
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: self.alpha_src.to_wgpu(),
                dst_factor: self.alpha_dst.to_wgpu(),
                operation: wgpu::BlendOperation::Add,
            },
        }
    }
}

/// Depth testing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthMode {
    /// Test and write - opaque geometry.
    ReadWrite,
    /// Test but never write - sprites are hidden by geometry but not by
    /// each other.
    ReadOnly,
}

impl DepthMode {
    /// Whether fragments write depth.
    #[must_use]
    pub const fn writes_depth(&self) -> bool {
        matches!(self, Self::ReadWrite)
    }

    /// `wgpu` depth state against a `format` attachment.
    #[must_use]
    pub fn depth_stencil(self, format: wgpu::TextureFormat) -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format,
            depth_write_enabled: self.writes_depth(),
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }
}

/// Blend + depth for one material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialRenderState {
    /// Blend mode.
    pub blend: BlendMode,
    /// Depth mode.
    pub depth: DepthMode,
}

impl MaterialRenderState {
    /// Opaque geometry.
    pub const OPAQUE: Self = Self {
        blend: BlendMode::Opaque,
        depth: DepthMode::ReadWrite,
    };

    /// Transparent, additive, depth read-only: the firefly sprites.
    pub const FIREFLIES: Self = Self {
        blend: BlendMode::Additive,
        depth: DepthMode::ReadOnly,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_additive_is_one_one() {
        let state = BlendMode::Additive.to_wgpu().unwrap();
        assert_eq!(state.color.src_factor, wgpu::BlendFactor::One);
        assert_eq!(state.color.dst_factor, wgpu::BlendFactor::One);
        assert_eq!(state.color.operation, wgpu::BlendOperation::Add);
        assert_eq!(state.alpha.dst_factor, wgpu::BlendFactor::One);
    }

    #[test]
    fn test_opaque_replaces() {
        assert!(BlendMode::Opaque.to_wgpu().is_none());
        assert!(MaterialRenderState::OPAQUE.blend.blend_state().is_none());
    }

    #[test]
    fn test_fireflies_do_not_write_depth() {
        let depth = MaterialRenderState::FIREFLIES
            .depth
            .depth_stencil(wgpu::TextureFormat::Depth32Float);
        assert!(!depth.depth_write_enabled);
        assert_eq!(depth.depth_compare, wgpu::CompareFunction::LessEqual);

        let opaque = MaterialRenderState::OPAQUE
            .depth
            .depth_stencil(wgpu::TextureFormat::Depth32Float);
        assert!(opaque.depth_write_enabled);
    }
}
