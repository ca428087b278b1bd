//! Firefly Particle Field
//!
//! One-shot generation of the firefly cloud: `count` positions inside a box
//! hovering over the ground plane, and one random scale per particle.
//!
//! The field is built once at startup and handed to the renderer, which
//! uploads it verbatim. Nothing mutates it afterwards; all animation happens
//! in the shader from `time` and the per-particle scale.
//!
//! ```text
//!   x = (U - 0.5) * 4    [-2, 2)
//!   y =  U * 1.9         [0, 1.9)
//!   z = (U - 0.5) * 4    [-2, 2)
//!   scale = U            [0, 1)
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{PortalError, PortalResult};

/// Number of fireflies in the stock scene.
pub const DEFAULT_PARTICLE_COUNT: usize = 50;
/// Half the side of the square footprint the fireflies spawn over.
pub const FIELD_HALF_EXTENT: f32 = 2.0;
/// Upper bound of the spawn height, keeps the cloud under the arch.
pub const FIELD_HEIGHT: f32 = 1.9;

/// Axis-aligned spawn volume of the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleBounds {
    /// Inclusive lower corner.
    pub min: [f32; 3],
    /// Upper corner.
    pub max: [f32; 3],
}

impl ParticleBounds {
    /// The volume `generate` samples from.
    pub const SPAWN: Self = Self {
        min: [-FIELD_HALF_EXTENT, 0.0, -FIELD_HALF_EXTENT],
        max: [FIELD_HALF_EXTENT, FIELD_HEIGHT, FIELD_HALF_EXTENT],
    };

    /// Whether `p` lies inside the bounds (both ends inclusive).
    #[must_use]
    pub fn contains(&self, p: [f32; 3]) -> bool {
        (0..3).all(|axis| p[axis] >= self.min[axis] && p[axis] <= self.max[axis])
    }
}

/// Immutable firefly cloud: parallel-indexed positions and scales.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleField {
    positions: Vec<[f32; 3]>,
    scales: Vec<f32>,
}

impl ParticleField {
    /// Generates `count` particles from the thread RNG.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidParticleCount`] when `count` is zero.
    pub fn generate(count: usize) -> PortalResult<Self> {
        Self::generate_with(count, &mut rand::thread_rng())
    }

    /// Generates `count` particles from a seeded [`StdRng`].
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidParticleCount`] when `count` is zero.
    pub fn generate_seeded(count: usize, seed: u64) -> PortalResult<Self> {
        Self::generate_with(count, &mut StdRng::seed_from_u64(seed))
    }

    /// Generates `count` particles from the given RNG.
    ///
    /// Draw order per particle is x, y, z, scale.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidParticleCount`] when `count` is zero.
    pub fn generate_with<R: Rng>(count: usize, rng: &mut R) -> PortalResult<Self> {
        if count == 0 {
            return Err(PortalError::InvalidParticleCount(count));
        }

        let mut positions = Vec::with_capacity(count);
        let mut scales = Vec::with_capacity(count);
        for _ in 0..count {
            let x = (rng.gen::<f32>() - 0.5) * FIELD_HALF_EXTENT * 2.0;
            let y = rng.gen::<f32>() * FIELD_HEIGHT;
            let z = (rng.gen::<f32>() - 0.5) * FIELD_HALF_EXTENT * 2.0;
            positions.push([x, y, z]);
            scales.push(rng.gen::<f32>());
        }

        tracing::debug!(count, "generated firefly field");
        Ok(Self { positions, scales })
    }

    /// Builds a field from explicit buffers.
    ///
    /// # Errors
    ///
    /// Fails if the buffers are empty or have different lengths.
    pub fn from_parts(positions: Vec<[f32; 3]>, scales: Vec<f32>) -> PortalResult<Self> {
        if positions.len() != scales.len() {
            return Err(PortalError::MismatchedParticleBuffers {
                positions: positions.len(),
                scales: scales.len(),
            });
        }
        if positions.is_empty() {
            return Err(PortalError::InvalidParticleCount(0));
        }
        Ok(Self { positions, scales })
    }

    /// Number of particles.
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.positions.len()
    }

    /// Particle positions, one `[x, y, z]` per particle.
    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    /// Per-particle scales in `[0, 1)`.
    #[inline]
    #[must_use]
    pub fn scales(&self) -> &[f32] {
        &self.scales
    }

    /// Iterates `(position, scale)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = ([f32; 3], f32)> + '_ {
        self.positions.iter().copied().zip(self.scales.iter().copied())
    }

    /// Raw bytes of the position buffer (3 floats per particle).
    #[must_use]
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Raw bytes of the scale buffer (1 float per particle).
    #[must_use]
    pub fn scale_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.scales)
    }
}
