//! # Portal Configuration
//!
//! Loaded once at startup from TOML. Every section and field is optional;
//! missing values fall back to the stock scene.
//!
//! ```toml
//! [particles]
//! count = 50
//! seed = 7            # omit for a fresh field every run
//!
//! [tunables]
//! portal_color_start = "#ffffff"
//! portal_color_end = "#000000"
//! portal_strength = 5.0
//! fireflies_size = 100.0
//! clear_color = "#383e38"
//!
//! [camera]
//! fov_deg = 75.0
//! position = [2.0, 2.0, 2.0]
//!
//! [render]
//! max_pixel_ratio = 2.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::animation::MAX_PIXEL_RATIO;
use crate::error::{PortalError, PortalResult};
use crate::particles::DEFAULT_PARTICLE_COUNT;
use crate::tunables::TunableParameters;

/// Particle field settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Number of fireflies.
    pub count: usize,
    /// Fixed RNG seed; `None` draws from the thread RNG.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_PARTICLE_COUNT,
            seed: None,
        }
    }
}

/// Camera and orbit controller settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
    /// Near clip plane.
    pub near: f32,
    /// Far clip plane.
    pub far: f32,
    /// Initial eye position.
    pub position: [f32; 3],
    /// Orbit target.
    pub target: [f32; 3],
    /// Orbit damping factor (0 disables damping).
    pub damping: f32,
    /// Closest zoom distance.
    pub min_distance: f32,
    /// Farthest zoom distance.
    pub max_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 75.0,
            near: 0.1,
            far: 1000.0,
            position: [2.0, 2.0, 2.0],
            target: [0.0, 0.0, 0.0],
            damping: 0.05,
            min_distance: 1.0,
            max_distance: 20.0,
        }
    }
}

/// Window settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Initial logical width.
    pub width: u32,
    /// Initial logical height.
    pub height: u32,
    /// Window title prefix.
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Portal".to_string(),
        }
    }
}

/// Renderer settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Upper bound for the pixel ratio.
    pub max_pixel_ratio: f32,
    /// Present with vsync (FIFO) instead of immediate mode.
    pub vsync: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_pixel_ratio: MAX_PIXEL_RATIO,
            vsync: true,
        }
    }
}

/// Scene asset settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Path handed to the scene loader.
    pub model_path: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            model_path: "portal.glb".to_string(),
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Particle field.
    pub particles: ParticleConfig,
    /// Initial tunable values.
    pub tunables: TunableParameters,
    /// Camera.
    pub camera: CameraConfig,
    /// Window.
    pub window: WindowConfig,
    /// Renderer.
    pub render: RenderConfig,
    /// Scene asset.
    pub scene: SceneConfig,
}

impl PortalConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidConfig`] for malformed TOML or values
    /// that fail [`PortalConfig::validate`].
    pub fn from_toml_str(text: &str) -> PortalResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| PortalError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Io`] if the file cannot be read, otherwise the
    /// errors of [`PortalConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> PortalResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| PortalError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Serialises back to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidConfig`] if serialisation fails.
    pub fn to_toml_string(&self) -> PortalResult<String> {
        toml::to_string(self).map_err(|e| PortalError::InvalidConfig(e.to_string()))
    }

    /// Checks the values the renderer cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidParticleCount`] for an empty field and
    /// [`PortalError::InvalidConfig`] for bad camera, window or render values.
    pub fn validate(&self) -> PortalResult<()> {
        if self.particles.count == 0 {
            return Err(PortalError::InvalidParticleCount(0));
        }

        let camera = &self.camera;
        if !(camera.fov_deg > 0.0 && camera.fov_deg < 180.0) {
            return Err(invalid(format!(
                "camera.fov_deg must be in (0, 180), got {}",
                camera.fov_deg
            )));
        }
        if !(camera.near > 0.0) {
            return Err(invalid(format!(
                "camera.near must be positive, got {}",
                camera.near
            )));
        }
        if !(camera.far > camera.near) {
            return Err(invalid(format!(
                "camera.far ({}) must be greater than camera.near ({})",
                camera.far, camera.near
            )));
        }
        if !(0.0..1.0).contains(&camera.damping) {
            return Err(invalid(format!(
                "camera.damping must be in [0, 1), got {}",
                camera.damping
            )));
        }
        if !(camera.min_distance > 0.0 && camera.max_distance >= camera.min_distance) {
            return Err(invalid(format!(
                "camera distance limits [{}, {}] are not a valid range",
                camera.min_distance, camera.max_distance
            )));
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(invalid(format!(
                "window size {}x{} must be non-zero",
                self.window.width, self.window.height
            )));
        }

        if !(self.render.max_pixel_ratio > 0.0 && self.render.max_pixel_ratio <= MAX_PIXEL_RATIO) {
            return Err(invalid(format!(
                "render.max_pixel_ratio must be in (0, {MAX_PIXEL_RATIO}], got {}",
                self.render.max_pixel_ratio
            )));
        }

        Ok(())
    }
}

fn invalid(message: String) -> PortalError {
    PortalError::InvalidConfig(message)
}
