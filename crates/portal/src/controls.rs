//! Orbit camera controls.
//!
//! The camera sits on a sphere around its target. Dragging rotates it,
//! the wheel changes the radius. Rotation is damped: each update applies
//! `damping` of the pending delta and keeps the rest for later frames, so
//! the camera glides to a stop instead of halting.
//!
//! ```text
//! offset = position - target = r * (sin φ sin θ, cos φ, sin φ cos θ)
//! φ ∈ [min_polar, max_polar]     r ∈ [min_distance, max_distance]
//! ```

use std::f32::consts::{FRAC_PI_2, TAU};

use portal_core::CameraConfig;
use portal_rendering::camera::{add, length, sub};
use portal_rendering::{CameraControls, PerspectiveCamera};
use portal_ui::InputState;

/// Smallest polar angle; keeps the camera off the pole.
const POLAR_EPSILON: f32 = 1e-6;
/// Pending rotation below this is dropped.
const SETTLE_EPSILON: f32 = 1e-5;
/// Radius factor per wheel line at `zoom_speed = 1`.
const ZOOM_BASE: f32 = 0.95;

/// Orbit controller with damping.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    /// Fraction of the pending rotation applied per update, in `(0, 1]`.
    pub damping: f32,
    /// Rotation speed multiplier.
    pub rotate_speed: f32,
    /// Zoom speed multiplier.
    pub zoom_speed: f32,
    /// Closest allowed distance to the target.
    pub min_distance: f32,
    /// Farthest allowed distance to the target.
    pub max_distance: f32,
    /// Smallest polar angle (0 looks straight down).
    pub min_polar: f32,
    /// Largest polar angle; `π/2` keeps the camera above the ground.
    pub max_polar: f32,
    pending_theta: f32,
    pending_phi: f32,
    pending_scale: f32,
    viewport_height: f32,
}

impl OrbitControls {
    /// Controls with the limits from the camera config.
    #[must_use]
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            damping: if config.damping > 0.0 { config.damping } else { 1.0 },
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            ..Self::default()
        }
    }

    /// Sets the logical viewport height used to convert pixels to angles.
    pub fn set_viewport_height(&mut self, height: u32) {
        if height > 0 {
            #[allow(clippy::cast_precision_loss)]
            let height = height as f32;
            self.viewport_height = height;
        }
    }

    /// Queues a rotation for a mouse drag of `(dx, dy)` logical pixels.
    ///
    /// A drag the full height of the viewport turns the camera once around.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        let per_pixel = TAU / self.viewport_height * self.rotate_speed;
        self.pending_theta -= dx * per_pixel;
        self.pending_phi -= dy * per_pixel;
    }

    /// Queues a zoom of `lines` wheel lines; positive moves closer.
    pub fn zoom(&mut self, lines: f32) {
        self.pending_scale *= ZOOM_BASE.powf(lines * self.zoom_speed);
    }

    /// Queues the drag and wheel input of the current frame.
    pub fn handle_input(&mut self, input: &InputState) {
        let (dx, dy) = input.drag_delta();
        if dx != 0.0 || dy != 0.0 {
            self.rotate(dx, dy);
        }
        if input.scroll_delta != 0.0 {
            self.zoom(input.scroll_delta);
        }
    }

    /// Whether all queued motion has been applied.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.pending_theta.abs() < SETTLE_EPSILON
            && self.pending_phi.abs() < SETTLE_EPSILON
            && (self.pending_scale - 1.0).abs() < SETTLE_EPSILON
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            damping: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar: 0.0,
            max_polar: FRAC_PI_2,
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_scale: 1.0,
            viewport_height: 720.0,
        }
    }
}

impl CameraControls for OrbitControls {
    fn update(&mut self, camera: &mut PerspectiveCamera) {
        let offset = sub(camera.position, camera.target);
        let radius = length(offset);
        if radius <= f32::EPSILON {
            return;
        }

        let mut theta = offset[0].atan2(offset[2]);
        let mut phi = (offset[1] / radius).clamp(-1.0, 1.0).acos();

        theta += self.pending_theta * self.damping;
        phi += self.pending_phi * self.damping;
        self.pending_theta *= 1.0 - self.damping;
        self.pending_phi *= 1.0 - self.damping;
        if self.pending_theta.abs() < SETTLE_EPSILON {
            self.pending_theta = 0.0;
        }
        if self.pending_phi.abs() < SETTLE_EPSILON {
            self.pending_phi = 0.0;
        }

        let phi = phi
            .clamp(self.min_polar, self.max_polar)
            .clamp(POLAR_EPSILON, std::f32::consts::PI - POLAR_EPSILON);
        let radius = (radius * self.pending_scale).clamp(self.min_distance, self.max_distance);
        self.pending_scale = 1.0;

        let (sin_phi, cos_phi) = phi.sin_cos();
        let (sin_theta, cos_theta) = theta.sin_cos();
        let offset = [
            radius * sin_phi * sin_theta,
            radius * cos_phi,
            radius * sin_phi * cos_theta,
        ];
        camera.position = add(camera.target, offset);
    }
}
