//! Perspective camera and the small amount of matrix math the renderer needs.
//!
//! Matrices are column-major `[[f32; 4]; 4]` (`m[column][row]`), the layout
//! WGSL expects for `mat4x4<f32>`. Projection maps depth to wgpu's `[0, 1]`.

use portal_core::CameraConfig;

/// Column-major 4x4 matrix.
pub type Mat4 = [[f32; 4]; 4];

/// Identity matrix.
pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// `a - b`.
#[must_use]
pub fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// `a + b`.
#[must_use]
pub fn add(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// Cross product.
#[must_use]
pub fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Dot product.
#[must_use]
pub fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Euclidean length.
#[must_use]
pub fn length(v: [f32; 3]) -> f32 {
    dot(v, v).sqrt()
}

/// Unit vector along `v`; degenerate input returns +Y.
#[must_use]
pub fn normalize(v: [f32; 3]) -> [f32; 3] {
    let l = length(v);
    if l < 1e-10 {
        return [0.0, 1.0, 0.0];
    }
    [v[0] / l, v[1] / l, v[2] / l]
}

/// Right-handed view matrix looking from `eye` at `target`.
#[must_use]
pub fn look_at(eye: [f32; 3], target: [f32; 3], up: [f32; 3]) -> Mat4 {
    let f = normalize(sub(target, eye));
    let r = normalize(cross(f, up));
    let u = cross(r, f);

    [
        [r[0], u[0], -f[0], 0.0],
        [r[1], u[1], -f[1], 0.0],
        [r[2], u[2], -f[2], 0.0],
        [-dot(r, eye), -dot(u, eye), dot(f, eye), 1.0],
    ]
}

/// Perspective projection, `fov_y` in radians, depth mapped to `[0, 1]`.
#[must_use]
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov_y / 2.0).tan();
    [
        [f / aspect, 0.0, 0.0, 0.0],
        [0.0, f, 0.0, 0.0],
        [0.0, 0.0, far / (near - far), -1.0],
        [0.0, 0.0, (near * far) / (near - far), 0.0],
    ]
}

/// `a * b`.
#[must_use]
pub fn multiply_matrices(a: Mat4, b: Mat4) -> Mat4 {
    let mut result = [[0.0; 4]; 4];
    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                result[i][j] += a[k][j] * b[i][k];
            }
        }
    }
    result
}

/// `m * (p, 1)`.
#[must_use]
pub fn transform_point(m: &Mat4, p: [f32; 3]) -> [f32; 4] {
    let mut out = [0.0; 4];
    for (row, value) in out.iter_mut().enumerate() {
        *value = m[0][row] * p[0] + m[1][row] * p[1] + m[2][row] * p[2] + m[3][row];
    }
    out
}

/// Perspective camera with a look-at target.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width over height.
    pub aspect: f32,
    /// Near clip plane.
    pub near: f32,
    /// Far clip plane.
    pub far: f32,
    /// Eye position.
    pub position: [f32; 3],
    /// Look-at point.
    pub target: [f32; 3],
    /// Up vector.
    pub up: [f32; 3],
    projection: Mat4,
}

impl PerspectiveCamera {
    /// Creates a camera at `(2, 2, 2)` looking at the origin.
    #[must_use]
    pub fn new(fov_deg: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov_y: fov_deg.to_radians(),
            aspect,
            near,
            far,
            position: [2.0, 2.0, 2.0],
            target: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
            projection: IDENTITY,
        };
        camera.update_projection();
        camera
    }

    /// Builds the camera described by the config.
    #[must_use]
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self::new(config.fov_deg, aspect, config.near, config.far);
        camera.position = config.position;
        camera.target = config.target;
        camera
    }

    /// Sets the aspect ratio from a viewport size and rebuilds the projection.
    ///
    /// A zero-height viewport (minimised window) keeps the previous aspect.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
        self.update_projection();
    }

    /// Rebuilds the projection matrix from `fov_y`, `aspect`, `near`, `far`.
    pub fn update_projection(&mut self) {
        self.projection = perspective(self.fov_y, self.aspect, self.near, self.far);
    }

    /// Cached projection matrix.
    #[must_use]
    pub const fn projection(&self) -> Mat4 {
        self.projection
    }

    /// View matrix for the current position and target.
    #[must_use]
    pub fn view(&self) -> Mat4 {
        look_at(self.position, self.target, self.up)
    }

    /// `projection * view`.
    #[must_use]
    pub fn view_proj(&self) -> Mat4 {
        multiply_matrices(self.projection, self.view())
    }

    /// Distance from the eye to the target.
    #[must_use]
    pub fn distance_to_target(&self) -> f32 {
        length(sub(self.position, self.target))
    }

    /// View-space depth of a world point (positive in front of the camera).
    #[must_use]
    pub fn view_depth(&self, world: [f32; 3]) -> f32 {
        -transform_point(&self.view(), world)[2]
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), 16.0 / 9.0)
    }
}
