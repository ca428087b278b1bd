//! Portal glow.
//!
//! The disc is UV-mapped with its centre at `(0.5, 0.5)` and its rim at
//! distance 0.5. The fragment colour is
//!
//! ```text
//! t      = clamp(distance(uv, centre) * 2, 0, 1)
//! t'     = clamp(t + wobble(angle, radius, time) * t * (1 - t), 0, 1)
//! colour = max(mix(color_start, color_end, t') * strength, 0)
//! ```
//!
//! `wobble` is a three-armed swirl plus a slow pulse. The `t * (1 - t)`
//! envelope pins the centre to `color_start` and the rim to `color_end` at
//! every point in time.

use crate::uniforms::PortalUniforms;

use super::camera_block;

/// Number of swirl arms.
pub const SWIRL_ARMS: f32 = 3.0;
/// Swirl angular speed (radians per second).
pub const SWIRL_SPEED: f32 = 1.5;
/// Radial twist of the swirl arms.
pub const SWIRL_TWIST: f32 = 10.0;
/// Swirl amplitude.
pub const SWIRL_AMOUNT: f32 = 0.35;
/// Pulse angular speed (radians per second).
pub const PULSE_SPEED: f32 = 2.0;
/// Pulse amplitude.
pub const PULSE_AMOUNT: f32 = 0.15;

/// Portal program source.
pub const PORTAL_WGSL: &str = concat!(
    camera_block!(),
    r"
struct PortalUniforms {
    color_start: vec3<f32>,
    time: f32,
    color_end: vec3<f32>,
    strength: f32,
}

@group(1) @binding(0) var<uniform> portal: PortalUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) color: vec3<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

const SWIRL_ARMS: f32 = 3.0;
const SWIRL_SPEED: f32 = 1.5;
const SWIRL_TWIST: f32 = 10.0;
const SWIRL_AMOUNT: f32 = 0.35;
const PULSE_SPEED: f32 = 2.0;
const PULSE_AMOUNT: f32 = 0.15;

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = camera.view_proj * vec4<f32>(in.position, 1.0);
    out.uv = in.uv;
    return out;
}

fn mix_factor(uv: vec2<f32>, time: f32) -> f32 {
    let centered = uv - vec2<f32>(0.5, 0.5);
    let radius = length(centered);
    let t = clamp(radius * 2.0, 0.0, 1.0);

    var angle: f32 = 0.0;
    if radius > 0.000001 {
        angle = atan2(centered.y, centered.x);
    }

    let swirl = sin(angle * SWIRL_ARMS + time * SWIRL_SPEED - radius * SWIRL_TWIST) * SWIRL_AMOUNT;
    let pulse = sin(time * PULSE_SPEED) * PULSE_AMOUNT;
    return clamp(t + (swirl + pulse) * t * (1.0 - t), 0.0, 1.0);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let t = mix_factor(in.uv, portal.time);
    let color = mix(portal.color_start, portal.color_end, vec3<f32>(t, t, t)) * portal.strength;
    return vec4<f32>(max(color, vec3<f32>(0.0, 0.0, 0.0)), 1.0);
}
"
);

/// Interpolation factor between `color_start` (0) and `color_end` (1).
#[must_use]
pub fn mix_factor(uv: [f32; 2], time: f32) -> f32 {
    let centered = [uv[0] - 0.5, uv[1] - 0.5];
    let radius = centered[0].hypot(centered[1]);
    let t = (radius * 2.0).clamp(0.0, 1.0);

    let angle = if radius > 0.000_001 {
        centered[1].atan2(centered[0])
    } else {
        0.0
    };

    let swirl = (angle * SWIRL_ARMS + time * SWIRL_SPEED - radius * SWIRL_TWIST).sin() * SWIRL_AMOUNT;
    let pulse = (time * PULSE_SPEED).sin() * PULSE_AMOUNT;
    (t + (swirl + pulse) * t * (1.0 - t)).clamp(0.0, 1.0)
}

/// Linear RGB the portal fragment shader writes at `uv`.
#[must_use]
pub fn portal_fragment(uv: [f32; 2], uniforms: &PortalUniforms) -> [f32; 3] {
    let t = mix_factor(uv, uniforms.time);
    let mut out = [0.0; 3];
    for (channel, value) in out.iter_mut().enumerate() {
        let start = uniforms.color_start[channel];
        let end = uniforms.color_end[channel];
        *value = ((start + (end - start) * t) * uniforms.strength).max(0.0);
    }
    out
}
