//! Firefly sprites.
//!
//! Each particle is drawn as a camera-facing quad (6 vertices, instanced
//! once per particle). The instance buffer carries `position` and the
//! per-particle `a_scale` from the generator; the vertex stage reads
//! `a_scale` to phase-shift the twinkle so no two fireflies pulse together.
//!
//! ```text
//! size_px = size * pixel_ratio * attenuation(depth) * twinkle(time, a_scale)
//! attenuation(depth) = 1 / max(depth, NEAR_EPSILON)
//! twinkle(t, s)      = mix(TWINKLE_MIN, 1, |sin(t + s * 2pi)|)
//! bob                = sin(time + x * 100) * a_scale * 0.2
//! alpha(d)           = clamp(0.05 / d - 0.1, 0, 1)     d = distance from sprite centre
//! ```
//!
//! Output is premultiplied white; the pipeline blends ONE + ONE with depth
//! read-only.

use std::f32::consts::TAU;

use crate::uniforms::FirefliesUniforms;

use super::camera_block;

/// Smallest twinkle multiplier (the dimmest point of the cycle).
pub const TWINKLE_MIN: f32 = 0.35;
/// Depth floor for the size attenuation.
pub const NEAR_EPSILON: f32 = 0.1;
/// Vertical bob amplitude, scaled by `a_scale`.
pub const BOB_AMPLITUDE: f32 = 0.2;
/// Spatial frequency of the bob phase along x.
pub const BOB_FREQUENCY: f32 = 100.0;
/// Vertices emitted per sprite.
pub const VERTICES_PER_SPRITE: u32 = 6;

/// Sprite corner offsets in quad units, two triangles.
pub const QUAD_CORNERS: [[f32; 2]; 6] = [
    [-0.5, -0.5],
    [0.5, -0.5],
    [0.5, 0.5],
    [-0.5, -0.5],
    [0.5, 0.5],
    [-0.5, 0.5],
];

/// Fireflies program source.
pub const FIREFLIES_WGSL: &str = concat!(
    camera_block!(),
    r"
struct FirefliesUniforms {
    time: f32,
    pixel_ratio: f32,
    size: f32,
    _padding: f32,
}

@group(1) @binding(0) var<uniform> fireflies: FirefliesUniforms;

struct FireflyInput {
    @location(0) position: vec3<f32>,
    @location(1) a_scale: f32,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

const TAU: f32 = 6.283185307;
const TWINKLE_MIN: f32 = 0.35;
const NEAR_EPSILON: f32 = 0.1;
const BOB_AMPLITUDE: f32 = 0.2;
const BOB_FREQUENCY: f32 = 100.0;

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32, particle: FireflyInput) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-0.5, -0.5),
        vec2<f32>(0.5, -0.5),
        vec2<f32>(0.5, 0.5),
        vec2<f32>(-0.5, -0.5),
        vec2<f32>(0.5, 0.5),
        vec2<f32>(-0.5, 0.5),
    );
    let corner = corners[vertex_index % 6u];

    var world = particle.position;
    world.y += sin(fireflies.time + world.x * BOB_FREQUENCY) * particle.a_scale * BOB_AMPLITUDE;

    let view_position = camera.view * vec4<f32>(world, 1.0);
    let depth = max(-view_position.z, NEAR_EPSILON);
    let twinkle = mix(TWINKLE_MIN, 1.0, abs(sin(fireflies.time + particle.a_scale * TAU)));
    let size_px = fireflies.size * fireflies.pixel_ratio * (1.0 / depth) * twinkle;

    var clip = camera.projection * view_position;
    let offset_ndc = corner * size_px * 2.0 * camera.viewport.zw;
    clip = vec4<f32>(clip.xy + offset_ndc * clip.w, clip.z, clip.w);

    var out: VertexOutput;
    out.clip_position = clip;
    out.uv = corner + vec2<f32>(0.5, 0.5);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let d = distance(in.uv, vec2<f32>(0.5, 0.5));
    if d >= 0.5 {
        discard;
    }
    let strength = clamp(0.05 / max(d, 0.0001) - 0.1, 0.0, 1.0);
    if strength <= 0.0 {
        discard;
    }
    return vec4<f32>(strength, strength, strength, strength);
}
"
);

/// Periodic size multiplier, phase-shifted by the particle's scale.
#[must_use]
pub fn twinkle_factor(time: f32, a_scale: f32) -> f32 {
    let wave = (time + a_scale * TAU).sin().abs();
    TWINKLE_MIN + (1.0 - TWINKLE_MIN) * wave
}

/// Inverse-linear size falloff with view depth.
#[must_use]
pub fn size_attenuation(view_depth: f32) -> f32 {
    1.0 / view_depth.max(NEAR_EPSILON)
}

/// On-screen sprite size in drawing-buffer pixels.
#[must_use]
pub fn point_size(uniforms: &FirefliesUniforms, view_depth: f32, a_scale: f32) -> f32 {
    uniforms.size
        * uniforms.pixel_ratio
        * size_attenuation(view_depth)
        * twinkle_factor(uniforms.time, a_scale)
}

/// Vertical displacement added to a particle at world x.
#[must_use]
pub fn bob_offset(time: f32, x: f32, a_scale: f32) -> f32 {
    (time + x * BOB_FREQUENCY).sin() * a_scale * BOB_AMPLITUDE
}

/// Fragment intensity at distance `d` from the sprite centre (uv units).
#[must_use]
pub fn sprite_alpha(d: f32) -> f32 {
    if d >= 0.5 {
        return 0.0;
    }
    (0.05 / d.max(0.0001) - 0.1).clamp(0.0, 1.0)
}
