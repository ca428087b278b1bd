//! Baked scene meshes and the pole lamps.
//!
//! Lighting is pre-computed into the vertex colours, so the baked fragment
//! stage just forwards them. The lamps ignore vertex colour and output the
//! flat material colour.

use portal_core::Color;

use super::camera_block;

/// Fragment entry for baked meshes.
pub const BAKED_ENTRY: &str = "fs_baked";
/// Fragment entry for flat-colour meshes.
pub const FLAT_ENTRY: &str = "fs_flat";

/// Pole lamp glass colour.
pub const POLE_LIGHT_COLOR: Color = Color::hex(0xff_ff_e5);

/// Scene program source.
pub const SCENE_WGSL: &str = concat!(
    camera_block!(),
    r"
struct FlatMaterial {
    color: vec4<f32>,
}

@group(1) @binding(0) var<uniform> material: FlatMaterial;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) color: vec3<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = camera.view_proj * vec4<f32>(in.position, 1.0);
    out.color = in.color;
    return out;
}

@fragment
fn fs_baked(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(in.color, 1.0);
}

@fragment
fn fs_flat(in: VertexOutput) -> @location(0) vec4<f32> {
    return material.color;
}
"
);
