//! Procedural Portal Scene - geometry from code
//!
//! Builds the portal clearing without any asset file: a grass ground
//! plane, a ring of stones around the portal disc, two lamp posts and a few
//! rocks. Lighting is baked into the vertex colours (per-face shading, a
//! height gradient and an edge falloff on the ground).
//!
//! Node names match the authored model, so material assignment treats both
//! the same way.

use std::f32::consts::TAU;

use portal_core::Color;
use tracing::debug;

use crate::error::RenderResult;
use crate::scene::{MeshData, SceneGraph, SceneLoader, SceneVertex};
use crate::shaders::scene::POLE_LIGHT_COLOR;

/// Base colours of the clearing (sRGB).
pub struct SceneColors;

impl SceneColors {
    /// Grass.
    pub const GRASS: Color = Color::hex(0x4a_5e_3a);
    /// Portal ring stones.
    pub const STONE: Color = Color::hex(0x8a_86_7c);
    /// Lamp post wood.
    pub const WOOD: Color = Color::hex(0x3b_2a_1c);
    /// Lamp caps.
    pub const METAL: Color = Color::hex(0x2e_30_33);
    /// Loose rocks.
    pub const ROCK: Color = Color::hex(0x6b_68_60);
}

/// Shade per box face: +x, -x, +y, -y, +z, -z.
const FACE_SHADE: [f32; 6] = [0.8, 0.65, 1.0, 0.4, 0.9, 0.55];

/// Builder for baked triangle meshes.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    mesh: MeshData,
}

impl MeshBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push_vertex(&mut self, position: [f32; 3], uv: [f32; 2], color: [f32; 3]) -> u32 {
        let index = u32::try_from(self.mesh.vertices.len()).unwrap_or(u32::MAX);
        self.mesh.vertices.push(SceneVertex::new(position, uv, color));
        index
    }

    fn push_quad(&mut self, corners: [[f32; 3]; 4], colors: [[f32; 3]; 4]) {
        const UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let base = self.push_vertex(corners[0], UVS[0], colors[0]);
        for i in 1..4 {
            self.push_vertex(corners[i], UVS[i], colors[i]);
        }
        self.mesh
            .indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Adds an axis-aligned box with per-face baked shading.
    ///
    /// Vertices closer to the ground are darkened to fake contact shadow.
    pub fn add_box(&mut self, center: [f32; 3], half: [f32; 3], color: Color) -> &mut Self {
        let base = color.to_linear();
        let [cx, cy, cz] = center;
        let [hx, hy, hz] = half;
        let (x0, x1, y0, y1, z0, z1) = (cx - hx, cx + hx, cy - hy, cy + hy, cz - hz, cz + hz);

        let faces: [[[f32; 3]; 4]; 6] = [
            [[x1, y0, z1], [x1, y0, z0], [x1, y1, z0], [x1, y1, z1]],
            [[x0, y0, z0], [x0, y0, z1], [x0, y1, z1], [x0, y1, z0]],
            [[x0, y1, z1], [x1, y1, z1], [x1, y1, z0], [x0, y1, z0]],
            [[x0, y0, z0], [x1, y0, z0], [x1, y0, z1], [x0, y0, z1]],
            [[x0, y0, z1], [x1, y0, z1], [x1, y1, z1], [x0, y1, z1]],
            [[x1, y0, z0], [x0, y0, z0], [x0, y1, z0], [x1, y1, z0]],
        ];

        for (corners, shade) in faces.into_iter().zip(FACE_SHADE) {
            let colors = corners.map(|p| scale(base, shade * contact_shadow(p[1])));
            self.push_quad(corners, colors);
        }
        self
    }

    /// Adds a disc in the XY plane facing +Z, UV-mapped so the centre is
    /// `(0.5, 0.5)` and the rim is at distance 0.5.
    pub fn add_disc(
        &mut self,
        center: [f32; 3],
        radius: f32,
        segments: u32,
        color: Color,
    ) -> &mut Self {
        let segments = segments.max(3);
        let linear = color.to_linear();
        let hub = self.push_vertex(center, [0.5, 0.5], linear);

        for i in 0..segments {
            let angle = i as f32 / segments as f32 * TAU;
            let (sin, cos) = angle.sin_cos();
            self.push_vertex(
                [center[0] + radius * cos, center[1] + radius * sin, center[2]],
                [0.5 + 0.5 * cos, 0.5 + 0.5 * sin],
                linear,
            );
        }
        for i in 0..segments {
            let current = hub + 1 + i;
            let next = hub + 1 + (i + 1) % segments;
            self.mesh.indices.extend_from_slice(&[hub, current, next]);
        }
        self
    }

    /// Adds a subdivided square ground plane at y = 0, darker towards the
    /// edges.
    pub fn add_ground(&mut self, half_size: f32, subdivisions: u32, color: Color) -> &mut Self {
        let n = subdivisions.max(1);
        let base = color.to_linear();
        let step = half_size * 2.0 / n as f32;
        let falloff = |x: f32, z: f32| {
            let d = (x.hypot(z) / (half_size * std::f32::consts::SQRT_2)).min(1.0);
            1.0 - 0.45 * d * d
        };

        for row in 0..n {
            for col in 0..n {
                let x0 = -half_size + col as f32 * step;
                let z0 = -half_size + row as f32 * step;
                let (x1, z1) = (x0 + step, z0 + step);
                let corners = [[x0, 0.0, z1], [x1, 0.0, z1], [x1, 0.0, z0], [x0, 0.0, z0]];
                let colors = corners.map(|p| scale(base, falloff(p[0], p[2])));
                self.push_quad(corners, colors);
            }
        }
        self
    }

    /// Finishes the mesh.
    #[must_use]
    pub fn build(self) -> MeshData {
        self.mesh
    }
}

fn scale(color: [f32; 3], factor: f32) -> [f32; 3] {
    color.map(|c| c * factor)
}

fn contact_shadow(y: f32) -> f32 {
    0.7 + 0.3 * (y / 0.6).clamp(0.0, 1.0)
}

/// The portal clearing, built in code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProceduralPortalScene {
    /// Centre of the portal disc.
    pub portal_center: [f32; 3],
    /// Radius of the portal disc.
    pub portal_radius: f32,
    /// Triangles around the disc.
    pub portal_segments: u32,
    /// Number of stones in the ring.
    pub ring_stones: u32,
    /// X offset of the two lamp posts from the portal axis.
    pub pole_spacing: f32,
}

impl Default for ProceduralPortalScene {
    fn default() -> Self {
        Self {
            portal_center: [0.0, 0.85, -1.6],
            portal_radius: 0.62,
            portal_segments: 64,
            ring_stones: 16,
            pole_spacing: 1.15,
        }
    }
}

impl ProceduralPortalScene {
    /// Builds the scene graph.
    #[must_use]
    pub fn build(&self) -> SceneGraph {
        let mut scene = SceneGraph::new();

        let mut ground = MeshBuilder::new();
        ground.add_ground(2.6, 16, SceneColors::GRASS);
        scene.add_node("ground", ground.build());

        scene.add_node("portalStones", self.ring());

        let mut poles = MeshBuilder::new();
        for x in self.pole_xs() {
            let z = self.pole_z();
            poles
                .add_box([x, 0.6, z], [0.04, 0.6, 0.04], SceneColors::WOOD)
                .add_box([x, 1.41, z], [0.1, 0.03, 0.1], SceneColors::METAL);
        }
        scene.add_node("poles", poles.build());

        for (name, x) in ["poleLight1", "poleLight2"].into_iter().zip(self.pole_xs()) {
            let mut lamp = MeshBuilder::new();
            lamp.add_box([x, 1.29, self.pole_z()], [0.075, 0.09, 0.075], POLE_LIGHT_COLOR);
            scene.add_node(name, lamp.build());
        }

        let mut rocks = MeshBuilder::new();
        for (center, half) in [
            ([-1.7, 0.08, 0.9], [0.16, 0.08, 0.12]),
            ([1.5, 0.06, 1.4], [0.1, 0.06, 0.14]),
            ([0.9, 0.05, -0.2], [0.08, 0.05, 0.08]),
            ([-0.6, 0.07, 1.8], [0.14, 0.07, 0.1]),
        ] {
            rocks.add_box(center, half, SceneColors::ROCK);
        }
        scene.add_node("rocks", rocks.build());

        let mut portal = MeshBuilder::new();
        portal.add_disc(
            self.portal_center,
            self.portal_radius,
            self.portal_segments,
            Color::WHITE,
        );
        scene.add_node("portalLight", portal.build());

        debug!(
            nodes = scene.len(),
            triangles = scene.triangle_count(),
            "built procedural portal scene"
        );
        scene
    }

    fn ring(&self) -> MeshData {
        let mut ring = MeshBuilder::new();
        let [cx, cy, cz] = self.portal_center;
        let radius = self.portal_radius + 0.12;
        let stones = self.ring_stones.max(3);
        for i in 0..stones {
            let angle = i as f32 / stones as f32 * TAU;
            let (sin, cos) = angle.sin_cos();
            let y = cy + radius * sin;
            if y < 0.0 {
                continue;
            }
            ring.add_box(
                [cx + radius * cos, y, cz],
                [0.13, 0.13, 0.16],
                SceneColors::STONE,
            );
        }
        ring.build()
    }

    fn pole_xs(&self) -> [f32; 2] {
        [-self.pole_spacing, self.pole_spacing]
    }

    fn pole_z(&self) -> f32 {
        self.portal_center[2] + 0.45
    }
}

impl SceneLoader for ProceduralPortalScene {
    fn load(&self, path: &str) -> RenderResult<SceneGraph> {
        debug!(path, "building portal scene procedurally");
        Ok(self.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{assign_materials, MaterialKind};

    #[test]
    fn test_disc_uv_mapping() {
        let mut builder = MeshBuilder::new();
        builder.add_disc([0.0, 1.0, 0.0], 0.5, 12, Color::WHITE);
        let mesh = builder.build();

        assert_eq!(mesh.vertices.len(), 13);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.vertices[0].uv, [0.5, 0.5]);
        for vertex in &mesh.vertices[1..] {
            let du = vertex.uv[0] - 0.5;
            let dv = vertex.uv[1] - 0.5;
            assert!((du.hypot(dv) - 0.5).abs() < 1e-5);
        }
        assert!(mesh.indices_in_range());
    }

    #[test]
    fn test_box_has_six_faces() {
        let mut builder = MeshBuilder::new();
        builder.add_box([0.0, 1.0, 0.0], [0.5, 0.5, 0.5], SceneColors::STONE);
        let mesh = builder.build();
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.bounds(), Some(([-0.5, 0.5, -0.5], [0.5, 1.5, 0.5])));
    }

    #[test]
    fn test_ground_edges_darker() {
        let mut builder = MeshBuilder::new();
        builder.add_ground(2.0, 4, Color::WHITE);
        let mesh = builder.build();
        let centre = mesh
            .vertices
            .iter()
            .find(|v| v.position[0].abs() < 1e-6 && v.position[2].abs() < 1e-6)
            .unwrap();
        let corner = mesh
            .vertices
            .iter()
            .find(|v| (v.position[0] - 2.0).abs() < 1e-6 && (v.position[2] - 2.0).abs() < 1e-6)
            .unwrap();
        assert!(centre.color[0] > corner.color[0]);
    }

    #[test]
    fn test_scene_has_named_nodes() {
        let scene = ProceduralPortalScene::default().build();
        let assignment = assign_materials(&scene);
        assert!(assignment.is_complete());
        assert_eq!(assignment.count(MaterialKind::PoleLight), 2);
        assert_eq!(assignment.count(MaterialKind::Portal), 1);
        assert!(assignment.count(MaterialKind::Baked) >= 3);

        for node in scene.nodes() {
            assert!(!node.mesh.is_empty(), "{} is empty", node.name);
            assert!(node.mesh.indices_in_range(), "{}", node.name);
        }
    }

    #[test]
    fn test_loader_ignores_path() {
        let scene = ProceduralPortalScene::default();
        assert_eq!(scene.load("anything.glb").unwrap(), scene.build());
    }
}
