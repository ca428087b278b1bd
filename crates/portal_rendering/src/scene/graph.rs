//! Scene graph of named, pre-transformed meshes.
//!
//! Meshes are stored in world space. The scene is static, so there is no
//! transform hierarchy to resolve at draw time.

use bytemuck::{Pod, Zeroable};

/// Vertex of a scene mesh.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SceneVertex {
    /// World position.
    pub position: [f32; 3],
    /// Texture coordinate, used by the portal gradient.
    pub uv: [f32; 2],
    /// Baked colour (linear RGB).
    pub color: [f32; 3],
}

impl SceneVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2, 2 => Float32x3];

    /// Creates a vertex.
    #[inline]
    #[must_use]
    pub const fn new(position: [f32; 3], uv: [f32; 2], color: [f32; 3]) -> Self {
        Self {
            position,
            uv,
            color,
        }
    }

    /// Per-vertex buffer layout.
    #[must_use]
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SceneVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Indexed triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertices.
    pub vertices: Vec<SceneVertex>,
    /// Triangle indices, three per triangle.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Empty mesh.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Whether the mesh has nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Bytes for the vertex buffer.
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Bytes for the index buffer.
    #[must_use]
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Axis-aligned bounds, `None` for an empty mesh.
    #[must_use]
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = self.vertices.first()?.position;
        Some(self.vertices.iter().fold((first, first), |(mut min, mut max), v| {
            for axis in 0..3 {
                min[axis] = min[axis].min(v.position[axis]);
                max[axis] = max[axis].max(v.position[axis]);
            }
            (min, max)
        }))
    }

    /// Whether every index points at a vertex.
    #[must_use]
    pub fn indices_in_range(&self) -> bool {
        let count = self.vertices.len();
        self.indices.iter().all(|&i| (i as usize) < count)
    }
}

/// A named mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    /// Node name as authored (`portalLight`, `poleLight1`, ...).
    pub name: String,
    /// Geometry.
    pub mesh: MeshData,
}

/// Flat list of named nodes, in load order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    /// Empty graph.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Appends a node and returns its index.
    pub fn add_node(&mut self, name: impl Into<String>, mesh: MeshData) -> usize {
        self.nodes.push(SceneNode {
            name: name.into(),
            mesh,
        });
        self.nodes.len() - 1
    }

    /// All nodes.
    #[must_use]
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    /// First node called `name`.
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|node| node.name == name)
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total triangles across all nodes.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.nodes.iter().map(|node| node.mesh.triangle_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> MeshData {
        MeshData {
            vertices: vec![
                SceneVertex::new([0.0, 0.0, 0.0], [0.0, 0.0], [1.0; 3]),
                SceneVertex::new([1.0, 0.0, 0.0], [1.0, 0.0], [1.0; 3]),
                SceneVertex::new([0.0, 2.0, -1.0], [0.0, 1.0], [1.0; 3]),
            ],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<SceneVertex>(), 32);
        let layout = SceneVertex::desc();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.attributes[2].offset, 20);
    }

    #[test]
    fn test_mesh_bounds() {
        let mesh = triangle();
        assert_eq!(mesh.bounds(), Some(([0.0, 0.0, -1.0], [1.0, 2.0, 0.0])));
        assert_eq!(MeshData::new().bounds(), None);
        assert!(mesh.indices_in_range());
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_graph_lookup() {
        let mut graph = SceneGraph::new();
        assert_eq!(graph.add_node("ground", triangle()), 0);
        assert_eq!(graph.add_node("portalLight", triangle()), 1);
        assert!(graph.node("portalLight").is_some());
        assert!(graph.node("poleLight1").is_none());
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.triangle_count(), 2);
    }
}
