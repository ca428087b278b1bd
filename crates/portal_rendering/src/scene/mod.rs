//! # Scene Graph
//!
//! Named meshes, the material each one is drawn with, and the loaders that
//! produce them.
//!
//! ```text
//! SceneLoader::load(path) ──► SceneGraph ──► assign_materials ──► renderer
//! ```

mod graph;
mod loader;
mod materials;
mod procedural;

pub use graph::{MeshData, SceneGraph, SceneNode, SceneVertex};
pub use loader::SceneLoader;
pub use materials::{
    assign_materials, MaterialAssignment, MaterialKind, POLE_LIGHT_NODES, PORTAL_LIGHT_NODE,
};
pub use procedural::{MeshBuilder, ProceduralPortalScene, SceneColors};
