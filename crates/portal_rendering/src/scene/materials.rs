//! Material assignment by node name.
//!
//! Three names are special; every other node is baked:
//!
//! ```text
//! poleLight1, poleLight2  ──► PoleLight (flat #ffffe5)
//! portalLight             ──► Portal    (glow shader)
//! *                       ──► Baked     (vertex colours)
//! ```

use tracing::warn;

use crate::error::{RenderError, RenderResult};
use crate::scene::SceneGraph;

/// Names of the pole lamp meshes.
pub const POLE_LIGHT_NODES: [&str; 2] = ["poleLight1", "poleLight2"];
/// Name of the portal disc mesh.
pub const PORTAL_LIGHT_NODE: &str = "portalLight";

/// How a node is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// Pre-lit vertex colours.
    Baked,
    /// Flat lamp colour.
    PoleLight,
    /// Portal glow shader.
    Portal,
}

impl MaterialKind {
    /// Material for a node name.
    #[must_use]
    pub fn for_node(name: &str) -> Self {
        if POLE_LIGHT_NODES.contains(&name) {
            Self::PoleLight
        } else if name == PORTAL_LIGHT_NODE {
            Self::Portal
        } else {
            Self::Baked
        }
    }
}

/// Result of [`assign_materials`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialAssignment {
    /// One material per node, parallel to `SceneGraph::nodes`.
    pub kinds: Vec<MaterialKind>,
    /// Special node names that were not found.
    pub missing: Vec<&'static str>,
}

impl MaterialAssignment {
    /// Number of nodes drawn with `kind`.
    #[must_use]
    pub fn count(&self, kind: MaterialKind) -> usize {
        self.kinds.iter().filter(|&&k| k == kind).count()
    }

    /// Whether all three special nodes were found.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Fails on the first missing special node.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::MissingNode`] naming the node.
    pub fn require_complete(&self) -> RenderResult<()> {
        match self.missing.first() {
            Some(name) => Err(RenderError::MissingNode((*name).to_string())),
            None => Ok(()),
        }
    }
}

/// Picks the material of every node by name.
///
/// Missing special nodes are logged and reported, not fatal: the rest of
/// the scene still draws.
#[must_use]
pub fn assign_materials(scene: &SceneGraph) -> MaterialAssignment {
    let kinds = scene
        .nodes()
        .iter()
        .map(|node| MaterialKind::for_node(&node.name))
        .collect();

    let missing: Vec<&'static str> = POLE_LIGHT_NODES
        .iter()
        .copied()
        .chain(std::iter::once(PORTAL_LIGHT_NODE))
        .filter(|name| scene.node(name).is_none())
        .collect();

    for name in &missing {
        warn!(node = *name, "scene has no node with this name; material not applied");
    }

    MaterialAssignment { kinds, missing }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MeshData;

    #[test]
    fn test_for_node() {
        assert_eq!(MaterialKind::for_node("poleLight1"), MaterialKind::PoleLight);
        assert_eq!(MaterialKind::for_node("poleLight2"), MaterialKind::PoleLight);
        assert_eq!(MaterialKind::for_node("portalLight"), MaterialKind::Portal);
        assert_eq!(MaterialKind::for_node("baked"), MaterialKind::Baked);
        assert_eq!(MaterialKind::for_node("PortalLight"), MaterialKind::Baked);
    }

    #[test]
    fn test_assign_complete_scene() {
        let mut scene = SceneGraph::new();
        for name in ["ground", "poleLight1", "poleLight2", "portalLight", "stones"] {
            scene.add_node(name, MeshData::new());
        }
        let assignment = assign_materials(&scene);
        assert_eq!(
            assignment.kinds,
            vec![
                MaterialKind::Baked,
                MaterialKind::PoleLight,
                MaterialKind::PoleLight,
                MaterialKind::Portal,
                MaterialKind::Baked,
            ]
        );
        assert!(assignment.is_complete());
        assert!(assignment.require_complete().is_ok());
        assert_eq!(assignment.count(MaterialKind::Baked), 2);
    }

    #[test]
    fn test_missing_nodes_reported() {
        let mut scene = SceneGraph::new();
        scene.add_node("poleLight2", MeshData::new());
        let assignment = assign_materials(&scene);
        assert_eq!(assignment.missing, vec!["poleLight1", "portalLight"]);
        assert_eq!(
            assignment.require_complete(),
            Err(RenderError::MissingNode("poleLight1".to_string()))
        );
    }
}
