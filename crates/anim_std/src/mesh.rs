//! # Mesh Nodes

use anim_engine::{CodeContext, CodeContract, Node, NodeDeclaration, NodeKind, SocketType, SocketValue};

/// Merge vertices of a mesh that are closer than `distance`.
///
/// An unlinked mesh input starts from an empty mesh, so the node always
/// needs the mesh module.
pub struct MeshRemoveDoubles;

impl NodeKind for MeshRemoveDoubles {
    fn declaration(&self) -> NodeDeclaration {
        NodeDeclaration::new("an_MeshRemoveDoubles", "Mesh Remove Doubles")
            .category("Mesh")
            .search_tags(&["Merge Vertices"])
    }

    fn create(&self, node: &mut Node) {
        node.new_input(SocketType::Mesh, "Mesh", "bm");
        node.new_input(SocketType::Float, "Distance", "distance")
            .with_value(SocketValue::Float(0.0001));
        node.new_output(SocketType::Mesh, "Mesh", "mesh");
    }

    fn code(&self, _node: &Node, _ctx: &CodeContext) -> CodeContract {
        CodeContract::Procedure
    }

    fn used_modules(&self, _node: &Node) -> Vec<String> {
        vec!["bmesh".to_string()]
    }
}
