//! # Object Nodes

use anim_engine::{CodeContext, CodeContract, Node, NodeDeclaration, NodeKind, SocketType, SocketValue};

/// Objects of a named object group.
///
/// The group comes from the `group` input when linked, otherwise the node
/// object looks it up by its `groupName` property.
pub struct ObjectGroupInput;

impl NodeKind for ObjectGroupInput {
    fn declaration(&self) -> NodeDeclaration {
        NodeDeclaration::new("an_ObjectGroupInput", "Object Group Input").category("Object")
    }

    fn create(&self, node: &mut Node) {
        node.properties
            .insert("groupName".to_string(), SocketValue::String(String::new()));
        node.new_input(SocketType::ObjectGroup, "Group", "group");
        node.new_output(SocketType::ObjectList, "Objects", "objects");
    }

    fn code(&self, _node: &Node, _ctx: &CodeContext) -> CodeContract {
        CodeContract::Procedure
    }
}
