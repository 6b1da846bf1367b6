//! # Text Nodes

use anim_engine::{CodeContext, CodeContract, Node, NodeDeclaration, NodeKind, SocketType};

pub const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
pub const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DIGITS: &str = "0123456789";
pub const SPECIAL: &str = "!$%&/()=?*+#'-_.:,;\"";

/// Character sets as strings. No inputs.
pub struct Characters;

impl NodeKind for Characters {
    fn declaration(&self) -> NodeDeclaration {
        NodeDeclaration::new("an_CharactersNode", "Characters").category("Text")
    }

    fn create(&self, node: &mut Node) {
        node.new_output(SocketType::String, "Lower Case", "lower");
        node.new_output(SocketType::String, "Upper Case", "upper");
        node.new_output(SocketType::String, "Digits", "digits");
        node.new_output(SocketType::String, "Special", "special");
        node.new_output(SocketType::String, "All", "all");
    }

    fn code(&self, _node: &Node, _ctx: &CodeContext) -> CodeContract {
        CodeContract::Procedure
    }
}

/// Every character the node offers, in output order.
pub fn all_characters() -> String {
    [LOWER, UPPER, DIGITS, SPECIAL].concat()
}
