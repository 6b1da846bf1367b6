//! Node kinds and trees used by the compiler tests.

use crate::graph::{Node, NodeTree, SocketType, SocketValue};
use crate::node::{CodeContext, CodeContract, NodeDeclaration, NodeKind, NodeRegistry, RawCode};

/// `result = value * 2`
pub struct DoubleValue;

impl NodeKind for DoubleValue {
    fn declaration(&self) -> NodeDeclaration {
        NodeDeclaration::new("test_Double", "Double").category("Number")
    }

    fn create(&self, node: &mut Node) {
        node.new_input(SocketType::Float, "Value", "value")
            .with_value(SocketValue::Float(1.0));
        node.new_output(SocketType::Float, "Result", "result");
    }

    fn code(&self, _node: &Node, _ctx: &CodeContext) -> CodeContract {
        CodeContract::Raw(RawCode::from("result = value * 2"))
    }
}

/// Procedure node mixing two colors.
pub struct MixColors;

impl NodeKind for MixColors {
    fn declaration(&self) -> NodeDeclaration {
        NodeDeclaration::new("test_Mix", "Mix").category("Color")
    }

    fn create(&self, node: &mut Node) {
        node.new_input(SocketType::Float, "Factor", "factor")
            .with_value(SocketValue::Float(0.5));
        node.new_input(SocketType::Color, "A", "a");
        node.new_input(SocketType::Color, "B", "b");
        node.new_output(SocketType::Color, "Color", "color");
    }

    fn code(&self, _node: &Node, _ctx: &CodeContext) -> CodeContract {
        CodeContract::Procedure
    }
}

/// Stores a value on the node, no outputs.
pub struct Store;

impl NodeKind for Store {
    fn declaration(&self) -> NodeDeclaration {
        NodeDeclaration::new("test_Store", "Store")
    }

    fn create(&self, node: &mut Node) {
        node.new_input(SocketType::Generic, "Value", "value");
    }

    fn code(&self, _node: &Node, _ctx: &CodeContext) -> CodeContract {
        CodeContract::Raw(RawCode::from("self.stored = value"))
    }
}

/// Vector length, only computed when its output is used.
pub struct VectorLength;

impl NodeKind for VectorLength {
    fn declaration(&self) -> NodeDeclaration {
        NodeDeclaration::new("test_VectorLength", "Vector Length").category("Vector")
    }

    fn create(&self, node: &mut Node) {
        node.new_input(SocketType::Vector, "Vector", "vector");
        node.new_output(SocketType::Float, "Length", "length");
    }

    fn code(&self, _node: &Node, ctx: &CodeContext) -> CodeContract {
        if ctx.is_output_linked("length") {
            CodeContract::Raw(RawCode::from("length = vector.length"))
        } else {
            CodeContract::Raw(RawCode::Empty)
        }
    }

    fn used_modules(&self, _node: &Node) -> Vec<String> {
        vec!["mathutils".to_string()]
    }
}

pub fn test_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();
    registry
        .register(DoubleValue)
        .register(MixColors)
        .register(Store)
        .register(VectorLength);
    registry
}

/// A `test_Double` node with a fixed identifier.
pub fn value_node(identifier: &str) -> Node {
    let mut node = Node::new("test_Double");
    node.identifier = identifier.to_string();
    DoubleValue.create(&mut node);
    node
}

/// Add a node of a registered kind under a fixed identifier.
pub fn add_node(tree: &mut NodeTree, registry: &NodeRegistry, kind: &str, identifier: &str) {
    let mut node = Node::new(kind);
    node.identifier = identifier.to_string();
    if let Some(node_kind) = registry.get(kind) {
        node_kind.create(&mut node);
    }
    tree.add_node(node);
}
