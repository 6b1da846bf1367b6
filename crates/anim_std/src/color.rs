//! # Color Nodes

use anim_engine::{CodeContext, CodeContract, Node, NodeDeclaration, NodeKind, SocketType};

/// Linear mix of two colors. The node object clamps the factor to `0..=1`.
///
/// # Inputs
/// - `factor`: 0 gives `a`, 1 gives `b`
/// - `a`, `b`: RGBA colors
///
/// # Outputs
/// - `color`: the mixed color
pub struct ColorMix;

impl NodeKind for ColorMix {
    fn declaration(&self) -> NodeDeclaration {
        NodeDeclaration::new("an_ColorMix", "Color Mix")
            .category("Color")
            .search_tags(&["Mix Colors", "Blend"])
    }

    fn create(&self, node: &mut Node) {
        node.new_input(SocketType::Float, "Factor", "factor");
        node.new_input(SocketType::Color, "Color 1", "a");
        node.new_input(SocketType::Color, "Color 2", "b");
        node.new_output(SocketType::Color, "Color", "color");
    }

    fn code(&self, _node: &Node, _ctx: &CodeContext) -> CodeContract {
        CodeContract::Procedure
    }
}
