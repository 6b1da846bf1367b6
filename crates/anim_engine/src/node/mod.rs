//! # Node kinds
//!
//! A node kind describes how a node is declared (its sockets), how it reacts
//! to edits, and what code it contributes to the frame procedure. Kinds are
//! registered in a [`NodeRegistry`] under their `id_name`.

use std::collections::BTreeSet;

use crate::graph::{Node, NodeTree};

pub mod registry;

pub use registry::NodeRegistry;

/// Static description of a node kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDeclaration {
    /// Registration name, e.g. `an_ColorMix`
    pub id_name: &'static str,
    /// Human readable label
    pub label: &'static str,
    /// Category for grouping nodes in menus
    pub category: &'static str,
    pub search_tags: &'static [&'static str],
    /// Only the search tags are searchable, not the label
    pub only_search_tags: bool,
}

impl NodeDeclaration {
    pub const fn new(id_name: &'static str, label: &'static str) -> Self {
        Self {
            id_name,
            label,
            category: "General",
            search_tags: &[],
            only_search_tags: false,
        }
    }

    pub const fn category(mut self, category: &'static str) -> Self {
        self.category = category;
        self
    }

    pub const fn search_tags(mut self, tags: &'static [&'static str]) -> Self {
        self.search_tags = tags;
        self
    }

    pub const fn only_search_tags(mut self) -> Self {
        self.only_search_tags = true;
        self
    }
}

/// How a node contributes code to the frame procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeContract {
    /// Call `self.execute(inputs...)` and unpack the outputs
    Procedure,
    /// Inline code written in terms of the socket identifiers and `self`
    Raw(RawCode),
}

/// Inline code of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawCode {
    Empty,
    Single(String),
    Lines(Vec<String>),
}

impl RawCode {
    /// The code as one string, lines joined with `\n`.
    pub fn joined(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Single(code) => code.clone(),
            Self::Lines(lines) => lines.join("\n"),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Single(code) => code.is_empty(),
            Self::Lines(lines) => lines.iter().all(|line| line.is_empty()),
        }
    }
}

impl From<&str> for RawCode {
    fn from(code: &str) -> Self {
        Self::Single(code.to_string())
    }
}

impl From<String> for RawCode {
    fn from(code: String) -> Self {
        Self::Single(code)
    }
}

impl From<Vec<String>> for RawCode {
    fn from(lines: Vec<String>) -> Self {
        Self::Lines(lines)
    }
}

/// Information about a node's surroundings available while generating code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeContext {
    linked_inputs: BTreeSet<String>,
    linked_outputs: BTreeSet<String>,
}

impl CodeContext {
    pub fn for_node(tree: &NodeTree, node: &Node) -> Self {
        let linked_inputs = node
            .inputs
            .iter()
            .filter(|s| tree.is_input_linked(&node.identifier, &s.identifier))
            .map(|s| s.identifier.clone())
            .collect();
        let linked_outputs = node
            .outputs
            .iter()
            .filter(|s| tree.is_output_linked(&node.identifier, &s.identifier))
            .map(|s| s.identifier.clone())
            .collect();
        Self {
            linked_inputs,
            linked_outputs,
        }
    }

    /// Context of a node whose outputs are all in use.
    pub fn all_linked(node: &Node) -> Self {
        Self {
            linked_inputs: node.inputs.iter().map(|s| s.identifier.clone()).collect(),
            linked_outputs: node.outputs.iter().map(|s| s.identifier.clone()).collect(),
        }
    }

    pub fn is_input_linked(&self, socket: &str) -> bool {
        self.linked_inputs.contains(socket)
    }

    pub fn is_output_linked(&self, socket: &str) -> bool {
        self.linked_outputs.contains(socket)
    }

    pub fn any_output_linked(&self) -> bool {
        !self.linked_outputs.is_empty()
    }
}

/// Behaviour of one kind of node.
///
/// Only [`declaration`](NodeKind::declaration), [`create`](NodeKind::create)
/// and [`code`](NodeKind::code) are required; the edit hooks default to doing
/// nothing.
pub trait NodeKind: Send + Sync {
    fn declaration(&self) -> NodeDeclaration;

    /// Declare the sockets and initial properties of a new node.
    fn create(&self, node: &mut Node);

    fn code(&self, node: &Node, ctx: &CodeContext) -> CodeContract;

    /// Host modules the node's code refers to.
    fn used_modules(&self, _node: &Node) -> Vec<String> {
        Vec::new()
    }

    fn edit(&self, _node: &mut Node) {}

    /// Called on the copy after `source` was duplicated.
    fn duplicate(&self, _node: &mut Node, _source: &Node) {}

    fn delete(&self, _node: &Node) {}

    fn socket_changed(&self, _node: &mut Node) {}

    fn property_changed(&self, _node: &mut Node, _property: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SocketType;

    #[test]
    fn test_raw_code_joined() {
        assert_eq!(RawCode::Empty.joined(), "");
        assert_eq!(RawCode::from("a = b").joined(), "a = b");
        let lines = RawCode::from(vec!["a = 1".to_string(), "b = a".to_string()]);
        assert_eq!(lines.joined(), "a = 1\nb = a");
        assert!(RawCode::Lines(vec![String::new()]).is_empty());
    }

    #[test]
    fn test_code_context_tracks_links() {
        let mut tree = NodeTree::new("ctx");
        let mut a = Node::new("test_A");
        a.new_output(SocketType::Float, "Value", "value");
        a.new_output(SocketType::Float, "Other", "other");
        let mut b = Node::new("test_B");
        b.new_input(SocketType::Float, "Value", "value");
        let (a_id, b_id) = (a.identifier.clone(), b.identifier.clone());
        tree.add_node(a);
        tree.add_node(b);
        tree.link(&a_id, "value", &b_id, "value").unwrap();

        let ctx = CodeContext::for_node(&tree, tree.node(&a_id).unwrap());
        assert!(ctx.is_output_linked("value"));
        assert!(!ctx.is_output_linked("other"));
        assert!(ctx.any_output_linked());

        let ctx = CodeContext::for_node(&tree, tree.node(&b_id).unwrap());
        assert!(ctx.is_input_linked("value"));
        assert!(!ctx.any_output_linked());
    }
}
