//! # Type Analysis
//!
//! Checks that every link connects compatible socket types.
//!
//! ## Compatibility Rules
//!
//! - Same type always matches
//! - Generic and empty sockets accept anything
//! - Integer widens to float, boolean to integer or float
//! - Euler and quaternion are distinct, so are object and object list
//!
//! A mismatch is a warning: the host may still coerce the value at runtime,
//! so the tree is compiled anyway.

use crate::graph::{Link, NodeTree, SocketType};
use crate::problems::Problem;

pub struct TypeChecker<'a> {
    tree: &'a NodeTree,
}

impl<'a> TypeChecker<'a> {
    pub fn new(tree: &'a NodeTree) -> Self {
        Self { tree }
    }

    /// Check all links; links to missing nodes or sockets are skipped.
    pub fn check_all_links(&self) -> Vec<Problem> {
        self.tree
            .links
            .iter()
            .filter_map(|link| self.check_link(link))
            .collect()
    }

    fn check_link(&self, link: &Link) -> Option<Problem> {
        let from_type = self.socket_type(&link.from_node, &link.from_socket, true)?;
        let to_type = self.socket_type(&link.to_node, &link.to_socket, false)?;
        if from_type.is_compatible_with(&to_type) {
            return None;
        }
        Some(Problem::TypeMismatch {
            from_node: link.from_node.clone(),
            from_socket: link.from_socket.clone(),
            to_node: link.to_node.clone(),
            to_socket: link.to_socket.clone(),
            from_type: from_type.id_name().to_string(),
            to_type: to_type.id_name().to_string(),
        })
    }

    fn socket_type(&self, node: &str, socket: &str, is_output: bool) -> Option<SocketType> {
        let node = self.tree.node(node)?;
        let socket = if is_output { node.output(socket) } else { node.input(socket) };
        socket.map(|s| s.socket_type)
    }
}
