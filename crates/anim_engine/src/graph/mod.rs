use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

use crate::error::GraphError;
use crate::node::NodeRegistry;

pub mod identifier;
pub mod type_system;

pub use identifier::{create_identifier, is_valid_identifier, repair_identifiers};
pub use type_system::*;

/// A set of node trees loaded together (one host document).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    pub trees: Vec<NodeTree>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeTree {
    pub name: String,
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    pub metadata: TreeMetadata,
    /// Bumped on every structural change, used to invalidate compiled code
    #[serde(skip, default = "next_revision")]
    revision: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeMetadata {
    #[serde(default)]
    pub description: String,
    pub created_at: String,
    pub modified_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique, never changes once assigned; empty means "needs repair"
    #[serde(default)]
    pub identifier: String,
    /// Registered kind name, e.g. `an_ColorMix`
    pub kind: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub inputs: Vec<Socket>,
    #[serde(default)]
    pub outputs: Vec<Socket>,
    #[serde(default)]
    pub properties: BTreeMap<String, SocketValue>,
    #[serde(default)]
    pub in_invalid_network: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Socket {
    /// Display name
    pub name: String,
    /// Logical name used by the node's code, unique per side of the node
    pub identifier: String,
    pub socket_type: SocketType,
    #[serde(default)]
    pub value: SocketValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub from_node: String,
    pub from_socket: String,
    pub to_node: String,
    pub to_socket: String,
}

static REVISION: AtomicU64 = AtomicU64::new(1);

fn next_revision() -> u64 {
    REVISION.fetch_add(1, Ordering::Relaxed)
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn tree(&self, name: &str) -> Option<&NodeTree> {
        self.trees.iter().find(|tree| tree.name == name)
    }

    pub fn tree_mut(&mut self, name: &str) -> Option<&mut NodeTree> {
        self.trees.iter_mut().find(|tree| tree.name == name)
    }

    pub fn add_tree(&mut self, tree: NodeTree) -> &mut NodeTree {
        self.trees.push(tree);
        let last = self.trees.len() - 1;
        &mut self.trees[last]
    }

    /// Fill in missing node identifiers, see [`repair_identifiers`].
    pub fn repair(&mut self) -> usize {
        repair_identifiers(self)
    }
}

impl NodeTree {
    pub fn new(name: &str) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            name: name.to_string(),
            nodes: Vec::new(),
            links: Vec::new(),
            metadata: TreeMetadata {
                description: String::new(),
                created_at: now.clone(),
                modified_at: now,
            },
            revision: next_revision(),
        }
    }

    /// Structural revision; changes whenever nodes, sockets or links change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn touch(&mut self) {
        self.revision = next_revision();
        self.metadata.modified_at = chrono::Utc::now().to_rfc3339();
    }

    pub fn node(&self, identifier: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.identifier == identifier)
    }

    pub fn node_mut(&mut self, identifier: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| node.identifier == identifier)
    }

    fn require_node(&self, identifier: &str) -> Result<&Node, GraphError> {
        self.node(identifier)
            .ok_or_else(|| GraphError::NodeNotFound(identifier.to_string()))
    }

    /// Create a node of a registered kind and run its `create` hook.
    ///
    /// Returns the identifier of the new node.
    pub fn new_node(&mut self, registry: &NodeRegistry, kind: &str) -> Result<String, GraphError> {
        let node_kind = registry.require(kind)?;
        let mut node = Node::new(kind);
        node_kind.create(&mut node);
        let identifier = node.identifier.clone();
        debug!(tree = %self.name, node = %identifier, kind, "created node");
        self.add_node(node);
        Ok(identifier)
    }

    /// Insert an already built node.
    pub fn add_node(&mut self, node: Node) {
        self.nodes.push(node);
        self.touch();
    }

    /// Copy a node (without its links). The copy gets a fresh identifier.
    pub fn duplicate_node(&mut self, registry: &NodeRegistry, source: &str) -> Result<String, GraphError> {
        let source_node = self.require_node(source)?.clone();
        let node_kind = registry.require(&source_node.kind)?;

        let mut copy = source_node.clone();
        copy.identifier = create_identifier();
        copy.in_invalid_network = false;
        node_kind.duplicate(&mut copy, &source_node);

        let identifier = copy.identifier.clone();
        debug!(tree = %self.name, source, copy = %identifier, "duplicated node");
        self.add_node(copy);
        Ok(identifier)
    }

    /// Remove a node and every link touching it.
    pub fn remove_node(&mut self, registry: &NodeRegistry, identifier: &str) -> Result<Node, GraphError> {
        let index = self
            .nodes
            .iter()
            .position(|node| node.identifier == identifier)
            .ok_or_else(|| GraphError::NodeNotFound(identifier.to_string()))?;
        let node = self.nodes.remove(index);
        match registry.get(&node.kind) {
            Some(kind) => kind.delete(&node),
            None => warn!(node = %identifier, kind = %node.kind, "removed node of unknown kind"),
        }
        self.links
            .retain(|link| link.from_node != identifier && link.to_node != identifier);
        self.touch();
        Ok(node)
    }

    /// Link an output socket to an input socket.
    ///
    /// An input holds at most one link, so an existing link into the target
    /// input is replaced.
    pub fn link(
        &mut self,
        from_node: &str,
        from_socket: &str,
        to_node: &str,
        to_socket: &str,
    ) -> Result<(), GraphError> {
        let source = self.require_node(from_node)?;
        if source.output(from_socket).is_none() {
            return Err(GraphError::SocketNotFound {
                node: from_node.to_string(),
                socket: from_socket.to_string(),
            });
        }
        let target = self.require_node(to_node)?;
        if target.input(to_socket).is_none() {
            return Err(GraphError::SocketNotFound {
                node: to_node.to_string(),
                socket: to_socket.to_string(),
            });
        }

        self.links
            .retain(|link| !(link.to_node == to_node && link.to_socket == to_socket));
        self.links.push(Link {
            from_node: from_node.to_string(),
            from_socket: from_socket.to_string(),
            to_node: to_node.to_string(),
            to_socket: to_socket.to_string(),
        });
        self.touch();
        Ok(())
    }

    /// Remove the link into an input socket. Returns whether one existed.
    pub fn unlink(&mut self, to_node: &str, to_socket: &str) -> bool {
        let before = self.links.len();
        self.links
            .retain(|link| !(link.to_node == to_node && link.to_socket == to_socket));
        let removed = self.links.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    /// The link feeding an input socket, if any.
    pub fn input_link(&self, node: &str, socket: &str) -> Option<&Link> {
        self.links
            .iter()
            .find(|link| link.to_node == node && link.to_socket == socket)
    }

    pub fn is_input_linked(&self, node: &str, socket: &str) -> bool {
        self.input_link(node, socket).is_some()
    }

    pub fn is_output_linked(&self, node: &str, socket: &str) -> bool {
        self.links
            .iter()
            .any(|link| link.from_node == node && link.from_socket == socket)
    }

    /// Nodes feeding any input of `node`, without duplicates.
    pub fn origin_nodes(&self, node: &str) -> Vec<&str> {
        let mut origins: Vec<&str> = Vec::new();
        for link in self.links.iter().filter(|link| link.to_node == node) {
            if !origins.contains(&link.from_node.as_str()) {
                origins.push(&link.from_node);
            }
        }
        origins
    }

    /// Input sockets of `node` without an incoming link.
    pub fn unlinked_inputs(&self, node: &str) -> Vec<&Socket> {
        match self.node(node) {
            Some(n) => n
                .inputs
                .iter()
                .filter(|socket| !self.is_input_linked(node, &socket.identifier))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Set a node property and let the node kind react to it.
    pub fn set_property(
        &mut self,
        registry: &NodeRegistry,
        node: &str,
        property: &str,
        value: SocketValue,
    ) -> Result<(), GraphError> {
        let kind = registry.require(&self.require_node(node)?.kind)?;
        let target = self
            .node_mut(node)
            .ok_or_else(|| GraphError::NodeNotFound(node.to_string()))?;
        target.properties.insert(property.to_string(), value);
        kind.property_changed(target, property);
        self.prune_dangling_links();
        self.touch();
        Ok(())
    }

    /// Run the `edit` hook of a node, e.g. after the user linked into it.
    pub fn edit_node(&mut self, registry: &NodeRegistry, node: &str) -> Result<(), GraphError> {
        let kind = registry.require(&self.require_node(node)?.kind)?;
        if let Some(target) = self.node_mut(node) {
            kind.edit(target);
        }
        self.prune_dangling_links();
        self.touch();
        Ok(())
    }

    /// Remove one socket of a node together with its links.
    pub fn remove_socket(
        &mut self,
        registry: &NodeRegistry,
        node: &str,
        socket: &str,
        is_output: bool,
    ) -> Result<Socket, GraphError> {
        let kind = registry.require(&self.require_node(node)?.kind)?;
        let target = self
            .node_mut(node)
            .ok_or_else(|| GraphError::NodeNotFound(node.to_string()))?;
        let sockets = if is_output { &mut target.outputs } else { &mut target.inputs };
        let index = sockets
            .iter()
            .position(|s| s.identifier == socket)
            .ok_or_else(|| GraphError::SocketNotFound {
                node: node.to_string(),
                socket: socket.to_string(),
            })?;
        let removed = sockets.remove(index);
        kind.socket_changed(target);
        self.prune_dangling_links();
        self.touch();
        Ok(removed)
    }

    /// Move a socket to a new position on its side of the node.
    pub fn move_socket(
        &mut self,
        registry: &NodeRegistry,
        node: &str,
        socket: &str,
        is_output: bool,
        new_index: usize,
    ) -> Result<(), GraphError> {
        let kind = registry.require(&self.require_node(node)?.kind)?;
        let target = self
            .node_mut(node)
            .ok_or_else(|| GraphError::NodeNotFound(node.to_string()))?;
        let sockets = if is_output { &mut target.outputs } else { &mut target.inputs };
        let index = sockets
            .iter()
            .position(|s| s.identifier == socket)
            .ok_or_else(|| GraphError::SocketNotFound {
                node: node.to_string(),
                socket: socket.to_string(),
            })?;
        let moved = sockets.remove(index);
        let new_index = new_index.min(sockets.len());
        sockets.insert(new_index, moved);
        kind.socket_changed(target);
        self.touch();
        Ok(())
    }

    /// Drop links whose nodes or sockets no longer exist.
    pub fn prune_dangling_links(&mut self) -> usize {
        let before = self.links.len();
        let nodes = &self.nodes;
        self.links.retain(|link| {
            let from_ok = nodes
                .iter()
                .find(|n| n.identifier == link.from_node)
                .is_some_and(|n| n.output(&link.from_socket).is_some());
            let to_ok = nodes
                .iter()
                .find(|n| n.identifier == link.to_node)
                .is_some_and(|n| n.input(&link.to_socket).is_some());
            from_ok && to_ok
        });
        let removed = before - self.links.len();
        if removed > 0 {
            debug!(tree = %self.name, removed, "pruned dangling links");
            self.touch();
        }
        removed
    }
}

impl Node {
    /// A node without sockets and with a fresh identifier.
    pub fn new(kind: &str) -> Self {
        Self {
            identifier: create_identifier(),
            kind: kind.to_string(),
            label: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
            properties: BTreeMap::new(),
            in_invalid_network: false,
        }
    }

    /// Append an input socket. The identifier is made unique among inputs.
    pub fn new_input(&mut self, socket_type: SocketType, name: &str, identifier: &str) -> &mut Socket {
        let identifier = unique_socket_identifier(&self.inputs, identifier);
        self.inputs.push(Socket::new(socket_type, name, &identifier));
        let last = self.inputs.len() - 1;
        &mut self.inputs[last]
    }

    /// Append an output socket. The identifier is made unique among outputs.
    pub fn new_output(&mut self, socket_type: SocketType, name: &str, identifier: &str) -> &mut Socket {
        let identifier = unique_socket_identifier(&self.outputs, identifier);
        self.outputs.push(Socket::new(socket_type, name, &identifier));
        let last = self.outputs.len() - 1;
        &mut self.outputs[last]
    }

    pub fn input(&self, identifier: &str) -> Option<&Socket> {
        self.inputs.iter().find(|s| s.identifier == identifier)
    }

    pub fn output(&self, identifier: &str) -> Option<&Socket> {
        self.outputs.iter().find(|s| s.identifier == identifier)
    }

    pub fn input_mut(&mut self, identifier: &str) -> Option<&mut Socket> {
        self.inputs.iter_mut().find(|s| s.identifier == identifier)
    }

    /// Logical input names in declaration order.
    pub fn input_names(&self) -> Vec<&str> {
        self.inputs.iter().map(|s| s.identifier.as_str()).collect()
    }

    /// Logical output names in declaration order.
    pub fn output_names(&self) -> Vec<&str> {
        self.outputs.iter().map(|s| s.identifier.as_str()).collect()
    }

    pub fn sockets(&self) -> impl Iterator<Item = &Socket> {
        self.inputs.iter().chain(self.outputs.iter())
    }

    pub fn clear_sockets(&mut self) {
        self.inputs.clear();
        self.outputs.clear();
    }

    pub fn property(&self, name: &str) -> Option<&SocketValue> {
        self.properties.get(name)
    }

    /// Label shown for the node; falls back to the kind name.
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.kind)
    }
}

impl Socket {
    pub fn new(socket_type: SocketType, name: &str, identifier: &str) -> Self {
        Self {
            name: name.to_string(),
            identifier: identifier.to_string(),
            socket_type,
            value: socket_type.default_value(),
        }
    }

    pub fn with_value(&mut self, value: SocketValue) -> &mut Self {
        self.value = value;
        self
    }

    /// Literal used in place of an unlinked input, with the module it needs.
    pub fn value_literal(&self) -> (String, Option<&'static str>) {
        match (&self.value, self.socket_type) {
            (SocketValue::None, SocketType::Mesh) => ("bmesh.new()".to_string(), Some("bmesh")),
            (value, _) => (value.to_literal(), value.required_module()),
        }
    }
}

fn unique_socket_identifier(existing: &[Socket], identifier: &str) -> String {
    if !existing.iter().any(|s| s.identifier == identifier) {
        return identifier.to_string();
    }
    (1..)
        .map(|n| format!("{identifier}_{n:03}"))
        .find(|candidate| !existing.iter().any(|s| &s.identifier == candidate))
        .unwrap_or_else(|| identifier.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{CodeContext, CodeContract, NodeDeclaration, NodeKind};

    struct Mix;

    impl NodeKind for Mix {
        fn declaration(&self) -> NodeDeclaration {
            NodeDeclaration::new("test_Mix", "Mix")
        }

        fn create(&self, node: &mut Node) {
            node.new_input(SocketType::Float, "Factor", "factor");
            node.new_input(SocketType::Color, "A", "a");
            node.new_output(SocketType::Color, "Color", "color");
        }

        fn code(&self, _node: &Node, _ctx: &CodeContext) -> CodeContract {
            CodeContract::Procedure
        }
    }

    fn registry() -> NodeRegistry {
        let mut registry = NodeRegistry::new();
        registry.register(Mix);
        registry
    }

    #[test]
    fn test_new_node_assigns_identifier_and_sockets() {
        let registry = registry();
        let mut tree = NodeTree::new("tree");
        let a = tree.new_node(&registry, "test_Mix").unwrap();
        let b = tree.new_node(&registry, "test_Mix").unwrap();

        assert!(is_valid_identifier(&a));
        assert_ne!(a, b);
        let node = tree.node(&a).unwrap();
        assert_eq!(node.input_names(), vec!["factor", "a"]);
        assert_eq!(node.output_names(), vec!["color"]);
    }

    #[test]
    fn test_unknown_kind() {
        let mut tree = NodeTree::new("tree");
        let err = tree.new_node(&registry(), "missing").unwrap_err();
        assert_eq!(err, GraphError::UnknownKind("missing".to_string()));
    }

    #[test]
    fn test_duplicate_gets_fresh_identifier() {
        let registry = registry();
        let mut tree = NodeTree::new("tree");
        let source = tree.new_node(&registry, "test_Mix").unwrap();
        let copy = tree.duplicate_node(&registry, &source).unwrap();

        assert_ne!(source, copy);
        assert_eq!(tree.nodes.len(), 2);
        assert_eq!(tree.node(&copy).unwrap().kind, "test_Mix");
    }

    #[test]
    fn test_link_replaces_existing_input_link() {
        let registry = registry();
        let mut tree = NodeTree::new("tree");
        let a = tree.new_node(&registry, "test_Mix").unwrap();
        let b = tree.new_node(&registry, "test_Mix").unwrap();
        let c = tree.new_node(&registry, "test_Mix").unwrap();

        tree.link(&a, "color", &c, "a").unwrap();
        tree.link(&b, "color", &c, "a").unwrap();

        assert_eq!(tree.links.len(), 1);
        assert_eq!(tree.input_link(&c, "a").unwrap().from_node, b);
        assert!(tree.is_output_linked(&b, "color"));
        assert!(!tree.is_output_linked(&a, "color"));
        assert_eq!(tree.origin_nodes(&c), vec![b.as_str()]);
        assert_eq!(tree.unlinked_inputs(&c).len(), 1);
    }

    #[test]
    fn test_link_rejects_missing_socket() {
        let registry = registry();
        let mut tree = NodeTree::new("tree");
        let a = tree.new_node(&registry, "test_Mix").unwrap();
        let b = tree.new_node(&registry, "test_Mix").unwrap();

        let err = tree.link(&a, "nope", &b, "a").unwrap_err();
        assert!(matches!(err, GraphError::SocketNotFound { .. }));
        let err = tree.link(&a, "color", "_missing", "a").unwrap_err();
        assert!(matches!(err, GraphError::NodeNotFound(_)));
    }

    #[test]
    fn test_remove_node_drops_links() {
        let registry = registry();
        let mut tree = NodeTree::new("tree");
        let a = tree.new_node(&registry, "test_Mix").unwrap();
        let b = tree.new_node(&registry, "test_Mix").unwrap();
        tree.link(&a, "color", &b, "a").unwrap();

        tree.remove_node(&registry, &a).unwrap();
        assert!(tree.links.is_empty());
        assert!(tree.node(&a).is_none());
    }

    #[test]
    fn test_revision_changes_on_edit() {
        let registry = registry();
        let mut tree = NodeTree::new("tree");
        let r0 = tree.revision();
        let a = tree.new_node(&registry, "test_Mix").unwrap();
        let r1 = tree.revision();
        assert_ne!(r0, r1);

        let b = tree.new_node(&registry, "test_Mix").unwrap();
        let r2 = tree.revision();
        tree.link(&a, "color", &b, "a").unwrap();
        assert_ne!(tree.revision(), r2);

        let r3 = tree.revision();
        assert!(!tree.unlink(&a, "a"));
        assert_eq!(tree.revision(), r3);
    }

    #[test]
    fn test_remove_and_move_socket() {
        let registry = registry();
        let mut tree = NodeTree::new("tree");
        let a = tree.new_node(&registry, "test_Mix").unwrap();
        let b = tree.new_node(&registry, "test_Mix").unwrap();
        tree.link(&a, "color", &b, "a").unwrap();

        tree.move_socket(&registry, &b, "a", false, 0).unwrap();
        assert_eq!(tree.node(&b).unwrap().input_names(), vec!["a", "factor"]);

        let removed = tree.remove_socket(&registry, &b, "a", false).unwrap();
        assert_eq!(removed.identifier, "a");
        assert!(tree.links.is_empty());
    }

    #[test]
    fn test_socket_identifiers_are_unique() {
        let mut node = Node::new("test_Group");
        node.new_output(SocketType::Generic, "Parameter", "parameter");
        node.new_output(SocketType::Generic, "Parameter", "parameter");
        node.new_output(SocketType::Generic, "Parameter", "parameter");
        assert_eq!(node.output_names(), vec!["parameter", "parameter_001", "parameter_002"]);
    }

    #[test]
    fn test_document_json_round_trip_keeps_identifiers() {
        let registry = registry();
        let mut document = Document::new();
        let tree = document.add_tree(NodeTree::new("main"));
        let a = tree.new_node(&registry, "test_Mix").unwrap();

        let json = document.to_json().unwrap();
        let loaded = Document::from_json(&json).unwrap();
        let tree = loaded.tree("main").unwrap();
        assert_eq!(tree.nodes[0].identifier, a);
        assert_eq!(tree.nodes[0].inputs[0].value, SocketValue::Float(0.0));
    }

    #[test]
    fn test_mesh_default_literal() {
        let socket = Socket::new(SocketType::Mesh, "Mesh", "bm");
        assert_eq!(socket.value_literal(), ("bmesh.new()".to_string(), Some("bmesh")));
    }
}
