//! # Network Validation
//!
//! A network is a connected component of a tree: nodes that reach each other
//! through links, ignoring direction. One broken node makes its whole network
//! invalid, while unrelated networks of the same tree stay valid.
//!
//! Checked before compilation:
//! - every node has an identifier of its own
//! - links refer to existing nodes and sockets
//! - no input holds more than one link
//! - every node kind is registered

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::graph::NodeTree;
use crate::node::NodeRegistry;
use crate::problems::Problem;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkReport {
    pub problems: Vec<Problem>,
    /// Nodes whose network contains at least one problem
    pub invalid_nodes: BTreeSet<String>,
}

impl NetworkReport {
    pub fn is_valid(&self) -> bool {
        self.problems.is_empty()
    }
}

pub fn validate_network(tree: &NodeTree, registry: &NodeRegistry) -> NetworkReport {
    let mut problems = Vec::new();

    // Analysis and naming are keyed by identifier
    let mut uses: HashMap<&str, usize> = HashMap::new();
    for node in &tree.nodes {
        *uses.entry(node.identifier.as_str()).or_default() += 1;
    }
    let mut reported = BTreeSet::new();
    for node in &tree.nodes {
        if node.identifier.is_empty() {
            problems.push(Problem::MissingIdentifier { kind: node.kind.clone() });
            continue;
        }
        let count = uses.get(node.identifier.as_str()).copied().unwrap_or(0);
        if count > 1 && reported.insert(node.identifier.as_str()) {
            problems.push(Problem::DuplicateIdentifier {
                node: node.identifier.clone(),
                count,
            });
        }
    }

    for node in &tree.nodes {
        if !registry.contains(&node.kind) {
            problems.push(Problem::UnknownNodeKind {
                node: node.identifier.clone(),
                kind: node.kind.clone(),
            });
        }
    }

    let mut incoming: HashMap<(&str, &str), usize> = HashMap::new();
    for link in &tree.links {
        for (node_id, socket, is_output) in [
            (&link.from_node, &link.from_socket, true),
            (&link.to_node, &link.to_socket, false),
        ] {
            match tree.node(node_id) {
                None => problems.push(Problem::MissingNode { node: node_id.clone() }),
                Some(node) => {
                    let exists = if is_output {
                        node.output(socket).is_some()
                    } else {
                        node.input(socket).is_some()
                    };
                    if !exists {
                        problems.push(Problem::MissingSocket {
                            node: node_id.clone(),
                            socket: socket.clone(),
                        });
                    }
                }
            }
        }
        *incoming
            .entry((link.to_node.as_str(), link.to_socket.as_str()))
            .or_default() += 1;
    }

    // Walk the tree's own order so the report is deterministic
    for node in &tree.nodes {
        for socket in &node.inputs {
            let count = incoming
                .get(&(node.identifier.as_str(), socket.identifier.as_str()))
                .copied()
                .unwrap_or(0);
            if count > 1 {
                problems.push(Problem::MultipleInputLinks {
                    node: node.identifier.clone(),
                    socket: socket.identifier.clone(),
                    count,
                });
            }
        }
    }

    let invalid_nodes = network_members(tree, problems.iter().flat_map(|p| p.nodes()));
    if !problems.is_empty() {
        debug!(tree = %tree.name, problems = problems.len(), invalid = invalid_nodes.len(), "invalid network");
    }
    NetworkReport {
        problems,
        invalid_nodes,
    }
}

/// All nodes sharing a network with any of `seeds`.
pub fn network_members<'a>(tree: &NodeTree, seeds: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    let networks = Networks::of(tree);
    let roots: BTreeSet<usize> = seeds
        .into_iter()
        .filter_map(|seed| networks.index.get(seed).copied())
        .map(|i| networks.find(i))
        .collect();
    tree.nodes
        .iter()
        .enumerate()
        .filter(|(i, _)| roots.contains(&networks.find(*i)))
        .map(|(_, node)| node.identifier.clone())
        .collect()
}

/// Set `in_invalid_network` on every node, true exactly for `invalid`.
///
/// The flag is not structural, so the tree revision is left alone.
pub fn apply_network_flags(tree: &mut NodeTree, invalid: &BTreeSet<String>) {
    for node in tree.nodes.iter_mut() {
        node.in_invalid_network = invalid.contains(&node.identifier);
    }
}

/// Connected components of a tree (union-find over node indices).
struct Networks<'a> {
    index: HashMap<&'a str, usize>,
    parent: Vec<usize>,
}

impl<'a> Networks<'a> {
    fn of(tree: &'a NodeTree) -> Self {
        let index: HashMap<&str, usize> = tree
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.identifier.as_str(), i))
            .collect();
        let mut networks = Self {
            parent: (0..tree.nodes.len()).collect(),
            index,
        };
        for link in &tree.links {
            if let (Some(&a), Some(&b)) = (
                networks.index.get(link.from_node.as_str()),
                networks.index.get(link.to_node.as_str()),
            ) {
                networks.union(a, b);
            }
        }
        networks
    }

    fn find(&self, mut i: usize) -> usize {
        while self.parent[i] != i {
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra.max(rb)] = ra.min(rb);
        }
    }
}
