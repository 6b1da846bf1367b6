//! # Data Flow Resolver
//!
//! Resolves data dependencies between nodes to determine:
//! 1. Where each input value comes from (an upstream output or the socket default)
//! 2. The order in which nodes are executed
//!
//! The tree must have passed network validation: every link points at an
//! existing node and socket and every input holds at most one link.

use std::collections::{BTreeSet, HashMap};

use tracing::trace;

use crate::error::CompileError;
use crate::graph::NodeTree;

/// Where an input value comes from
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// Linked to another node's output
    Connection { source_node: String, source_socket: String },

    /// Unlinked, use the socket's own value
    Default { literal: String, module: Option<&'static str> },
}

/// Resolves data flow for a tree
#[derive(Debug, Clone)]
pub struct DataResolver {
    /// Maps (node, input socket) -> DataSource
    input_sources: HashMap<(String, String), DataSource>,

    /// Every node of the tree, upstream nodes first
    evaluation_order: Vec<String>,
}

impl DataResolver {
    pub fn build(tree: &NodeTree) -> Result<Self, CompileError> {
        let mut resolver = DataResolver {
            input_sources: HashMap::new(),
            evaluation_order: Vec::new(),
        };
        resolver.map_data_links(tree);
        resolver.compute_evaluation_order(tree)?;
        Ok(resolver)
    }

    fn map_data_links(&mut self, tree: &NodeTree) {
        for link in &tree.links {
            self.input_sources.insert(
                (link.to_node.clone(), link.to_socket.clone()),
                DataSource::Connection {
                    source_node: link.from_node.clone(),
                    source_socket: link.from_socket.clone(),
                },
            );
        }

        for node in &tree.nodes {
            for socket in &node.inputs {
                let key = (node.identifier.clone(), socket.identifier.clone());
                self.input_sources.entry(key).or_insert_with(|| {
                    let (literal, module) = socket.value_literal();
                    DataSource::Default { literal, module }
                });
            }
        }
    }

    /// Topological sort using Kahn's algorithm.
    ///
    /// Among nodes that are ready at the same time the one added to the tree
    /// first goes first, so the order is stable across compilations.
    fn compute_evaluation_order(&mut self, tree: &NodeTree) -> Result<(), CompileError> {
        let index: HashMap<&str, usize> = tree
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.identifier.as_str(), i))
            .collect();

        // in_degree[node] = number of links feeding this node
        let mut in_degree = vec![0usize; tree.nodes.len()];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); tree.nodes.len()];
        for link in &tree.links {
            let (Some(&from), Some(&to)) = (
                index.get(link.from_node.as_str()),
                index.get(link.to_node.as_str()),
            ) else {
                continue;
            };
            in_degree[to] += 1;
            dependents[from].push(to);
        }

        let mut ready: BTreeSet<usize> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, &degree)| degree == 0)
            .map(|(i, _)| i)
            .collect();

        while let Some(current) = ready.pop_first() {
            trace!(node = %tree.nodes[current].identifier, "scheduled");
            self.evaluation_order.push(tree.nodes[current].identifier.clone());
            for &dependent in &dependents[current] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }

        if self.evaluation_order.len() != tree.nodes.len() {
            let cyclic = tree
                .nodes
                .iter()
                .enumerate()
                .filter(|(i, _)| in_degree[*i] > 0)
                .map(|(_, node)| node.identifier.clone())
                .collect();
            return Err(CompileError::Cycle(cyclic));
        }
        Ok(())
    }

    pub fn input_source(&self, node: &str, socket: &str) -> Option<&DataSource> {
        self.input_sources
            .get(&(node.to_string(), socket.to_string()))
    }

    pub fn evaluation_order(&self) -> &[String] {
        &self.evaluation_order
    }
}
