//! # Variable Generation
//!
//! Every node and every output socket of a tree gets exactly one variable
//! name in the generated procedure:
//!
//! - node variable: the sanitized node identifier (`_k3j2...`)
//! - output variable: `{node variable}_{sanitized socket identifier}`
//!
//! Names are unique across the procedure; a clash gets a numeric suffix.

use std::collections::{HashMap, HashSet};

use crate::graph::NodeTree;

#[derive(Debug, Clone, Default)]
pub struct VariableNames {
    nodes: HashMap<String, String>,
    outputs: HashMap<(String, String), String>,
}

impl VariableNames {
    /// Name every node and output socket of the tree.
    pub fn for_tree(tree: &NodeTree) -> Self {
        let mut names = Self::default();
        let mut used = HashSet::new();

        for node in &tree.nodes {
            let node_var = unique_name(&mut used, sanitize_var_name(&node.identifier));
            for output in &node.outputs {
                let output_var = unique_name(
                    &mut used,
                    format!("{}_{}", node_var, sanitize_var_name(&output.identifier)),
                );
                names
                    .outputs
                    .insert((node.identifier.clone(), output.identifier.clone()), output_var);
            }
            names.nodes.insert(node.identifier.clone(), node_var);
        }
        names
    }

    pub fn node(&self, node: &str) -> Option<&str> {
        self.nodes.get(node).map(String::as_str)
    }

    pub fn output(&self, node: &str, socket: &str) -> Option<&str> {
        self.outputs
            .get(&(node.to_string(), socket.to_string()))
            .map(String::as_str)
    }
}

fn unique_name(used: &mut HashSet<String>, name: String) -> String {
    let mut candidate = name.clone();
    let mut counter = 1;
    while used.contains(&candidate) {
        candidate = format!("{name}_{counter}");
        counter += 1;
    }
    used.insert(candidate.clone());
    candidate
}

/// Make a string usable as a variable name.
pub fn sanitize_var_name(name: &str) -> String {
    let mut sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if sanitized.is_empty() || sanitized.starts_with(|c: char| c.is_ascii_digit()) {
        sanitized.insert(0, '_');
    }
    sanitized
}
