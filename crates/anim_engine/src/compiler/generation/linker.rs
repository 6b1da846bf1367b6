//! # Graph Linker
//!
//! Joins the tagged fragments of all nodes, in execution order, into one
//! [`FrameProcedure`]:
//!
//! - `#self#` becomes the node variable, bound once in the setup block
//! - `%input%` becomes the upstream output variable, or the socket's own
//!   value when the input is unlinked
//! - `$output$` becomes the variable unique to that node and socket
//!
//! A placeholder naming a socket the node does not have is emitted as the bare
//! name. The mistake then shows up when the procedure runs.

use serde::Serialize;
use tracing::warn;

use super::formatting::{format_procedure, NODES_ARGUMENT};
use super::fragment::{Fragment, Token};
use super::imports::ImportSet;
use crate::compiler::analysis::{DataResolver, DataSource};
use crate::compiler::core::CompilationOptions;
use crate::compiler::utils::VariableNames;
use crate::graph::Node;

/// The linked code of one tree, executed once per frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameProcedure {
    pub tree: String,
    pub function_name: String,
    /// Host modules to import, deduplicated
    pub modules: Vec<String>,
    /// Binds node variables to node objects
    pub setup: Vec<String>,
    pub body: Vec<String>,
    pub indent_width: usize,
}

impl FrameProcedure {
    /// Render the procedure as a function definition.
    pub fn to_source(&self) -> String {
        format_procedure(self, self.indent_width)
    }

    /// Executable lines, setup first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.setup.iter().chain(self.body.iter()).map(String::as_str)
    }
}

/// Code of one node, ready for linking.
#[derive(Debug, Clone)]
pub struct AssembledNode<'a> {
    pub node: &'a Node,
    /// Registered label of the node kind, used when the node has none
    pub label: &'static str,
    pub fragments: Vec<Fragment>,
    pub modules: Vec<String>,
}

pub struct Linker<'a> {
    resolver: &'a DataResolver,
    names: &'a VariableNames,
    options: &'a CompilationOptions,
    imports: ImportSet,
    setup: Vec<String>,
    body: Vec<String>,
}

impl<'a> Linker<'a> {
    pub fn new(
        resolver: &'a DataResolver,
        names: &'a VariableNames,
        options: &'a CompilationOptions,
    ) -> Self {
        Self {
            resolver,
            names,
            options,
            imports: ImportSet::new(),
            setup: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Link the nodes in the given order.
    pub fn link(mut self, tree: &str, nodes: &[AssembledNode<'_>]) -> FrameProcedure {
        for assembled in nodes {
            self.link_node(assembled);
        }
        FrameProcedure {
            tree: tree.to_string(),
            function_name: self.options.function_name.clone(),
            modules: self.imports.modules(),
            setup: self.setup,
            body: self.body,
            indent_width: self.options.indent_width,
        }
    }

    fn link_node(&mut self, assembled: &AssembledNode<'_>) {
        let node = assembled.node;
        self.imports.extend(assembled.modules.iter().cloned());
        if assembled.fragments.is_empty() {
            return;
        }

        if assembled.fragments.iter().any(Fragment::uses_self) {
            let var = self.node_variable(node);
            self.setup
                .push(format!("{var} = {NODES_ARGUMENT}[\"{}\"]", node.identifier));
        }
        if self.options.debug_comments {
            let label = node.label.as_deref().unwrap_or(assembled.label);
            self.body.push(format!("# {label} ({})", node.identifier));
        }
        for fragment in &assembled.fragments {
            let line = self.resolve(node, fragment);
            self.body.push(line);
        }
    }

    fn resolve(&mut self, node: &Node, fragment: &Fragment) -> String {
        let mut line = String::new();
        for token in fragment.tokens() {
            match token {
                Token::Text(text) => line.push_str(text),
                Token::SelfRef => line.push_str(&self.node_variable(node)),
                Token::Input(name) => line.push_str(&self.input_value(node, name)),
                Token::Output(name) => line.push_str(&self.output_variable(node, name)),
            }
        }
        line
    }

    fn node_variable(&self, node: &Node) -> String {
        self.names
            .node(&node.identifier)
            .map(str::to_string)
            .unwrap_or_else(|| node.identifier.clone())
    }

    fn input_value(&mut self, node: &Node, name: &str) -> String {
        let resolver = self.resolver;
        match resolver.input_source(&node.identifier, name) {
            Some(DataSource::Connection { source_node, source_socket }) => self
                .names
                .output(source_node, source_socket)
                .map(str::to_string)
                .unwrap_or_else(|| name.to_string()),
            Some(DataSource::Default { literal, module }) => {
                if let Some(module) = module {
                    self.imports.add(*module);
                }
                literal.clone()
            }
            None => {
                warn!(node = %node.identifier, input = name, "code refers to unknown input");
                name.to_string()
            }
        }
    }

    fn output_variable(&self, node: &Node, name: &str) -> String {
        match self.names.output(&node.identifier, name) {
            Some(var) => var.to_string(),
            None => {
                warn!(node = %node.identifier, output = name, "code refers to unknown output");
                name.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{NodeTree, SocketType, SocketValue};

    fn setup() -> (NodeTree, DataResolver, VariableNames) {
        let mut tree = NodeTree::new("link");
        let mut a = Node::new("test_A");
        a.identifier = "_a".to_string();
        a.new_output(SocketType::Vector, "Vector", "vector");
        let mut b = Node::new("test_B");
        b.identifier = "_b".to_string();
        b.new_input(SocketType::Vector, "Vector", "vector");
        b.new_input(SocketType::Vector, "Offset", "offset")
            .with_value(SocketValue::Vector([0.0, 0.0, 1.0]));
        b.new_output(SocketType::Vector, "Result", "result");
        tree.add_node(a);
        tree.add_node(b);
        tree.link("_a", "vector", "_b", "vector").unwrap();

        let resolver = DataResolver::build(&tree).unwrap();
        let names = VariableNames::for_tree(&tree);
        (tree, resolver, names)
    }

    #[test]
    fn test_resolves_links_defaults_and_self() {
        let (tree, resolver, names) = setup();
        let options = CompilationOptions::production();
        let nodes = vec![
            AssembledNode {
                node: tree.node("_a").unwrap(),
                label: "Test A",
                fragments: vec![Fragment::new().output("vector").text(" = ").self_ref().text(".get()")],
                modules: vec![],
            },
            AssembledNode {
                node: tree.node("_b").unwrap(),
                label: "Test B",
                fragments: vec![Fragment::new()
                    .output("result")
                    .text(" = ")
                    .input("vector")
                    .text(" + ")
                    .input("offset")],
                modules: vec![],
            },
        ];

        let procedure = Linker::new(&resolver, &names, &options).link("link", &nodes);
        assert_eq!(procedure.modules, vec!["mathutils"]);
        assert_eq!(procedure.setup, vec!["_a = nodes[\"_a\"]"]);
        assert_eq!(
            procedure.body,
            vec![
                "_a_vector = _a.get()",
                "_b_result = _a_vector + mathutils.Vector((0.0, 0.0, 1.0))",
            ]
        );
    }

    #[test]
    fn test_unknown_placeholder_left_bare() {
        let (tree, resolver, names) = setup();
        let options = CompilationOptions::production();
        let nodes = vec![AssembledNode {
            node: tree.node("_b").unwrap(),
            label: "Test B",
            fragments: vec![Fragment::new().output("missing").text(" = ").input("nothing")],
            modules: vec![],
        }];
        let procedure = Linker::new(&resolver, &names, &options).link("link", &nodes);
        assert_eq!(procedure.body, vec!["missing = nothing"]);
        assert!(procedure.setup.is_empty());
    }

    #[test]
    fn test_debug_comments() {
        let (tree, resolver, names) = setup();
        let options = CompilationOptions::default();
        let nodes = vec![AssembledNode {
            node: tree.node("_a").unwrap(),
            label: "Test A",
            fragments: vec![Fragment::new().output("vector").text(" = None")],
            modules: vec!["random".to_string()],
        }];
        let procedure = Linker::new(&resolver, &names, &options).link("link", &nodes);
        assert_eq!(procedure.body, vec!["# Test A (_a)", "_a_vector = None"]);
        assert_eq!(procedure.modules, vec!["random"]);
    }
}
