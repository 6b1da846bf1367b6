//! Problems shown to the user, collected per tree.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub enum Problem {
    #[error("node '{node}' has unknown kind '{kind}'")]
    UnknownNodeKind { node: String, kind: String },

    #[error("identifier '{node}' is shared by {count} nodes")]
    DuplicateIdentifier { node: String, count: usize },

    #[error("a node of kind '{kind}' has no identifier")]
    MissingIdentifier { kind: String },

    #[error("link references missing node '{node}'")]
    MissingNode { node: String },

    #[error("link references missing socket '{socket}' on node '{node}'")]
    MissingSocket { node: String, socket: String },

    #[error("input '{socket}' of node '{node}' has {count} incoming links")]
    MultipleInputLinks { node: String, socket: String, count: usize },

    #[error("cyclic dependency between nodes: {}", nodes.join(", "))]
    Cycle { nodes: Vec<String> },

    #[error("link {from_node}.{from_socket} -> {to_node}.{to_socket}: {from_type} is not compatible with {to_type}")]
    TypeMismatch {
        from_node: String,
        from_socket: String,
        to_node: String,
        to_socket: String,
        from_type: String,
        to_type: String,
    },

    #[error("execution failed: {message}")]
    ExecutionFailed { message: String },
}

impl Problem {
    pub fn severity(&self) -> Severity {
        match self {
            Self::TypeMismatch { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Problems that keep a tree from being compiled.
    pub fn is_blocking(&self) -> bool {
        self.severity() == Severity::Error
    }

    /// Nodes the problem is about.
    pub fn nodes(&self) -> Vec<&str> {
        match self {
            Self::UnknownNodeKind { node, .. }
            | Self::DuplicateIdentifier { node, .. }
            | Self::MissingNode { node }
            | Self::MissingSocket { node, .. }
            | Self::MultipleInputLinks { node, .. } => vec![node.as_str()],
            Self::Cycle { nodes } => nodes.iter().map(String::as_str).collect(),
            Self::TypeMismatch { from_node, to_node, .. } => vec![from_node.as_str(), to_node.as_str()],
            Self::MissingIdentifier { .. } => vec![""],
            Self::ExecutionFailed { .. } => Vec::new(),
        }
    }
}

/// One entry of the problems list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportedProblem {
    pub tree: String,
    pub problem: Problem,
}

impl fmt::Display for ReportedProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.tree, self.problem)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProblemList {
    entries: Vec<ReportedProblem>,
}

impl ProblemList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, tree: &str, problem: Problem) {
        let entry = ReportedProblem {
            tree: tree.to_string(),
            problem,
        };
        if !self.entries.contains(&entry) {
            self.entries.push(entry);
        }
    }

    pub fn extend(&mut self, tree: &str, problems: impl IntoIterator<Item = Problem>) {
        for problem in problems {
            self.report(tree, problem);
        }
    }

    /// Forget everything reported for one tree.
    pub fn clear_tree(&mut self, tree: &str) {
        self.entries.retain(|entry| entry.tree != tree);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn for_tree<'a>(&'a self, tree: &'a str) -> impl Iterator<Item = &'a Problem> + 'a {
        self.entries
            .iter()
            .filter(move |entry| entry.tree == tree)
            .map(|entry| &entry.problem)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReportedProblem> {
        self.entries.iter()
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|entry| entry.problem.is_blocking())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
