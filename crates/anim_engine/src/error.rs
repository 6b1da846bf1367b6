use thiserror::Error;

use crate::problems::Problem;

/// Errors raised while editing a node tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("unknown node kind '{0}'")]
    UnknownKind(String),

    #[error("node '{0}' not found")]
    NodeNotFound(String),

    #[error("socket '{socket}' not found on node '{node}'")]
    SocketNotFound { node: String, socket: String },

    #[error("tree '{0}' not found")]
    TreeNotFound(String),
}

/// Errors that stop a node tree from compiling.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("tree '{tree}' is in an invalid network ({} problem(s))", problems.len())]
    InvalidNetwork { tree: String, problems: Vec<Problem> },

    #[error("cyclic dependency detected between nodes: {}", .0.join(", "))]
    Cycle(Vec<String>),

    #[error("unknown node kind '{kind}' on node '{node}'")]
    UnknownKind { node: String, kind: String },
}

impl CompileError {
    /// Problems to report for this error.
    pub fn problems(&self) -> Vec<Problem> {
        match self {
            Self::InvalidNetwork { problems, .. } => problems.clone(),
            Self::Cycle(nodes) => vec![Problem::Cycle { nodes: nodes.clone() }],
            Self::UnknownKind { node, kind } => vec![Problem::UnknownNodeKind {
                node: node.clone(),
                kind: kind.clone(),
            }],
        }
    }
}
