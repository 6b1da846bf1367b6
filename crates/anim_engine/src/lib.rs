//! # Animation node engine
//!
//! Node graph model and the compiler that turns an animation node tree into a
//! frame procedure for the host's scripting runtime.
//!
//! - [`graph`]: documents, node trees, nodes, sockets and links
//! - [`node`]: the node kind contract and the kind registry
//! - [`compiler`]: tagging, assembly, analysis and linking
//! - [`problems`]: problems reported to the user
//! - [`driver`]: per-frame compile cache and execution through a [`driver::ScriptHost`]

pub mod compiler;
pub mod driver;
pub mod error;
pub mod graph;
pub mod node;
pub mod problems;

pub use compiler::{compile_tree, compile_tree_with_options, CompilationOptions, CompiledTree, FrameProcedure};
pub use driver::{FrameDriver, FrameReport, HostError, ScriptHost};
pub use error::{CompileError, GraphError};
pub use graph::{Document, Link, Node, NodeTree, Socket, SocketType, SocketValue};
pub use node::{CodeContext, CodeContract, NodeDeclaration, NodeKind, NodeRegistry, RawCode};
pub use problems::{Problem, ProblemList, ReportedProblem, Severity};
