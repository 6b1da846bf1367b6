//! # Compilation Pipeline
//!
//! Phases, options and statistics of a tree compilation.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::graph::NodeTree;
use crate::problems::Problem;

/// Compilation phase identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CompilationPhase {
    /// Network validation (links, sockets, node kinds)
    Validation,
    /// Data dependency graph and execution order
    DataFlowAnalysis,
    /// Socket type compatibility of links
    TypeChecking,
    /// Per-node code contracts to tagged fragments
    Assembly,
    /// Fragments to one frame procedure
    Linking,
    /// Completed successfully
    Complete,
}

impl CompilationPhase {
    /// Get human-readable phase name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Validation => "Validation",
            Self::DataFlowAnalysis => "Data Flow Analysis",
            Self::TypeChecking => "Type Checking",
            Self::Assembly => "Code Assembly",
            Self::Linking => "Linking",
            Self::Complete => "Complete",
        }
    }

    /// Get phase description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Validation => "Checking links, sockets and node kinds",
            Self::DataFlowAnalysis => "Building data dependency graph and execution order",
            Self::TypeChecking => "Checking socket types of links",
            Self::Assembly => "Tagging the code of every node",
            Self::Linking => "Resolving names into one frame procedure",
            Self::Complete => "Compilation completed successfully",
        }
    }
}

/// Compilation context holding intermediate data
pub struct CompilationContext {
    pub phase: CompilationPhase,
    pub tree: String,
    /// Problems that do not stop compilation
    pub warnings: Vec<Problem>,
    pub stats: CompilationStats,
}

impl CompilationContext {
    pub fn new(tree: &NodeTree) -> Self {
        Self {
            phase: CompilationPhase::Validation,
            tree: tree.name.clone(),
            warnings: Vec::new(),
            stats: CompilationStats::from_tree(tree),
        }
    }

    /// Advance to next phase
    pub fn advance_phase(&mut self, phase: CompilationPhase) {
        self.phase = phase;
        debug!(tree = %self.tree, phase = phase.name(), "{}", phase.description());
    }

    pub fn add_warning(&mut self, warning: Problem) {
        debug!(tree = %self.tree, %warning, "compilation warning");
        self.warnings.push(warning);
    }
}

/// Compilation statistics
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CompilationStats {
    pub nodes: usize,
    pub links: usize,
    /// Nodes compiled through `execute`
    pub procedure_nodes: usize,
    /// Nodes contributing inline code
    pub raw_nodes: usize,
    /// Nodes contributing no code at all
    pub silent_nodes: usize,
    /// Executable lines in the procedure
    pub lines: usize,
}

impl CompilationStats {
    pub fn from_tree(tree: &NodeTree) -> Self {
        Self {
            nodes: tree.nodes.len(),
            links: tree.links.len(),
            ..Default::default()
        }
    }

    pub fn log_summary(&self, tree: &str) {
        info!(
            tree,
            nodes = self.nodes,
            links = self.links,
            procedure_nodes = self.procedure_nodes,
            raw_nodes = self.raw_nodes,
            silent_nodes = self.silent_nodes,
            lines = self.lines,
            "compiled tree"
        );
    }
}

/// Compilation options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilationOptions {
    /// Comment naming each node above its lines
    pub debug_comments: bool,
    /// Report incompatible socket types as warnings
    pub check_types: bool,
    /// Name of the generated function
    pub function_name: String,
    /// Spaces per indentation level in the rendered source
    pub indent_width: usize,
}

/// The default keeps debug comments for inspecting generated code.
impl Default for CompilationOptions {
    fn default() -> Self {
        Self {
            debug_comments: true,
            check_types: true,
            function_name: "main".to_string(),
            indent_width: 4,
        }
    }
}

impl CompilationOptions {
    /// Options for the code run every frame
    pub fn production() -> Self {
        Self {
            debug_comments: false,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_ordering() {
        use CompilationPhase::*;

        let phases = [Validation, DataFlowAnalysis, TypeChecking, Assembly, Linking, Complete];
        for window in phases.windows(2) {
            assert!(window[0] < window[1]);
        }
    }

    #[test]
    fn test_compilation_options() {
        let default = CompilationOptions::default();
        assert!(default.debug_comments);
        assert!(default.check_types);

        let prod = CompilationOptions::production();
        assert!(!prod.debug_comments);
        assert!(prod.check_types);
        assert_ne!(prod, default);
        assert_eq!(prod.function_name, "main");
        assert_eq!(prod.indent_width, 4);
    }

    #[test]
    fn test_options_fill_missing_fields() {
        let options: CompilationOptions =
            serde_json::from_str(r#"{ "function_name": "frame" }"#).unwrap();
        assert_eq!(options.function_name, "frame");
        assert!(options.debug_comments);
    }
}
