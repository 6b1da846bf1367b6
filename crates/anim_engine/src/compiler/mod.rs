//! # The Animation Node Compiler
//!
//! Transforms a node tree into a frame procedure for the host's scripting
//! runtime.

pub mod core;

pub use self::core::{
    compile_tree,
    compile_tree_with_options,
    CompilationOptions,
    CompilationStats,
    CompiledTree,
};

/// Graph analysis (data flow, types)
pub mod analysis;

/// Tagging, assembly and linking
pub mod generation;

/// Variable naming
pub mod utils;

/// Network validation
pub mod validation;

pub use generation::{tag_variable_name, FrameProcedure};

#[cfg(test)]
mod tests;
