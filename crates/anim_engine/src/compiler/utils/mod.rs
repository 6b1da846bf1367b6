//! Compiler utilities.

pub mod variable_gen;

pub use variable_gen::{sanitize_var_name, VariableNames};
