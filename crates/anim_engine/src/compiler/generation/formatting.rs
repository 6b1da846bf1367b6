//! # Procedure Formatting
//!
//! Renders a linked procedure as source text:
//!
//! ```text
//! import mathutils
//!
//! def main(nodes):
//!     _k2c8 = nodes["_k2c8"]
//!     _k2c8_color = _k2c8.execute(0.5, (0.0, 0.0, 0.0, 1.0), (0.0, 0.0, 0.0, 1.0))
//! ```

use super::imports::import_lines;
use super::linker::FrameProcedure;

/// Argument through which the host passes the node objects.
pub const NODES_ARGUMENT: &str = "nodes";

pub fn format_procedure(procedure: &FrameProcedure, indent_width: usize) -> String {
    let indent = " ".repeat(indent_width);
    let mut source = String::new();

    let imports = import_lines(&procedure.modules);
    if !imports.is_empty() {
        for line in imports {
            source.push_str(&line);
            source.push('\n');
        }
        source.push('\n');
    }

    source.push_str(&format!("def {}({}):\n", procedure.function_name, NODES_ARGUMENT));
    if procedure.setup.is_empty() && procedure.body.is_empty() {
        source.push_str(&indent);
        source.push_str("pass\n");
        return source;
    }
    for line in procedure.setup.iter().chain(procedure.body.iter()) {
        if line.trim().is_empty() {
            source.push('\n');
            continue;
        }
        source.push_str(&indent);
        source.push_str(line);
        source.push('\n');
    }
    source
}
