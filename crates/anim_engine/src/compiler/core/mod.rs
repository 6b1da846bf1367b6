//! # Compiler Core
//!
//! Primary entry points of the node tree compiler.
//!
//! ```text
//! ┌─────────────────┐
//! │   Node Tree     │
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐
//! │ Phase 1: Valid- │  (links, sockets and kinds of every network)
//! │      ation      │
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐
//! │ Phase 2: Data   │  (input sources, topological execution order)
//! │   Flow Analysis │
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐
//! │ Phase 3: Types  │  (incompatible links become warnings)
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐
//! │ Phase 4: Assem- │  (code contract of each node to tagged fragments)
//! │       bly       │
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐
//! │ Phase 5: Link   │  (placeholders to variables and literals)
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐
//! │ Frame Procedure │
//! └─────────────────┘
//! ```
//!
//! ## Node Code Contracts
//!
//! ### 1. Procedure nodes (`CodeContract::Procedure`)
//! - The node object does the work in `execute`
//! - Inputs are passed positionally, outputs unpacked in declaration order
//! - Example: `$color$ = #self#.execute(%factor%, %a%, %b%)`
//!
//! ### 2. Raw code nodes (`CodeContract::Raw`)
//! - Inline code written with socket identifiers and `self`
//! - Example: `result = a + b` becomes `$result$ = %a% + %b%`
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use anim_engine::{compile_tree, NodeTree};
//!
//! let registry = anim_std::standard_registry();
//! let mut tree = NodeTree::new("Main");
//! tree.new_node(&registry, "an_ColorMix")?;
//! let procedure = compile_tree(&tree, &registry)?;
//! println!("{}", procedure.to_source());
//! ```

pub mod compiler;
pub mod pipeline;

pub use compiler::*;
pub use pipeline::*;
