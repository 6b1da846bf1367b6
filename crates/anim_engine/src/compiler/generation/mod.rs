//! # Code Generation
//!
//! - [`tagger`]: marker tagging of names in raw code
//! - [`fragment`]: typed, tagged lines of node code
//! - [`assembler`]: per node, code contract to fragments
//! - [`linker`]: all nodes' fragments to one frame procedure
//! - [`imports`]: module collection
//! - [`formatting`]: procedure to source text

pub mod assembler;
pub mod formatting;
pub mod fragment;
pub mod imports;
pub mod linker;
pub mod tagger;

pub use assembler::{assemble, tagged_lines};
pub use fragment::{Fragment, Token};
pub use linker::{AssembledNode, FrameProcedure, Linker};
pub use tagger::{tag_variable_name, INPUT_TAG, OUTPUT_TAG, SELF_TAG};
