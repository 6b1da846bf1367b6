//! # Validation
//!
//! ## Network Validator (`network_validator`)
//! Checks that a tree is well-formed before compilation:
//! - All linked nodes and sockets exist
//! - No input holds more than one link
//! - Every node kind is registered
//!
//! ## Test Graphs (`test_graphs`)
//! Node kinds and tree builders shared by the compiler tests.

pub mod network_validator;

#[cfg(test)]
pub(crate) mod test_graphs;

pub use network_validator::{apply_network_flags, network_members, validate_network, NetworkReport};
