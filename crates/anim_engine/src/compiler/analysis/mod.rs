//! # Graph Analysis
//!
//! - [`data_flow`]: where every input value comes from and the execution order
//! - [`type_analysis`]: socket type compatibility of links

pub mod data_flow;
pub mod type_analysis;

pub use data_flow::{DataResolver, DataSource};
pub use type_analysis::TypeChecker;
