//! # anim-compile
//!
//! Command line front end of the node compiler: loads graph documents,
//! repairs their identifiers and prints the generated frame procedures.

pub mod commands;
pub mod config;
pub mod logging;

pub use config::{Cli, Command, Config};
