use anim_engine::CompilationOptions;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Front end configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level, or any `EnvFilter` directive
    pub log_level: String,

    /// Options passed to the compiler
    pub compilation: CompilationOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            compilation: CompilationOptions::default(),
        }
    }
}

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "anim-compile")]
#[command(about = "Compile animation node documents into frame procedures")]
pub struct Cli {
    /// Configuration file path (TOML)
    #[arg(short, long, env = "ANIM_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "ANIM_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the frame procedure of every tree in a document
    Compile {
        document: PathBuf,

        /// Only compile the tree with this name
        #[arg(long)]
        tree: Option<String>,

        /// Leave out the per-node comments
        #[arg(long)]
        no_comments: bool,
    },

    /// Assign identifiers to nodes that have none
    Repair {
        document: PathBuf,

        /// Write the repaired document here instead of in place
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the registered node kinds
    Nodes {
        /// Only kinds whose label or search tags contain this term
        #[arg(long)]
        search: Option<String>,
    },
}

impl Config {
    /// Build the configuration from the optional config file and CLI overrides
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(log_level) = &cli.log_level {
            config.log_level = log_level.clone();
        }
        if let Command::Compile { no_comments: true, .. } = cli.command {
            config.compilation.debug_comments = false;
        }

        Ok(config)
    }

    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&config_str).context("Failed to parse config file")
    }
}
