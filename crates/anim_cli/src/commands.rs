//! Subcommand implementations. Each returns the text to print on stdout.

use anim_engine::graph::repair_identifiers;
use anim_engine::{compile_tree_with_options, Document, NodeRegistry};
use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::{info, warn};

use crate::config::{Command, Config};

pub fn run(command: &Command, config: &Config) -> Result<String> {
    let registry = anim_std::standard_registry();
    match command {
        Command::Compile {
            document,
            tree,
            no_comments,
        } => {
            let mut config = config.clone();
            if *no_comments {
                config.compilation.debug_comments = false;
            }
            compile(&registry, &config, document, tree.as_deref())
        }
        Command::Repair { document, output } => {
            let target = output.as_deref().unwrap_or(document.as_path());
            let repaired = repair(document, target)?;
            Ok(format!("repaired {repaired} identifier(s), wrote {}", target.display()))
        }
        Command::Nodes { search } => Ok(list_nodes(&registry, search.as_deref()).join("\n")),
    }
}

/// Read a document and give every node without an identifier a fresh one.
pub fn load_document(path: &Path) -> Result<(Document, usize)> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read document {}", path.display()))?;
    let mut document = Document::from_json(&json)
        .with_context(|| format!("Failed to parse document {}", path.display()))?;
    let repaired = repair_identifiers(&mut document);
    if repaired > 0 {
        warn!(document = %path.display(), repaired, "assigned missing node identifiers");
    }
    Ok((document, repaired))
}

/// Procedure sources of the selected trees, separated by blank lines.
pub fn compile(registry: &NodeRegistry, config: &Config, path: &Path, tree: Option<&str>) -> Result<String> {
    let (document, _) = load_document(path)?;
    let trees: Vec<_> = match tree {
        Some(name) => match document.tree(name) {
            Some(tree) => vec![tree],
            None => bail!("document {} has no tree named '{name}'", path.display()),
        },
        None => document.trees.iter().collect(),
    };

    let mut sources = Vec::with_capacity(trees.len());
    for tree in trees {
        let compiled = compile_tree_with_options(tree, registry, &config.compilation)
            .with_context(|| format!("Failed to compile tree '{}'", tree.name))?;
        for warning in &compiled.warnings {
            warn!(tree = %tree.name, "{warning}");
        }
        sources.push(compiled.procedure.to_source().trim_end().to_string());
    }
    Ok(sources.join("\n\n"))
}

/// Repair `path` and write the result to `output`. Returns the number of
/// identifiers assigned.
pub fn repair(path: &Path, output: &Path) -> Result<usize> {
    let (document, repaired) = load_document(path)?;
    let json = document.to_json().context("Failed to serialize document")?;
    std::fs::write(output, json).with_context(|| format!("Failed to write {}", output.display()))?;
    info!(output = %output.display(), repaired, "wrote repaired document");
    Ok(repaired)
}

/// One `category: label (id_name)` line per node kind.
pub fn list_nodes(registry: &NodeRegistry, search: Option<&str>) -> Vec<String> {
    let declarations = match search {
        Some(term) => registry.search(term),
        None => registry.declarations(),
    };
    declarations
        .iter()
        .map(|decl| format!("{}: {} ({})", decl.category, decl.label, decl.id_name))
        .collect()
}
