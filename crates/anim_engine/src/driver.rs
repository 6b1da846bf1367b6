//! # Frame Driver
//!
//! Runs the compiled procedure of every tree once per frame. Procedures are
//! cached per tree and only rebuilt when the tree revision changes. Compile
//! and execution failures end up in the [`ProblemList`]; a failed tree is
//! skipped until it changes or [`FrameDriver::retry`] is called.

use std::collections::{BTreeSet, HashMap};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::compiler::validation::{apply_network_flags, network_members};
use crate::compiler::{compile_tree_with_options, CompilationOptions, FrameProcedure};
use crate::graph::{Document, NodeTree};
use crate::node::NodeRegistry;
use crate::problems::{Problem, ProblemList};

/// Failure reported by the scripting runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("{0}")]
    Script(String),

    #[error("module '{0}' is not available")]
    MissingModule(String),
}

/// The scripting runtime that executes frame procedures.
pub trait ScriptHost {
    fn execute(&mut self, procedure: &FrameProcedure) -> Result<(), HostError>;
}

#[derive(Debug, Clone)]
enum CacheState {
    Ready(FrameProcedure),
    Failed,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    revision: u64,
    state: CacheState,
}

/// What happened during one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub compiled: Vec<String>,
    pub executed: Vec<String>,
    pub failed: Vec<String>,
    pub skipped: Vec<String>,
}

pub struct FrameDriver {
    registry: NodeRegistry,
    options: CompilationOptions,
    cache: HashMap<String, CacheEntry>,
    problems: ProblemList,
}

impl FrameDriver {
    pub fn new(registry: NodeRegistry) -> Self {
        Self::with_options(registry, CompilationOptions::production())
    }

    pub fn with_options(registry: NodeRegistry, options: CompilationOptions) -> Self {
        Self {
            registry,
            options,
            cache: HashMap::new(),
            problems: ProblemList::new(),
        }
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn problems(&self) -> &ProblemList {
        &self.problems
    }

    /// The cached procedure of a tree, if it compiled.
    pub fn procedure(&self, tree: &str) -> Option<&FrameProcedure> {
        match &self.cache.get(tree)?.state {
            CacheState::Ready(procedure) => Some(procedure),
            CacheState::Failed => None,
        }
    }

    pub fn is_failed(&self, tree: &str) -> bool {
        matches!(
            self.cache.get(tree),
            Some(CacheEntry {
                state: CacheState::Failed,
                ..
            })
        )
    }

    /// Execute every tree of the document once.
    pub fn run_frame(&mut self, document: &mut Document, host: &mut dyn ScriptHost) -> FrameReport {
        let mut report = FrameReport::default();
        for tree in document.trees.iter_mut() {
            if self.prepare(tree) {
                report.compiled.push(tree.name.clone());
            }
            self.execute(tree, host, &mut report);
        }
        self.cache
            .retain(|name, _| document.trees.iter().any(|tree| &tree.name == name));
        report
    }

    /// Make every failed tree eligible to run again.
    pub fn retry(&mut self) {
        let failed: Vec<String> = self
            .cache
            .iter()
            .filter(|(_, entry)| matches!(entry.state, CacheState::Failed))
            .map(|(name, _)| name.clone())
            .collect();
        for name in failed {
            self.retry_tree(&name);
        }
    }

    /// Make one tree eligible to run again.
    pub fn retry_tree(&mut self, tree: &str) {
        if self.cache.remove(tree).is_some() {
            info!(tree, "retrying tree");
        }
        self.problems.clear_tree(tree);
    }

    /// Compile the tree unless the cached procedure is current.
    ///
    /// Returns whether a compilation happened.
    fn prepare(&mut self, tree: &mut NodeTree) -> bool {
        let revision = tree.revision();
        if self
            .cache
            .get(&tree.name)
            .is_some_and(|entry| entry.revision == revision)
        {
            return false;
        }

        self.problems.clear_tree(&tree.name);
        let state = match compile_tree_with_options(tree, &self.registry, &self.options) {
            Ok(compiled) => {
                apply_network_flags(tree, &BTreeSet::new());
                self.problems.extend(&tree.name, compiled.warnings);
                CacheState::Ready(compiled.procedure)
            }
            Err(err) => {
                warn!(tree = %tree.name, error = %err, "tree failed to compile");
                let problems = err.problems();
                let invalid = network_members(tree, problems.iter().flat_map(|p| p.nodes()));
                apply_network_flags(tree, &invalid);
                self.problems.extend(&tree.name, problems);
                CacheState::Failed
            }
        };
        debug!(tree = %tree.name, revision, "cached tree");
        self.cache.insert(tree.name.clone(), CacheEntry { revision, state });
        true
    }

    fn execute(&mut self, tree: &NodeTree, host: &mut dyn ScriptHost, report: &mut FrameReport) {
        let Some(entry) = self.cache.get_mut(&tree.name) else {
            return;
        };
        let CacheState::Ready(procedure) = &entry.state else {
            report.skipped.push(tree.name.clone());
            return;
        };
        match host.execute(procedure) {
            Ok(()) => report.executed.push(tree.name.clone()),
            Err(err) => {
                warn!(tree = %tree.name, error = %err, "frame procedure failed");
                self.problems.report(
                    &tree.name,
                    Problem::ExecutionFailed {
                        message: err.to_string(),
                    },
                );
                entry.state = CacheState::Failed;
                report.failed.push(tree.name.clone());
            }
        }
    }
}
