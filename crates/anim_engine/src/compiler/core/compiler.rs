//! # Main Compiler Entry Points
//!
//! Compiles one node tree into a [`FrameProcedure`].

use tracing::{debug, info};

use super::pipeline::{CompilationContext, CompilationOptions, CompilationPhase, CompilationStats};
use crate::compiler::analysis::{DataResolver, TypeChecker};
use crate::compiler::generation::{assemble, AssembledNode, FrameProcedure, Linker};
use crate::compiler::utils::VariableNames;
use crate::compiler::validation::validate_network;
use crate::error::CompileError;
use crate::graph::NodeTree;
use crate::node::{CodeContext, CodeContract, NodeRegistry, RawCode};
use crate::problems::Problem;

/// Result of a successful compilation
#[derive(Debug, Clone)]
pub struct CompiledTree {
    pub procedure: FrameProcedure,
    /// Problems that did not stop compilation
    pub warnings: Vec<Problem>,
    pub stats: CompilationStats,
}

/// Compile a tree with the default options.
///
/// # Error Conditions
///
/// * A network of the tree is invalid (missing nodes or sockets, an input
///   with several links, a node kind that is not registered)
/// * The links form a cycle
pub fn compile_tree(tree: &NodeTree, registry: &NodeRegistry) -> Result<FrameProcedure, CompileError> {
    compile_tree_with_options(tree, registry, &CompilationOptions::default())
        .map(|compiled| compiled.procedure)
}

pub fn compile_tree_with_options(
    tree: &NodeTree,
    registry: &NodeRegistry,
    options: &CompilationOptions,
) -> Result<CompiledTree, CompileError> {
    info!(tree = %tree.name, nodes = tree.nodes.len(), links = tree.links.len(), "compiling tree");
    let mut ctx = CompilationContext::new(tree);

    // Phase 1: Network validation
    ctx.advance_phase(CompilationPhase::Validation);
    let report = validate_network(tree, registry);
    if !report.is_valid() {
        return Err(CompileError::InvalidNetwork {
            tree: tree.name.clone(),
            problems: report.problems,
        });
    }

    // Phase 2: Execution order and input sources
    ctx.advance_phase(CompilationPhase::DataFlowAnalysis);
    let resolver = DataResolver::build(tree)?;

    // Phase 3: Type checking
    if options.check_types {
        ctx.advance_phase(CompilationPhase::TypeChecking);
        for warning in TypeChecker::new(tree).check_all_links() {
            ctx.add_warning(warning);
        }
    }

    // Phase 4: Tag the code of every node
    ctx.advance_phase(CompilationPhase::Assembly);
    let mut assembled = Vec::with_capacity(tree.nodes.len());
    for identifier in resolver.evaluation_order() {
        let Some(node) = tree.node(identifier) else {
            continue;
        };
        let kind = registry.get(&node.kind).ok_or_else(|| CompileError::UnknownKind {
            node: node.identifier.clone(),
            kind: node.kind.clone(),
        })?;

        let contract = kind.code(node, &CodeContext::for_node(tree, node));
        match &contract {
            CodeContract::Procedure => ctx.stats.procedure_nodes += 1,
            CodeContract::Raw(RawCode::Empty) => ctx.stats.silent_nodes += 1,
            CodeContract::Raw(_) => ctx.stats.raw_nodes += 1,
        }
        let fragments = assemble(node, &contract);
        debug!(node = %node.identifier, kind = %node.kind, lines = fragments.len(), "assembled node");
        assembled.push(AssembledNode {
            node,
            label: kind.declaration().label,
            fragments,
            modules: kind.used_modules(node),
        });
    }

    // Phase 5: Resolve names
    ctx.advance_phase(CompilationPhase::Linking);
    let names = VariableNames::for_tree(tree);
    let procedure = Linker::new(&resolver, &names, options).link(&tree.name, &assembled);

    ctx.stats.lines = procedure.lines().count();
    ctx.advance_phase(CompilationPhase::Complete);
    ctx.stats.log_summary(&tree.name);

    Ok(CompiledTree {
        procedure,
        warnings: ctx.warnings,
        stats: ctx.stats,
    })
}
