use indoc::indoc;

use super::validation::test_graphs::{add_node, test_registry};
use super::*;
use crate::error::CompileError;
use crate::graph::NodeTree;
use crate::problems::Problem;

fn chain_tree() -> NodeTree {
    let registry = test_registry();
    let mut tree = NodeTree::new("Chain");
    add_node(&mut tree, &registry, "test_Double", "_a");
    add_node(&mut tree, &registry, "test_Double", "_b");
    add_node(&mut tree, &registry, "test_Store", "_s");
    tree.link("_a", "result", "_b", "value").unwrap();
    tree.link("_b", "result", "_s", "value").unwrap();
    tree
}

#[test]
fn test_compile_chain() {
    let compiled =
        compile_tree_with_options(&chain_tree(), &test_registry(), &CompilationOptions::production())
            .unwrap();

    assert_eq!(
        compiled.procedure.to_source(),
        indoc! {r#"
            def main(nodes):
                _s = nodes["_s"]
                _a_result = 1.0 * 2
                _b_result = _a_result * 2
                _s.stored = _b_result
        "#}
    );
    assert_eq!(compiled.stats.raw_nodes, 3);
    assert_eq!(compiled.stats.lines, 4);
    assert!(compiled.warnings.is_empty());
}

#[test]
fn test_execution_order_ignores_insertion_order() {
    let registry = test_registry();
    let mut tree = NodeTree::new("Reversed");
    add_node(&mut tree, &registry, "test_Store", "_s");
    add_node(&mut tree, &registry, "test_Double", "_b");
    add_node(&mut tree, &registry, "test_Double", "_a");
    tree.link("_a", "result", "_b", "value").unwrap();
    tree.link("_b", "result", "_s", "value").unwrap();

    let procedure = compile_tree_with_options(&tree, &registry, &CompilationOptions::production())
        .unwrap()
        .procedure;
    assert_eq!(
        procedure.body,
        vec!["_a_result = 1.0 * 2", "_b_result = _a_result * 2", "_s.stored = _b_result"]
    );
}

#[test]
fn test_compile_procedure_node() {
    let registry = test_registry();
    let mut tree = NodeTree::new("Mix");
    add_node(&mut tree, &registry, "test_Mix", "_m");

    let procedure = compile_tree_with_options(&tree, &registry, &CompilationOptions::production())
        .unwrap()
        .procedure;
    assert_eq!(
        procedure.to_source(),
        indoc! {r#"
            def main(nodes):
                _m = nodes["_m"]
                _m_color = _m.execute(0.5, (0.0, 0.0, 0.0, 1.0), (0.0, 0.0, 0.0, 1.0))
        "#}
    );
}

#[test]
fn test_context_dependent_code_and_modules() {
    let registry = test_registry();
    let mut tree = NodeTree::new("Vector");
    add_node(&mut tree, &registry, "test_VectorLength", "_v");

    // Output unused, the node contributes nothing
    let compiled =
        compile_tree_with_options(&tree, &registry, &CompilationOptions::production()).unwrap();
    assert!(compiled.procedure.body.is_empty());
    assert_eq!(compiled.stats.silent_nodes, 1);

    add_node(&mut tree, &registry, "test_Double", "_d");
    tree.link("_v", "length", "_d", "value").unwrap();
    let procedure = compile_tree_with_options(&tree, &registry, &CompilationOptions::production())
        .unwrap()
        .procedure;
    assert_eq!(
        procedure.to_source(),
        indoc! {r#"
            import mathutils

            def main(nodes):
                _v_length = mathutils.Vector((0.0, 0.0, 0.0)).length
                _d_result = _v_length * 2
        "#}
    );
}

#[test]
fn test_debug_comments() {
    let registry = test_registry();
    let mut tree = NodeTree::new("Comments");
    add_node(&mut tree, &registry, "test_Double", "_a");
    tree.node_mut("_a").unwrap().label = Some("Twice".to_string());

    let procedure = compile_tree_with_options(&tree, &registry, &CompilationOptions::default())
        .unwrap()
        .procedure;
    assert_eq!(procedure.body, vec!["# Twice (_a)", "_a_result = 1.0 * 2"]);
}

#[test]
fn test_debug_comment_uses_kind_label() {
    let registry = test_registry();
    let mut tree = NodeTree::new("Comments");
    add_node(&mut tree, &registry, "test_Double", "_a");

    let procedure = compile_tree(&tree, &registry).unwrap();
    assert_eq!(procedure.body, vec!["# Double (_a)", "_a_result = 1.0 * 2"]);
}

#[test]
fn test_cycle_rejected() {
    let mut tree = chain_tree();
    tree.link("_b", "result", "_a", "value").unwrap();

    let err = compile_tree(&tree, &test_registry()).unwrap_err();
    assert_eq!(err, CompileError::Cycle(vec!["_a".to_string(), "_b".to_string(), "_s".to_string()]));
}

#[test]
fn test_shared_identifier_rejected() {
    let registry = test_registry();
    let mut tree = NodeTree::new("Twins");
    add_node(&mut tree, &registry, "test_Double", "_same");
    add_node(&mut tree, &registry, "test_Store", "_same");

    let err = compile_tree(&tree, &registry).unwrap_err();
    assert_eq!(
        err.problems(),
        vec![Problem::DuplicateIdentifier {
            node: "_same".to_string(),
            count: 2,
        }]
    );
}

#[test]
fn test_invalid_network_rejected() {
    let mut tree = chain_tree();
    tree.node_mut("_s").unwrap().kind = "test_Unknown".to_string();

    let err = compile_tree(&tree, &test_registry()).unwrap_err();
    assert_eq!(
        err.problems(),
        vec![Problem::UnknownNodeKind {
            node: "_s".to_string(),
            kind: "test_Unknown".to_string(),
        }]
    );
    assert!(matches!(err, CompileError::InvalidNetwork { ref tree, .. } if tree == "Chain"));
}

#[test]
fn test_type_mismatch_is_a_warning() {
    let registry = test_registry();
    let mut tree = NodeTree::new("Types");
    add_node(&mut tree, &registry, "test_Mix", "_m");
    add_node(&mut tree, &registry, "test_Double", "_d");
    tree.link("_m", "color", "_d", "value").unwrap();

    let compiled =
        compile_tree_with_options(&tree, &registry, &CompilationOptions::default()).unwrap();
    assert_eq!(compiled.warnings.len(), 1);
    assert!(matches!(compiled.warnings[0], Problem::TypeMismatch { .. }));
    assert!(compiled.procedure.body.contains(&"_d_result = _m_color * 2".to_string()));
}

#[test]
fn test_empty_tree() {
    let procedure = compile_tree(&NodeTree::new("Empty"), &test_registry()).unwrap();
    assert_eq!(procedure.to_source(), "def main(nodes):\n    pass\n");
    assert_eq!(procedure.tree, "Empty");
}

#[test]
fn test_compilation_is_deterministic() {
    let registry = test_registry();
    let mut tree = NodeTree::new("Random");
    let a = tree.new_node(&registry, "test_Double").unwrap();
    let b = tree.new_node(&registry, "test_Mix").unwrap();
    let c = tree.new_node(&registry, "test_Store").unwrap();
    tree.link(&a, "result", &b, "factor").unwrap();
    tree.link(&b, "color", &c, "value").unwrap();

    let first = compile_tree(&tree, &registry).unwrap();
    let second = compile_tree(&tree, &registry).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.setup.len(), 2);
    assert!(first.body.iter().any(|line| line.contains(&format!("{b}.execute({a}_result, "))));
}

#[test]
fn test_tagged_form_matches_textual_tagging() {
    let registry = test_registry();
    let mut tree = NodeTree::new("Tags");
    add_node(&mut tree, &registry, "test_Double", "_a");
    let node = tree.node("_a").unwrap();

    let kind = registry.get("test_Double").unwrap();
    let contract = kind.code(node, &crate::node::CodeContext::all_linked(node));
    let lines = generation::tagged_lines(node, &contract);
    let textual = tag_variable_name(&tag_variable_name("result = value * 2", "value", '%'), "result", '$');
    assert_eq!(lines, vec![textual]);
}
