//! # Code Assembly
//!
//! Turns the code contract of a single node into tagged [`Fragment`]s. The
//! assembler only knows about the node itself; names are resolved later by
//! the linker.

use super::fragment::{Fragment, Token};
use super::tagger::{is_attribute, lex, LexemeKind};
use crate::graph::Node;
use crate::node::{CodeContract, RawCode};

/// Name under which raw code refers to the node itself.
pub const SELF_NAME: &str = "self";

/// Assemble the tagged lines of one node.
pub fn assemble(node: &Node, contract: &CodeContract) -> Vec<Fragment> {
    match contract {
        CodeContract::Procedure => vec![procedure_call(node)],
        CodeContract::Raw(code) => raw_code(node, code),
    }
}

/// `$o1$, $o2$ = #self#.execute(%i1%, %i2%)`
fn procedure_call(node: &Node) -> Fragment {
    let mut fragment = Fragment::new();
    for (index, output) in node.outputs.iter().enumerate() {
        if index > 0 {
            fragment.push(Token::Text(", ".to_string()));
        }
        fragment.push(Token::Output(output.identifier.clone()));
    }
    if !node.outputs.is_empty() {
        fragment.push(Token::Text(" = ".to_string()));
    }

    fragment.push(Token::SelfRef);
    fragment.push(Token::Text(".execute(".to_string()));
    for (index, input) in node.inputs.iter().enumerate() {
        if index > 0 {
            fragment.push(Token::Text(", ".to_string()));
        }
        fragment.push(Token::Input(input.identifier.clone()));
    }
    fragment.push(Token::Text(")".to_string()));
    fragment
}

fn raw_code(node: &Node, code: &RawCode) -> Vec<Fragment> {
    if code.is_empty() {
        return Vec::new();
    }
    let code = code.joined();
    let lexemes = lex(&code);

    let mut fragment = Fragment::new();
    for (index, lexeme) in lexemes.iter().enumerate() {
        let token = if lexeme.kind == LexemeKind::Identifier && !is_attribute(&lexemes, index) {
            classify(node, lexeme.text)
        } else {
            None
        };
        fragment.push(token.unwrap_or_else(|| Token::Text(lexeme.text.to_string())));
    }
    fragment.split_lines()
}

/// Inputs take precedence over outputs, outputs over `self`.
fn classify(node: &Node, name: &str) -> Option<Token> {
    if node.input(name).is_some() {
        Some(Token::Input(name.to_string()))
    } else if node.output(name).is_some() {
        Some(Token::Output(name.to_string()))
    } else if name == SELF_NAME {
        Some(Token::SelfRef)
    } else {
        None
    }
}

/// The tagged lines of a node as text.
pub fn tagged_lines(node: &Node, contract: &CodeContract) -> Vec<String> {
    assemble(node, contract)
        .iter()
        .map(|fragment| fragment.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::generation::tagger::tag_variable_name;
    use crate::graph::SocketType;

    fn node(inputs: &[&str], outputs: &[&str]) -> Node {
        let mut node = Node::new("test_Node");
        for name in inputs {
            node.new_input(SocketType::Float, name, name);
        }
        for name in outputs {
            node.new_output(SocketType::Float, name, name);
        }
        node
    }

    #[test]
    fn test_procedure_form() {
        let node = node(&["x", "y"], &["z"]);
        assert_eq!(
            tagged_lines(&node, &CodeContract::Procedure),
            vec!["$z$ = #self#.execute(%x%, %y%)"]
        );
    }

    #[test]
    fn test_procedure_multiple_outputs() {
        let node = node(&["a"], &["b", "c"]);
        assert_eq!(
            tagged_lines(&node, &CodeContract::Procedure),
            vec!["$b$, $c$ = #self#.execute(%a%)"]
        );
    }

    #[test]
    fn test_procedure_without_outputs_or_inputs() {
        assert_eq!(
            tagged_lines(&node(&["a"], &[]), &CodeContract::Procedure),
            vec!["#self#.execute(%a%)"]
        );
        assert_eq!(
            tagged_lines(&node(&[], &["a"]), &CodeContract::Procedure),
            vec!["$a$ = #self#.execute()"]
        );
    }

    #[test]
    fn test_raw_code() {
        let node = node(&["a", "b"], &["result"]);
        let contract = CodeContract::Raw(RawCode::from("result = a + b"));
        assert_eq!(tagged_lines(&node, &contract), vec!["$result$ = %a% + %b%"]);
    }

    #[test]
    fn test_raw_lines_and_self() {
        let node = node(&["vector"], &["length"]);
        let contract = CodeContract::Raw(RawCode::Lines(vec![
            "length = vector.length".to_string(),
            "self.last = length".to_string(),
        ]));
        assert_eq!(
            tagged_lines(&node, &contract),
            vec!["$length$ = %vector%.length", "#self#.last = $length$"]
        );
    }

    #[test]
    fn test_raw_empty() {
        let node = node(&["a"], &[]);
        assert!(assemble(&node, &CodeContract::Raw(RawCode::Empty)).is_empty());
    }

    #[test]
    fn test_input_wins_over_output() {
        let node = node(&["value"], &["value"]);
        let contract = CodeContract::Raw(RawCode::from("value = value * 2"));
        assert_eq!(tagged_lines(&node, &contract), vec!["%value% = %value% * 2"]);
    }

    #[test]
    fn test_matches_textual_tagging() {
        let node = node(&["a", "b"], &["sum"]);
        let code = "sum = a + b + len('a') + self.offset";
        let mut expected = tag_variable_name(code, "a", '%');
        expected = tag_variable_name(&expected, "b", '%');
        expected = tag_variable_name(&expected, "sum", '$');
        expected = tag_variable_name(&expected, "self", '#');

        let contract = CodeContract::Raw(RawCode::from(code));
        assert_eq!(tagged_lines(&node, &contract), vec![expected]);
    }
}
