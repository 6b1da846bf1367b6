//! # Identifier Tagging
//!
//! Node code refers to its sockets and to itself by plain names. Before the
//! code of many nodes can be linked into one procedure those names are wrapped
//! in marker characters so they can be told apart from everything else:
//!
//! - `#self#` for the node itself
//! - `%name%` for an input
//! - `$name$` for an output
//!
//! Tagging works on a lossless lexer instead of plain text search so that
//! attribute access (`obj.name`) and string literals (`"name"`) are never
//! touched.

/// Marker for the node itself.
pub const SELF_TAG: char = '#';
/// Marker for input sockets.
pub const INPUT_TAG: char = '%';
/// Marker for output sockets.
pub const OUTPUT_TAG: char = '$';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexemeKind {
    Identifier,
    Number,
    StringLiteral,
    Other,
}

/// One piece of source text. Concatenating all lexemes gives back the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme<'a> {
    pub kind: LexemeKind,
    pub text: &'a str,
}

impl Lexeme<'_> {
    pub fn is_identifier(&self, name: &str) -> bool {
        self.kind == LexemeKind::Identifier && self.text == name
    }
}

fn is_identifier_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_identifier_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Split code into identifiers, numbers, string literals and other text.
pub fn lex(code: &str) -> Vec<Lexeme<'_>> {
    let mut lexemes = Vec::new();
    let mut chars = code.char_indices().peekable();
    let mut other_start: Option<usize> = None;

    while let Some(&(start, c)) = chars.peek() {
        let kind = if is_identifier_start(c) {
            LexemeKind::Identifier
        } else if c.is_ascii_digit() {
            LexemeKind::Number
        } else if c == '"' || c == '\'' {
            LexemeKind::StringLiteral
        } else {
            other_start.get_or_insert(start);
            chars.next();
            continue;
        };
        flush_other(&mut lexemes, code, &mut other_start, start);
        chars.next();

        let mut end = start + c.len_utf8();
        match kind {
            LexemeKind::Identifier => {
                while let Some(&(i, next)) = chars.peek() {
                    if !is_identifier_continue(next) {
                        break;
                    }
                    end = i + next.len_utf8();
                    chars.next();
                }
            }
            LexemeKind::Number => {
                while let Some(&(i, next)) = chars.peek() {
                    if !(next == '.' || is_identifier_continue(next)) {
                        break;
                    }
                    end = i + next.len_utf8();
                    chars.next();
                }
            }
            _ => {
                // String literal, runs until the matching quote or the end
                let mut escaped = false;
                for (i, next) in chars.by_ref() {
                    end = i + next.len_utf8();
                    if escaped {
                        escaped = false;
                    } else if next == '\\' {
                        escaped = true;
                    } else if next == c {
                        break;
                    }
                }
            }
        }
        lexemes.push(Lexeme {
            kind,
            text: &code[start..end],
        });
    }
    flush_other(&mut lexemes, code, &mut other_start, code.len());
    lexemes
}

fn flush_other<'a>(lexemes: &mut Vec<Lexeme<'a>>, code: &'a str, start: &mut Option<usize>, end: usize) {
    if let Some(s) = start.take() {
        lexemes.push(Lexeme {
            kind: LexemeKind::Other,
            text: &code[s..end],
        });
    }
}

/// Whether the identifier at `index` is an attribute access (`x.name`).
pub(crate) fn is_attribute(lexemes: &[Lexeme<'_>], index: usize) -> bool {
    index > 0 && lexemes[index - 1].text.ends_with('.')
}

/// Wrap every free-standing occurrence of `name` in `tag`.
///
/// Occurrences directly after a `.` and inside string literals are left
/// alone. Tagging is not idempotent: tagging the result again wraps the name
/// a second time.
pub fn tag_variable_name(code: &str, name: &str, tag: char) -> String {
    let lexemes = lex(code);
    let mut out = String::with_capacity(code.len());
    for (index, lexeme) in lexemes.iter().enumerate() {
        if lexeme.is_identifier(name) && !is_attribute(&lexemes, index) {
            out.push(tag);
            out.push_str(lexeme.text);
            out.push(tag);
        } else {
            out.push_str(lexeme.text);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tag_simple_expression() {
        assert_eq!(tag_variable_name("a + b", "a", '%'), "%a% + b");
        assert_eq!(tag_variable_name("a + a * 2", "a", '%'), "%a% + %a% * 2");
    }

    #[test]
    fn test_tag_respects_identifier_boundaries() {
        assert_eq!(tag_variable_name("ab + a_b + ba", "a", '%'), "ab + a_b + ba");
        assert_eq!(tag_variable_name("f(a)", "a", '%'), "f(%a%)");
    }

    #[test]
    fn test_attribute_access_untouched() {
        assert_eq!(tag_variable_name("obj.name", "name", '%'), "obj.name");
        assert_eq!(
            tag_variable_name("name = obj.name", "name", '$'),
            "$name$ = obj.name"
        );
    }

    #[test]
    fn test_string_literal_untouched() {
        assert_eq!(tag_variable_name("print(\"name\")", "name", '%'), "print(\"name\")");
        assert_eq!(tag_variable_name("x = 'a \\' a' + a", "a", '%'), "x = 'a \\' a' + %a%");
    }

    #[test]
    fn test_numbers_are_not_identifiers() {
        assert_eq!(tag_variable_name("1e5 + e5", "e5", '%'), "1e5 + %e5%");
        assert_eq!(tag_variable_name("0.5 * x", "x", '%'), "0.5 * %x%");
    }

    #[test]
    fn test_edge_cases() {
        assert_eq!(tag_variable_name("", "a", '%'), "");
        assert_eq!(tag_variable_name("b + c", "a", '%'), "b + c");
    }

    #[test]
    fn test_not_idempotent() {
        let once = tag_variable_name("a", "a", '%');
        assert_eq!(once, "%a%");
        assert_eq!(tag_variable_name(&once, "a", '%'), "%%a%%");
    }

    #[test]
    fn test_lexer_is_lossless() {
        let code = "result = self.execute(a, 'x') # ünïcode 2.5e3";
        let joined: String = lex(code).iter().map(|l| l.text).collect();
        assert_eq!(joined, code);
    }

    proptest! {
        #[test]
        fn prop_absent_name_is_noop(code in "[a-z .+()\"'=]{0,40}") {
            // Names made of uppercase letters never occur in the lowercase code
            prop_assert_eq!(tag_variable_name(&code, "ABSENT", '%'), code);
        }

        #[test]
        fn prop_lexer_round_trips(code in "\\PC{0,60}") {
            let joined: String = lex(&code).iter().map(|l| l.text).collect();
            prop_assert_eq!(joined, code);
        }

        #[test]
        fn prop_attribute_never_tagged(prefix in "[a-z]{1,8}", name in "[a-z]{1,8}") {
            let code = format!("{prefix}.{name}");
            prop_assert_eq!(tag_variable_name(&code, &name, '$'), if prefix == name {
                format!("${prefix}$.{name}")
            } else {
                code.clone()
            });
        }

        #[test]
        fn prop_string_literal_never_tagged(name in "[a-z]{1,8}") {
            let code = format!("\"{name}\"");
            prop_assert_eq!(tag_variable_name(&code, &name, '%'), code.clone());
        }
    }
}
