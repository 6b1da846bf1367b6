//! Typed lines of node code.
//!
//! A [`Fragment`] is one line of a node's code where every reference to the
//! node, its inputs and its outputs is a typed token. Printing a fragment
//! gives the tagged marker form (`$result$ = %a% + %b%`); the linker resolves
//! the tokens directly and never re-parses that text.

use std::fmt;

use super::tagger::{INPUT_TAG, OUTPUT_TAG, SELF_TAG};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Code copied as is
    Text(String),
    /// The node object
    SelfRef,
    /// Value of the input socket with this identifier
    Input(String),
    /// Variable receiving the output socket with this identifier
    Output(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    tokens: Vec<Token>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Append a token, merging adjacent text.
    pub fn push(&mut self, token: Token) {
        match token {
            Token::Text(text) if text.is_empty() => {}
            Token::Text(text) => {
                if let Some(Token::Text(last)) = self.tokens.last_mut() {
                    last.push_str(&text);
                } else {
                    self.tokens.push(Token::Text(text));
                }
            }
            token => self.tokens.push(token),
        }
    }

    pub fn text(mut self, text: &str) -> Self {
        self.push(Token::Text(text.to_string()));
        self
    }

    pub fn self_ref(mut self) -> Self {
        self.push(Token::SelfRef);
        self
    }

    pub fn input(mut self, name: &str) -> Self {
        self.push(Token::Input(name.to_string()));
        self
    }

    pub fn output(mut self, name: &str) -> Self {
        self.push(Token::Output(name.to_string()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn uses_self(&self) -> bool {
        self.tokens.iter().any(|t| matches!(t, Token::SelfRef))
    }

    /// Split into one fragment per line. Only text tokens can hold newlines.
    pub fn split_lines(self) -> Vec<Fragment> {
        let mut lines = vec![Fragment::new()];
        for token in self.tokens {
            match token {
                Token::Text(text) => {
                    let mut parts = text.split('\n');
                    if let Some(first) = parts.next() {
                        push_last(&mut lines, Token::Text(first.to_string()));
                    }
                    for part in parts {
                        lines.push(Fragment::new().text(part));
                    }
                }
                token => push_last(&mut lines, token),
            }
        }
        lines
    }
}

fn push_last(lines: &mut [Fragment], token: Token) {
    if let Some(last) = lines.last_mut() {
        last.push(token);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::SelfRef => write!(f, "{SELF_TAG}self{SELF_TAG}"),
            Self::Input(name) => write!(f, "{INPUT_TAG}{name}{INPUT_TAG}"),
            Self::Output(name) => write!(f, "{OUTPUT_TAG}{name}{OUTPUT_TAG}"),
        }
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "{token}")?;
        }
        Ok(())
    }
}
