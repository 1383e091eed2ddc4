//! Compact parenthesized notation for syntax trees.
//!
//! ```text
//! (module@1:0
//!   (mainModule
//!     (letClause "let"@2:0
//!       (letVar name=(qName "$x"@2:4)))))  ; positions are inherited
//! ```
//!
//! A node is `(kind@line:col children…)`, a token is a quoted string with an
//! optional `@line:col` suffix, and `field=` labels the element that follows.
//! Elements without a position take the last position seen in document order.

use std::fmt::{self, Write};
use std::str::FromStr;

use thiserror::Error;

use crate::tree::{SyntaxElement, SyntaxNode, SyntaxToken, MAX_DEPTH};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("unterminated string starting at offset {0}")]
    UnterminatedString(usize),
    #[error("invalid position '{text}' at offset {offset}")]
    InvalidPosition { text: String, offset: usize },
    #[error("unexpected {found} at offset {offset}")]
    Unexpected { found: String, offset: usize },
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("the root element must be a node")]
    RootNotNode,
    #[error("nodes nest deeper than {limit} levels at offset {offset}")]
    TooDeep { limit: usize, offset: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Position {
    line: u32,
    column: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Lexeme {
    Open,
    Close,
    Equals,
    Atom(String),
    Str {
        text: String,
        position: Option<Position>,
    },
}

impl Lexeme {
    fn describe(&self) -> String {
        match self {
            Self::Open => "'('".to_string(),
            Self::Close => "')'".to_string(),
            Self::Equals => "'='".to_string(),
            Self::Atom(atom) => format!("'{atom}'"),
            Self::Str { text, .. } => format!("string {text:?}"),
        }
    }
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '=' | '"' | ';')
}

fn parse_position(text: &str, offset: usize) -> Result<Position, NotationError> {
    let invalid = || NotationError::InvalidPosition {
        text: text.to_string(),
        offset,
    };
    let (line, column) = match text.split_once(':') {
        Some((line, column)) => (line, Some(column)),
        None => (text, None),
    };
    let line = line.parse::<u32>().map_err(|_| invalid())?;
    let column = match column {
        Some(column) => column.parse::<u32>().map_err(|_| invalid())?,
        None => 0,
    };
    Ok(Position { line, column })
}

fn lex(input: &str) -> Result<Vec<(Lexeme, usize)>, NotationError> {
    let mut lexemes = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            ';' => {
                while chars.next_if(|&(_, c)| c != '\n').is_some() {}
            }
            '(' => {
                chars.next();
                lexemes.push((Lexeme::Open, offset));
            }
            ')' => {
                chars.next();
                lexemes.push((Lexeme::Close, offset));
            }
            '=' => {
                chars.next();
                lexemes.push((Lexeme::Equals, offset));
            }
            '"' => {
                chars.next();
                let mut text = String::new();
                let mut closed = false;
                while let Some((_, c)) = chars.next() {
                    match c {
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\\' => match chars.next() {
                            Some((_, 'n')) => text.push('\n'),
                            Some((_, 't')) => text.push('\t'),
                            Some((_, other)) => text.push(other),
                            None => break,
                        },
                        c => text.push(c),
                    }
                }
                if !closed {
                    return Err(NotationError::UnterminatedString(offset));
                }
                let position = match chars.next_if(|&(_, c)| c == '@') {
                    Some((at, _)) => {
                        let mut spec = String::new();
                        while let Some((_, c)) = chars.next_if(|&(_, c)| c.is_ascii_digit() || c == ':') {
                            spec.push(c);
                        }
                        Some(parse_position(&spec, at)?)
                    }
                    None => None,
                };
                lexemes.push((Lexeme::Str { text, position }, offset));
            }
            _ => {
                let mut atom = String::new();
                while let Some((_, c)) = chars.next_if(|&(_, c)| !is_delimiter(c)) {
                    atom.push(c);
                }
                lexemes.push((Lexeme::Atom(atom), offset));
            }
        }
    }

    Ok(lexemes)
}

struct Parser {
    lexemes: Vec<(Lexeme, usize)>,
    pos: usize,
    cursor: Position,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Lexeme> {
        self.lexemes.get(self.pos).map(|(lexeme, _)| lexeme)
    }

    fn next(&mut self) -> Result<(Lexeme, usize), NotationError> {
        let item = self.lexemes.get(self.pos).cloned().ok_or(NotationError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(item)
    }

    fn element(&mut self, field: Option<String>) -> Result<SyntaxElement, NotationError> {
        let (lexeme, offset) = self.next()?;
        match lexeme {
            Lexeme::Atom(name) if field.is_none() && self.peek() == Some(&Lexeme::Equals) => {
                self.pos += 1;
                self.element(Some(name))
            }
            Lexeme::Open => {
                if self.depth == MAX_DEPTH {
                    return Err(NotationError::TooDeep {
                        limit: MAX_DEPTH,
                        offset,
                    });
                }
                self.depth += 1;
                let node = self.node(field)?;
                self.depth -= 1;
                Ok(SyntaxElement::Node(node))
            }
            Lexeme::Str { text, position } => {
                if let Some(position) = position {
                    self.cursor = position;
                }
                Ok(SyntaxElement::Token(SyntaxToken {
                    text,
                    field,
                    line: self.cursor.line,
                    column: self.cursor.column,
                }))
            }
            other => Err(NotationError::Unexpected {
                found: other.describe(),
                offset,
            }),
        }
    }

    fn node(&mut self, field: Option<String>) -> Result<SyntaxNode, NotationError> {
        let (header, offset) = match self.next()? {
            (Lexeme::Atom(header), offset) => (header, offset),
            (other, offset) => {
                return Err(NotationError::Unexpected {
                    found: other.describe(),
                    offset,
                })
            }
        };
        let kind = match header.split_once('@') {
            Some((kind, spec)) => {
                self.cursor = parse_position(spec, offset)?;
                kind.to_string()
            }
            None => header,
        };

        let mut node = SyntaxNode {
            kind,
            field,
            line: self.cursor.line,
            column: self.cursor.column,
            children: Vec::new(),
        };
        loop {
            if self.peek() == Some(&Lexeme::Close) {
                self.pos += 1;
                return Ok(node);
            }
            node.children.push(self.element(None)?);
        }
    }
}

/// Read a tree written in the parenthesized notation.
pub fn parse_tree(input: &str) -> Result<SyntaxNode, NotationError> {
    let mut parser = Parser {
        lexemes: lex(input)?,
        pos: 0,
        cursor: Position { line: 1, column: 0 },
        depth: 0,
    };
    let root = match parser.element(None)? {
        SyntaxElement::Node(node) => node,
        SyntaxElement::Token(_) => return Err(NotationError::RootNotNode),
    };
    if let Some((lexeme, offset)) = parser.lexemes.get(parser.pos) {
        return Err(NotationError::Unexpected {
            found: lexeme.describe(),
            offset: *offset,
        });
    }
    Ok(root)
}

/// Write a tree with an explicit position on every element.
pub fn to_notation(node: &SyntaxNode) -> String {
    let mut out = String::new();
    write_node(node, 0, &mut out);
    out
}

fn write_field(field: Option<&str>, out: &mut String) {
    if let Some(field) = field {
        out.push_str(field);
        out.push('=');
    }
}

fn write_quoted(text: &str, out: &mut String) {
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn write_node(node: &SyntaxNode, depth: usize, out: &mut String) {
    write_field(node.field.as_deref(), out);
    let _ = write!(out, "({}@{}:{}", node.kind, node.line, node.column);
    for child in &node.children {
        match child {
            SyntaxElement::Token(token) => {
                out.push(' ');
                write_field(token.field.as_deref(), out);
                write_quoted(&token.text, out);
                let _ = write!(out, "@{}:{}", token.line, token.column);
            }
            SyntaxElement::Node(child) => {
                out.push('\n');
                out.push_str(&"  ".repeat(depth + 1));
                write_node(child, depth + 1, out);
            }
        }
    }
    out.push(')');
}

impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_notation(self))
    }
}

impl FromStr for SyntaxNode {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_tree(s)
    }
}
