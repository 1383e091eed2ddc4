//! Read-only syntax tree consumed by the analyzer.
//!
//! Trees are produced by an external XQuery parser. Every node carries the
//! grammar rule name as its kind, the field label its parent rule gave it, and
//! the position of its first token.

use serde::{Deserialize, Serialize};

/// Deepest node nesting the readers and the analyzer accept
pub const MAX_DEPTH: usize = 512;

/// A non-terminal node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxNode {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub line: u32,
    #[serde(default)]
    pub column: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SyntaxElement>,
}

/// A terminal token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxToken {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub line: u32,
    #[serde(default)]
    pub column: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SyntaxElement {
    Node(SyntaxNode),
    Token(SyntaxToken),
}

/// Strip one pair of matching surrounding quotes.
pub fn unquote(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'"' || first == b'\'') && bytes[bytes.len() - 1] == first {
            return &text[1..text.len() - 1];
        }
    }
    text
}

impl SyntaxToken {
    pub fn new(text: impl Into<String>, line: u32) -> Self {
        Self {
            text: text.into(),
            field: None,
            line,
            column: 0,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_column(mut self, column: u32) -> Self {
        self.column = column;
        self
    }
}

impl SyntaxElement {
    pub fn line(&self) -> u32 {
        match self {
            Self::Node(node) => node.line,
            Self::Token(token) => token.line,
        }
    }

    pub fn column(&self) -> u32 {
        match self {
            Self::Node(node) => node.column,
            Self::Token(token) => token.column,
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Node(node) => node.field.as_deref(),
            Self::Token(token) => token.field.as_deref(),
        }
    }

    pub fn as_node(&self) -> Option<&SyntaxNode> {
        match self {
            Self::Node(node) => Some(node),
            Self::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&SyntaxToken> {
        match self {
            Self::Token(token) => Some(token),
            Self::Node(_) => None,
        }
    }

    pub fn text(&self) -> String {
        match self {
            Self::Node(node) => node.text(),
            Self::Token(token) => token.text.clone(),
        }
    }

    pub fn unquoted_text(&self) -> String {
        unquote(&self.text()).to_string()
    }

    fn write_text(&self, out: &mut String) {
        match self {
            Self::Node(node) => node.write_text(out),
            Self::Token(token) => out.push_str(&token.text),
        }
    }
}

impl From<SyntaxNode> for SyntaxElement {
    fn from(node: SyntaxNode) -> Self {
        Self::Node(node)
    }
}

impl From<SyntaxToken> for SyntaxElement {
    fn from(token: SyntaxToken) -> Self {
        Self::Token(token)
    }
}

impl SyntaxNode {
    pub fn new(kind: impl Into<String>, line: u32) -> Self {
        Self {
            kind: kind.into(),
            field: None,
            line,
            column: 0,
            children: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_column(mut self, column: u32) -> Self {
        self.column = column;
        self
    }

    pub fn with_child(mut self, child: impl Into<SyntaxElement>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    /// Immediate non-terminal children
    pub fn child_nodes(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.children.iter().filter_map(SyntaxElement::as_node)
    }

    /// Immediate terminal children
    pub fn tokens(&self) -> impl Iterator<Item = &SyntaxToken> {
        self.children.iter().filter_map(SyntaxElement::as_token)
    }

    pub fn child_by_field(&self, field: &str) -> Option<&SyntaxElement> {
        self.children.iter().find(|c| c.field() == Some(field))
    }

    pub fn children_by_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a SyntaxElement> {
        self.children.iter().filter(move |c| c.field() == Some(field))
    }

    pub fn node_by_field(&self, field: &str) -> Option<&SyntaxNode> {
        self.child_by_field(field).and_then(SyntaxElement::as_node)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.child_by_field(field).is_some()
    }

    pub fn child_by_kind(&self, kind: &str) -> Option<&SyntaxNode> {
        self.child_nodes().find(|c| c.kind == kind)
    }

    pub fn children_by_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a SyntaxNode> {
        self.child_nodes().filter(move |c| c.kind == kind)
    }

    /// Concatenated text of every descendant token
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    pub fn unquoted_text(&self) -> String {
        unquote(&self.text()).to_string()
    }

    fn write_text(&self, out: &mut String) {
        for child in &self.children {
            child.write_text(out);
        }
    }

    /// Depth-first search for the first node of `kind`, starting at `self`.
    pub fn find(&self, kind: &str) -> Option<&SyntaxNode> {
        self.find_path(&[kind])
    }

    /// Find the first node matching `path[0]`, then keep searching below it
    /// for the remaining kinds in order.
    pub fn find_path(&self, path: &[&str]) -> Option<&SyntaxNode> {
        let (first, rest) = path.split_first()?;
        if self.kind == *first {
            if rest.is_empty() {
                return Some(self);
            }
            return self.child_nodes().find_map(|c| c.find_path(rest));
        }
        self.child_nodes().find_map(|c| c.find_path(path))
    }

    pub fn exists(&self, kind: &str) -> bool {
        self.find(kind).is_some()
    }

    /// Nesting depth of the deepest descendant, counting `self` as 1
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(node.child_nodes().map(|child| (child, depth + 1)));
        }
        deepest
    }

    /// Pre-order iterator over this node and every descendant node
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a SyntaxNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a SyntaxNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.child_nodes().collect::<Vec<_>>().into_iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SyntaxNode {
        SyntaxNode::new("ifExpr", 1)
            .with_child(SyntaxToken::new("if", 1))
            .with_child(SyntaxToken::new("(", 1))
            .with_child(
                SyntaxNode::new("expr", 1).with_field("condition").with_child(
                    SyntaxNode::new("relativePathExpr", 1).with_child(
                        SyntaxNode::new("stepExpr", 1)
                            .with_child(SyntaxNode::new("varRef", 2).with_child(SyntaxToken::new("$a", 2))),
                    ),
                ),
            )
            .with_child(SyntaxToken::new(")", 2))
    }

    #[test]
    fn test_text_concatenates_tokens() {
        assert_eq!(sample().text(), "if($a)");
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'http://x'"), "http://x");
        assert_eq!(unquote("\"a\""), "a");
        assert_eq!(unquote("'a\""), "'a\"");
        assert_eq!(unquote("'"), "'");
        assert_eq!(unquote("plain"), "plain");
    }

    #[test]
    fn test_child_by_field() {
        let node = sample();
        let condition = node.node_by_field("condition").expect("should have condition");
        assert_eq!(condition.kind, "expr");
        assert!(node.has_field("condition"));
        assert!(!node.has_field("type"));
    }

    #[test]
    fn test_find_includes_self() {
        let node = sample();
        assert_eq!(node.find("ifExpr").map(|n| n.line), Some(1));
        assert_eq!(node.find("varRef").map(|n| n.line), Some(2));
        assert!(node.find("functionCall").is_none());
        assert!(node.exists("stepExpr"));
    }

    #[test]
    fn test_find_path_descends_in_order() {
        let node = sample();
        assert!(node.find_path(&["expr", "varRef"]).is_some());
        assert!(node.find_path(&["varRef", "expr"]).is_none());
        assert!(node.find_path(&[]).is_none());
    }

    #[test]
    fn test_descendants_preorder() {
        let kinds: Vec<_> = sample().descendants().map(|n| n.kind.clone()).collect();
        assert_eq!(kinds, vec!["ifExpr", "expr", "relativePathExpr", "stepExpr", "varRef"]);
    }

    #[test]
    fn test_depth() {
        assert_eq!(sample().depth(), 5);
        assert_eq!(SyntaxNode::new("module", 1).depth(), 1);
    }

    #[test]
    fn test_json_element_tagging() {
        let node = SyntaxNode::new("qName", 3).with_child(SyntaxToken::new("x:y", 3));
        let json = serde_json::to_value(SyntaxElement::from(node.clone())).expect("should serialize");
        assert_eq!(json["type"], "node");
        assert_eq!(json["children"][0]["type"], "token");

        let back: SyntaxElement = serde_json::from_value(json).expect("should deserialize");
        assert_eq!(back.as_node(), Some(&node));
    }
}
