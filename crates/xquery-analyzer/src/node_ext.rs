//! Accessors for the grammar shapes the resolver and checks read.

use xquery_syntax::{field, kind, SyntaxElement, SyntaxNode};

pub trait NodeExt {
    /// Text of the `name` field
    fn name_text(&self) -> Option<String>;

    /// Name of a called or declared function: the `functionName` child,
    /// falling back to the `name` field
    fn function_name(&self) -> Option<String>;

    /// Declared type: the `itemType` below the `type` field, or the whole
    /// field text when it has no `itemType`
    fn declared_type(&self) -> Option<String>;

    /// Text of a field with one pair of surrounding quotes removed
    fn unquoted_field(&self, field: &str) -> Option<String>;

    /// Parameters of a function declaration
    fn params(&self) -> Vec<&SyntaxNode>;
}

impl NodeExt for SyntaxNode {
    fn name_text(&self) -> Option<String> {
        self.child_by_field(field::NAME).map(SyntaxElement::text)
    }

    fn function_name(&self) -> Option<String> {
        self.child_by_kind(kind::FUNCTION_NAME)
            .map(SyntaxNode::text)
            .or_else(|| self.name_text())
            .filter(|name| !name.trim().is_empty())
    }

    fn declared_type(&self) -> Option<String> {
        match self.child_by_field(field::TYPE)? {
            SyntaxElement::Node(ty) => Some(ty.find(kind::ITEM_TYPE).map_or_else(|| ty.text(), SyntaxNode::text)),
            SyntaxElement::Token(token) => Some(token.text.clone()),
        }
    }

    fn unquoted_field(&self, field: &str) -> Option<String> {
        self.child_by_field(field).map(SyntaxElement::unquoted_text)
    }

    fn params(&self) -> Vec<&SyntaxNode> {
        match self.child_by_kind(kind::PARAM_LIST) {
            Some(list) => list.children_by_kind(kind::PARAM).collect(),
            None => self.children_by_kind(kind::PARAM).collect(),
        }
    }
}
