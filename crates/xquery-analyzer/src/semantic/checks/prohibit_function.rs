use xquery_syntax::SyntaxNode;

use crate::node_ext::NodeExt;
use crate::resolver::SymbolTable;

/// A function that calls are not allowed to reach.
///
/// A call matches when its local name equals `name` and either its prefix
/// equals `prefix` or the prefix resolves to `namespace`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProhibitedFunction {
    pub prefix: Option<&'static str>,
    pub namespace: Option<&'static str>,
    pub name: &'static str,
}

impl ProhibitedFunction {
    pub fn matches(&self, symbols: &SymbolTable, call: &SyntaxNode) -> bool {
        let Some(function) = call.function_name() else {
            return false;
        };
        let (prefix, local) = function.split_once(':').unwrap_or(("", function.as_str()));
        if local != self.name {
            return false;
        }

        let prefix_matches = self.prefix.is_some_and(|p| p == prefix);
        let namespace_matches = !prefix.is_empty()
            && self
                .namespace
                .is_some_and(|ns| symbols.resolve_prefix_namespace(prefix) == Some(ns));
        prefix_matches || namespace_matches
    }
}
