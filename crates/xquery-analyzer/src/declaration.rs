//! Declared program symbols: variables, functions and module imports.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;

use indexmap::IndexMap;
use serde::Serialize;

/// Strip the variable sigil and the namespace prefix from a raw name.
pub fn local_name(name: &str) -> &str {
    let name = name.strip_prefix('$').unwrap_or(name);
    match name.split_once(':') {
        Some((_, local)) => local,
        None => name,
    }
}

fn normalize_namespace(namespace: Option<&str>) -> Option<String> {
    namespace.filter(|ns| !ns.trim().is_empty()).map(str::to_string)
}

/// Identity of a symbol within a scope frame
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclarationKey {
    pub name: String,
    pub namespace: Option<String>,
}

impl DeclarationKey {
    pub fn new(name: &str, namespace: Option<&str>) -> Self {
        Self {
            name: local_name(name).to_string(),
            namespace: normalize_namespace(namespace),
        }
    }
}

/// A named, namespaced and optionally typed symbol.
///
/// Equality and hashing only consider the name and namespace, so a
/// redeclaration replaces the earlier entry of the same frame.
#[derive(Debug, Clone, Serialize)]
pub struct Declaration {
    pub name: String,
    pub namespace: Option<String>,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub line: u32,
}

impl Declaration {
    pub fn new(name: &str, namespace: Option<&str>) -> Self {
        Self {
            name: local_name(name).to_string(),
            namespace: normalize_namespace(namespace),
            type_name: None,
            line: 0,
        }
    }

    pub fn with_type(mut self, type_name: Option<String>) -> Self {
        self.type_name = type_name;
        self
    }

    pub fn at_line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }

    pub fn key(&self) -> DeclarationKey {
        DeclarationKey {
            name: self.name.clone(),
            namespace: self.namespace.clone(),
        }
    }

    pub fn has_type(&self, type_name: &str) -> bool {
        self.type_name.as_deref() == Some(type_name)
    }
}

impl PartialEq for Declaration {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.namespace == other.namespace
    }
}

impl Eq for Declaration {}

impl Hash for Declaration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.namespace.hash(state);
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Declaration [")?;
        if let Some(namespace) = &self.namespace {
            write!(f, "{namespace}:")?;
        }
        f.write_str(&self.name)?;
        if let Some(type_name) = &self.type_name {
            write!(f, "={type_name}")?;
        }
        write!(f, " ({})]", self.line)
    }
}

/// A function declaration with its ordered parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Function {
    #[serde(flatten)]
    pub declaration: Declaration,
    pub parameters: IndexMap<String, Declaration>,
}

impl Function {
    pub fn new(declaration: Declaration) -> Self {
        Self {
            declaration,
            parameters: IndexMap::new(),
        }
    }

    /// Parameters never carry a namespace
    pub fn add_parameter(&mut self, mut parameter: Declaration) {
        parameter.namespace = None;
        self.parameters.insert(parameter.name.clone(), parameter);
    }

    pub fn parameter(&self, name: &str) -> Option<&Declaration> {
        self.parameters.get(local_name(name))
    }
}

impl Deref for Function {
    type Target = Declaration;

    fn deref(&self) -> &Declaration {
        &self.declaration
    }
}

/// A module import binding a prefix to a namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Import {
    pub prefix: String,
    pub namespace: String,
    pub line: u32,
    pub location_hints: Vec<String>,
}

impl Import {
    pub fn new(prefix: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            namespace: namespace.into(),
            line: 0,
            location_hints: Vec::new(),
        }
    }

    pub fn add_location_hint(&mut self, hint: impl Into<String>) {
        self.location_hints.push(hint.into());
    }

    /// Primary location hint
    pub fn at_hint(&self) -> Option<&str> {
        self.location_hint(0)
    }

    pub fn location_hint(&self, index: usize) -> Option<&str> {
        self.location_hints.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_prefix_is_stripped() {
        let decl = Declaration::new("test:status", Some("http://x/test"));
        assert_eq!(decl.name, "status");
        assert_eq!(Declaration::new("$a", None).name, "a");
        assert_eq!(local_name("a:b:c"), "b:c");
    }

    #[test]
    fn test_empty_namespace_is_none() {
        assert_eq!(Declaration::new("x", Some("")).namespace, None);
        assert_eq!(DeclarationKey::new("x", Some("  ")), DeclarationKey::new("x", None));
    }

    #[test]
    fn test_equality_ignores_type_and_line() {
        let a = Declaration::new("x", Some("ns")).with_type(Some("xs:string".into())).at_line(3);
        let b = Declaration::new("x", Some("ns")).at_line(9);
        let c = Declaration::new("x", None);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display() {
        let decl = Declaration::new("x", Some("ns")).with_type(Some("xs:boolean".into())).at_line(4);
        assert_eq!(decl.to_string(), "Declaration [ns:x=xs:boolean (4)]");
        assert_eq!(Declaration::new("y", None).to_string(), "Declaration [y (0)]");
    }

    #[test]
    fn test_function_parameters_keep_order() {
        let mut function = Function::new(Declaration::new("local:add", Some("http://www.w3.org/2005/xquery-local-functions")));
        function.add_parameter(Declaration::new("b", Some("ignored")));
        function.add_parameter(Declaration::new("a", None).with_type(Some("xs:integer".into())));
        function.add_parameter(Declaration::new("b", None).with_type(Some("xs:string".into())));

        let names: Vec<_> = function.parameters.keys().cloned().collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(function.parameter("$b").and_then(|p| p.type_name.as_deref()), Some("xs:string"));
        assert_eq!(function.parameter("b").and_then(|p| p.namespace.as_deref()), None);
        assert_eq!(function.name, "add");
    }

    #[test]
    fn test_import_hints() {
        let mut import = Import::new("test", "http://x/test");
        assert_eq!(import.at_hint(), None);
        import.add_location_hint("/t.xqy");
        import.add_location_hint("/t2.xqy");
        assert_eq!(import.at_hint(), Some("/t.xqy"));
        assert_eq!(import.location_hint(1), Some("/t2.xqy"));
    }
}
