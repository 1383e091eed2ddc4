//! Scope frames for symbol resolution.
//!
//! Frames live in an arena and link to their parent. Frames are opened and
//! closed in stack order, so closing a frame truncates the arena. The reserved
//! root frame has no parent and can never be closed.

use std::collections::HashMap;

use crate::declaration::{Declaration, DeclarationKey, Function};

/// Unique identifier for a scope frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub usize);

impl ScopeId {
    pub const RESERVED: ScopeId = ScopeId(0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Run-wide frame holding library exports
    Reserved,
    /// One per source unit in the local pass
    Source,
    FunctionBody,
    Flwor,
}

/// A variable or function bound in a frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Variable(Declaration),
    Function(Function),
}

impl Symbol {
    pub fn declaration(&self) -> &Declaration {
        match self {
            Self::Variable(decl) => decl,
            Self::Function(function) => &function.declaration,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Self::Function(function) => Some(function),
            Self::Variable(_) => None,
        }
    }

    fn key(&self) -> DeclarationKey {
        self.declaration().key()
    }
}

#[derive(Debug)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    symbols: HashMap<DeclarationKey, Symbol>,
}

impl Scope {
    fn new(id: ScopeId, kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Self {
            id,
            kind,
            parent,
            symbols: HashMap::new(),
        }
    }
}

#[derive(Debug)]
pub struct ScopeTable {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl Default for ScopeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTable {
    /// Create a table holding only the reserved frame
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(ScopeId::RESERVED, ScopeKind::Reserved, None)],
            current: ScopeId::RESERVED,
        }
    }

    /// Open a frame on top of the current one
    pub fn push(&mut self, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(id, kind, Some(self.current)));
        self.current = id;
        id
    }

    /// Close the current frame and return to its parent.
    /// Returns `None` when only the reserved frame is left.
    pub fn pop(&mut self) -> Option<ScopeId> {
        let parent = self.scopes[self.current.0].parent?;
        self.scopes.truncate(self.current.0);
        self.current = parent;
        Some(parent)
    }

    /// Close every frame above the reserved one
    pub fn unwind(&mut self) {
        self.scopes.truncate(1);
        self.current = ScopeId::RESERVED;
    }

    #[cfg(test)]
    pub(crate) fn current(&self) -> ScopeId {
        self.current
    }

    #[cfg(test)]
    pub(crate) fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0)
    }

    pub fn frame_count(&self) -> usize {
        self.scopes.len()
    }

    /// Bind a symbol in the current frame, replacing any symbol with the same key
    pub fn define(&mut self, symbol: Symbol) {
        let current = self.current.0;
        self.scopes[current].symbols.insert(symbol.key(), symbol);
    }

    /// Bind a symbol in the reserved frame
    pub fn define_reserved(&mut self, symbol: Symbol) {
        self.scopes[0].symbols.insert(symbol.key(), symbol);
    }

    /// Look a key up from the current frame outwards
    pub fn lookup(&self, key: &DeclarationKey) -> Option<&Symbol> {
        let mut scope_id = self.current;

        loop {
            let scope = &self.scopes[scope_id.0];
            if let Some(symbol) = scope.symbols.get(key) {
                return Some(symbol);
            }

            match scope.parent {
                Some(parent) => scope_id = parent,
                None => return None,
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn lookup_reserved(&self, key: &DeclarationKey) -> Option<&Symbol> {
        self.scopes[0].symbols.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str, type_name: &str) -> Symbol {
        Symbol::Variable(Declaration::new(name, None).with_type(Some(type_name.to_string())))
    }

    fn key(name: &str) -> DeclarationKey {
        DeclarationKey::new(name, None)
    }

    fn type_of(table: &ScopeTable, name: &str) -> Option<String> {
        table.lookup(&key(name)).and_then(|s| s.declaration().type_name.clone())
    }

    #[test]
    fn test_new_table_has_reserved_frame() {
        let table = ScopeTable::new();
        assert_eq!(table.frame_count(), 1);
        assert_eq!(table.current(), ScopeId::RESERVED);
        assert_eq!(table.scope(table.current()).map(|s| s.kind), Some(ScopeKind::Reserved));
    }

    #[test]
    fn test_cannot_pop_reserved_frame() {
        let mut table = ScopeTable::new();
        assert_eq!(table.pop(), None);
        table.push(ScopeKind::Source);
        assert_eq!(table.pop(), Some(ScopeId::RESERVED));
        assert_eq!(table.pop(), None);
        assert_eq!(table.frame_count(), 1);
    }

    #[test]
    fn test_shadowing_and_pop() {
        let mut table = ScopeTable::new();
        table.define_reserved(var("x", "xs:string"));
        table.push(ScopeKind::Source);
        table.push(ScopeKind::Flwor);
        table.define(var("x", "xs:boolean"));
        assert_eq!(type_of(&table, "x").as_deref(), Some("xs:boolean"));

        table.pop();
        assert_eq!(type_of(&table, "x").as_deref(), Some("xs:string"));
    }

    #[test]
    fn test_redefinition_replaces_in_same_frame() {
        let mut table = ScopeTable::new();
        table.push(ScopeKind::Source);
        table.define(var("x", "xs:string"));
        table.define(var("x", "xs:integer"));
        assert_eq!(type_of(&table, "x").as_deref(), Some("xs:integer"));
        assert_eq!(table.scope(table.current()).map(|s| s.symbols.len()), Some(1));
    }

    #[test]
    fn test_unwind_keeps_reserved_symbols() {
        let mut table = ScopeTable::new();
        table.define_reserved(var("g", "xs:boolean"));
        table.push(ScopeKind::Source);
        table.push(ScopeKind::FunctionBody);
        table.define(var("l", "xs:string"));
        table.unwind();

        assert_eq!(table.frame_count(), 1);
        assert!(table.lookup(&key("l")).is_none());
        assert!(table.lookup(&key("g")).is_some());
        assert!(table.lookup_reserved(&key("g")).is_some());
    }

    #[test]
    fn test_push_after_pop_reuses_slot() {
        let mut table = ScopeTable::new();
        table.push(ScopeKind::Source);
        let flwor = table.push(ScopeKind::Flwor);
        table.define(var("x", "xs:string"));
        table.pop();
        let again = table.push(ScopeKind::Flwor);
        assert_eq!(flwor, again);
        assert!(table.lookup(&key("x")).is_none());
    }
}
