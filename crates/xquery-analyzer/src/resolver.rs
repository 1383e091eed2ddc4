//! Two-phase symbol resolution.
//!
//! The [`GlobalMapper`] walks every unit first and records the functions and
//! variables exported by library modules in the reserved frame. It then turns
//! into a [`LocalResolver`], which walks each unit again with full scoping so
//! checks can look up declared types by name and namespace.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use xquery_syntax::{field, kind, SyntaxElement, SyntaxNode};

use crate::declaration::{Declaration, DeclarationKey, Function, Import};
use crate::error::ConfigError;
use crate::node_ext::NodeExt;
use crate::scope::{ScopeKind, ScopeTable, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Global,
    Local,
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(Self::Global),
            "local" => Ok(Self::Local),
            other => Err(ConfigError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Local => f.write_str("local"),
        }
    }
}

/// Prefix and namespace declared by a library module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleIdentity {
    pub prefix: String,
    pub namespace: String,
}

/// Declarations, imports and module identity shared by both resolver phases
#[derive(Debug, Default)]
pub struct SymbolTable {
    scopes: ScopeTable,
    imports: IndexMap<String, Import>,
    module: Option<ModuleIdentity>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variable_declaration(&self, name: &str, namespace: Option<&str>) -> Option<&Declaration> {
        self.scopes
            .lookup(&DeclarationKey::new(name, namespace))
            .map(Symbol::declaration)
    }

    /// `None` when the innermost symbol under the key is not a function
    pub fn function_declaration(&self, name: &str, namespace: Option<&str>) -> Option<&Function> {
        self.scopes
            .lookup(&DeclarationKey::new(name, namespace))
            .and_then(Symbol::as_function)
    }

    /// Namespace bound to the prefix of `qname` (or to `qname` itself when it
    /// has no prefix separator).
    pub fn resolve_prefix_namespace(&self, qname: &str) -> Option<&str> {
        let qname = qname.strip_prefix('$').unwrap_or(qname);
        let prefix = qname.split_once(':').map_or(qname, |(prefix, _)| prefix);

        if let Some(module) = &self.module {
            if module.prefix == prefix {
                return Some(&module.namespace);
            }
        }
        self.imports.get(prefix).map(|import| import.namespace.as_str())
    }

    pub fn import(&self, prefix: &str) -> Option<&Import> {
        self.imports.get(prefix)
    }

    pub fn imports(&self) -> &IndexMap<String, Import> {
        &self.imports
    }

    pub fn module_identity(&self) -> Option<&ModuleIdentity> {
        self.module.as_ref()
    }

    /// Namespace of the current library module, if one was declared
    pub fn namespace(&self) -> Option<&str> {
        self.module
            .as_ref()
            .map(|m| m.namespace.as_str())
            .filter(|ns| !ns.is_empty())
    }

    pub fn scopes(&self) -> &ScopeTable {
        &self.scopes
    }

    pub fn frame_count(&self) -> usize {
        self.scopes.frame_count()
    }

    fn reset_unit(&mut self) {
        self.imports.clear();
        self.module = None;
    }

    fn map_module_declaration(&mut self, node: &SyntaxNode) {
        let prefix = node.child_by_field(field::PREFIX).map(SyntaxElement::text).unwrap_or_default();
        let namespace = node.unquoted_field(field::URI).unwrap_or_default();
        tracing::debug!("Module {} = {}", prefix, namespace);
        self.module = Some(ModuleIdentity { prefix, namespace });
    }

    /// Function declared by `node`, its parameters on the declaration line
    fn function_symbol(&self, node: &SyntaxNode) -> Option<Function> {
        let name = node.function_name()?;
        let declaration = Declaration::new(&name, self.namespace())
            .with_type(node.declared_type())
            .at_line(node.line);

        let mut function = Function::new(declaration);
        for param in node.params() {
            if let Some(param_name) = param.name_text() {
                function.add_parameter(
                    Declaration::new(&param_name, None)
                        .with_type(param.declared_type())
                        .at_line(node.line),
                );
            }
        }
        Some(function)
    }

    fn variable_symbol(&self, node: &SyntaxNode) -> Option<Declaration> {
        let name = node.name_text()?;
        Some(
            Declaration::new(&name, self.namespace())
                .with_type(node.declared_type())
                .at_line(node.line),
        )
    }
}

/// Parameters of a function declaration, each on its own line
fn parameter_symbols(node: &SyntaxNode) -> Vec<Declaration> {
    node.params()
        .into_iter()
        .filter_map(|param| {
            let name = param.name_text()?;
            Some(Declaration::new(&name, None).with_type(param.declared_type()).at_line(param.line))
        })
        .collect()
}

fn let_symbols(node: &SyntaxNode) -> Vec<Declaration> {
    node.children_by_kind(kind::LET_VAR)
        .filter_map(|var| {
            let name = var.name_text()?;
            Some(Declaration::new(&name, None).with_type(var.declared_type()).at_line(node.line))
        })
        .collect()
}

fn import_of(node: &SyntaxNode) -> Option<Import> {
    let prefix = node.child_by_field(field::PREFIX)?.text();
    let namespace = node.unquoted_field(field::URI).unwrap_or_default();
    let mut import = Import::new(prefix, namespace);
    import.line = node.line;
    for hint in node.children_by_field(field::AT) {
        import.add_location_hint(hint.unquoted_text());
    }
    Some(import)
}

/// Resolver hooks called by the tree walker, plus lookups checks rely on
pub trait Resolver {
    fn mode(&self) -> Mode;

    fn symbols(&self) -> &SymbolTable;

    fn enter_source(&mut self, unit: &str, root: &SyntaxNode);

    fn exit_source(&mut self, root: &SyntaxNode);

    fn enter_expression(&mut self, node: &SyntaxNode);

    fn exit_expression(&mut self, node: &SyntaxNode);

    fn variable_declaration(&self, name: &str, namespace: Option<&str>) -> Option<&Declaration> {
        self.symbols().variable_declaration(name, namespace)
    }

    fn function_declaration(&self, name: &str, namespace: Option<&str>) -> Option<&Function> {
        self.symbols().function_declaration(name, namespace)
    }

    fn resolve_prefix_namespace(&self, qname: &str) -> Option<&str> {
        self.symbols().resolve_prefix_namespace(qname)
    }
}

/// First phase: records library exports in the reserved frame
#[derive(Debug, Default)]
pub struct GlobalMapper {
    symbols: SymbolTable,
}

impl GlobalMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to the second phase, keeping every global declaration
    pub fn into_local(self) -> LocalResolver {
        LocalResolver {
            symbols: self.symbols,
            pending_params: Vec::new(),
        }
    }

    /// Drop the module identity of a unit whose mapping failed
    pub fn recover(&mut self) {
        self.symbols.reset_unit();
    }
}

impl Resolver for GlobalMapper {
    fn mode(&self) -> Mode {
        Mode::Global
    }

    fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    fn enter_source(&mut self, unit: &str, _root: &SyntaxNode) {
        tracing::debug!("Mapping global declarations of {}", unit);
        self.symbols.reset_unit();
    }

    fn exit_source(&mut self, _root: &SyntaxNode) {}

    fn enter_expression(&mut self, node: &SyntaxNode) {
        match node.kind.as_str() {
            kind::MODULE_DECL => self.symbols.map_module_declaration(node),
            // Main modules have no namespace and export nothing
            kind::FUNCTION_DECL if self.symbols.namespace().is_some() => {
                if let Some(function) = self.symbols.function_symbol(node) {
                    tracing::trace!("Global {}", function.declaration);
                    self.symbols.scopes.define_reserved(Symbol::Function(function));
                }
            }
            kind::VAR_DECL if self.symbols.namespace().is_some() => {
                if let Some(variable) = self.symbols.variable_symbol(node) {
                    tracing::trace!("Global {}", variable);
                    self.symbols.scopes.define_reserved(Symbol::Variable(variable));
                }
            }
            _ => {}
        }
    }

    fn exit_expression(&mut self, _node: &SyntaxNode) {}
}

/// Second phase: tracks every declaration with lexical scoping
#[derive(Debug)]
pub struct LocalResolver {
    symbols: SymbolTable,
    /// Parameters of the enclosing function declarations, innermost last
    pending_params: Vec<Vec<Declaration>>,
}

impl LocalResolver {
    /// Drop all unit state after a failed walk, keeping the global declarations
    pub fn recover(&mut self) {
        self.symbols.scopes.unwind();
        self.symbols.reset_unit();
        self.pending_params.clear();
    }
}

impl Resolver for LocalResolver {
    fn mode(&self) -> Mode {
        Mode::Local
    }

    fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    fn enter_source(&mut self, unit: &str, _root: &SyntaxNode) {
        tracing::debug!("Resolving local declarations of {}", unit);
        self.symbols.reset_unit();
        self.symbols.scopes.unwind();
        self.symbols.scopes.push(ScopeKind::Source);
        self.pending_params.clear();
    }

    fn exit_source(&mut self, _root: &SyntaxNode) {
        self.symbols.scopes.unwind();
    }

    fn enter_expression(&mut self, node: &SyntaxNode) {
        match node.kind.as_str() {
            kind::MODULE_DECL => self.symbols.map_module_declaration(node),
            kind::FUNCTION_BODY => {
                self.symbols.scopes.push(ScopeKind::FunctionBody);
                if let Some(params) = self.pending_params.last() {
                    for param in params.clone() {
                        self.symbols.scopes.define(Symbol::Variable(param));
                    }
                }
            }
            kind::FLWOR_EXPR => {
                self.symbols.scopes.push(ScopeKind::Flwor);
            }
            kind::LET_CLAUSE => {
                for variable in let_symbols(node) {
                    self.symbols.scopes.define(Symbol::Variable(variable));
                }
            }
            kind::VAR_DECL => {
                if let Some(variable) = self.symbols.variable_symbol(node) {
                    self.symbols.scopes.define(Symbol::Variable(variable));
                }
            }
            kind::FUNCTION_DECL => {
                if let Some(function) = self.symbols.function_symbol(node) {
                    self.symbols.scopes.define(Symbol::Function(function));
                }
                self.pending_params.push(parameter_symbols(node));
            }
            kind::MODULE_IMPORT => {
                if let Some(import) = import_of(node) {
                    self.symbols.imports.insert(import.prefix.clone(), import);
                }
            }
            _ => {}
        }
    }

    fn exit_expression(&mut self, node: &SyntaxNode) {
        match node.kind.as_str() {
            kind::FUNCTION_BODY | kind::FLWOR_EXPR => {
                self.symbols.scopes.pop();
            }
            kind::FUNCTION_DECL => {
                self.pending_params.pop();
            }
            // Each main module is an independent transaction of the unit
            kind::MAIN_MODULE => {
                self.symbols.scopes.unwind();
                self.symbols.scopes.push(ScopeKind::Source);
            }
            _ => {}
        }
    }
}
