//! Semantic analysis for XQuery syntax trees.
//!
//! Library modules are mapped first so that every unit can resolve the
//! functions and variables it imports, then each unit is walked by the
//! configured rule checks.

pub mod config;
pub mod declaration;
pub mod error;
pub mod issues;
pub mod node_ext;
pub mod project;
pub mod resolver;
pub mod scope;
pub mod semantic;

pub use config::LintConfig;
pub use declaration::{Declaration, DeclarationKey, Function, Import};
pub use error::ConfigError;
pub use issues::{Issue, IssueSink, Priority};
pub use project::{Analyzer, SourceUnit, UnitReport};
pub use resolver::{GlobalMapper, LocalResolver, Mode, Resolver, SymbolTable};
pub use scope::{ScopeId, ScopeKind, ScopeTable};
pub use semantic::{Check, CheckContext, CheckRegistry, RuleInfo};
