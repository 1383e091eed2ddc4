//! Rule check framework for XQuery.
//!
//! Checks are visitors driven by [`walker::process`]. Each check sees every
//! node of a unit after the resolver has handled it, and reports issues through
//! the [`CheckContext`].

pub mod checks;
pub mod walker;

pub use checks::CheckRegistry;

use xquery_syntax::{ProblemReporter, SyntaxNode};

use crate::issues::{IssueSink, Priority};
use crate::resolver::SymbolTable;

/// Catalogue entry describing a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleInfo {
    pub key: &'static str,
    pub name: &'static str,
    pub priority: Priority,
    pub description: &'static str,
    /// Opt-in rules are only active when enabled in the configuration
    pub default_enabled: bool,
}

/// What a check can see and do while a unit is walked
pub struct CheckContext<'a> {
    unit: &'a str,
    symbols: &'a SymbolTable,
    issues: &'a mut IssueSink,
}

impl<'a> CheckContext<'a> {
    pub fn new(unit: &'a str, symbols: &'a SymbolTable, issues: &'a mut IssueSink) -> Self {
        Self { unit, symbols, issues }
    }

    pub fn unit(&self) -> &str {
        self.unit
    }

    /// Resolver state after the current node was handled
    pub fn symbols(&self) -> &'a SymbolTable {
        self.symbols
    }

    /// Record an issue once per (rule, line). The message defaults to the rule key.
    pub fn create_issue(&mut self, rule: &str, line: u32, message: Option<&str>) {
        self.issues.create_issue(rule, line, message);
    }

    pub fn issues(&self) -> &IssueSink {
        &*self.issues
    }
}

/// A rule check.
///
/// All hooks default to no-ops; a check overrides only what its rule needs.
pub trait Check {
    fn rule(&self) -> &'static RuleInfo;

    fn enter_source(&mut self, _ctx: &mut CheckContext<'_>, _root: &SyntaxNode) {}

    fn exit_source(&mut self, _ctx: &mut CheckContext<'_>, _root: &SyntaxNode) {}

    fn enter_expression(&mut self, _ctx: &mut CheckContext<'_>, _node: &SyntaxNode) {}

    fn exit_expression(&mut self, _ctx: &mut CheckContext<'_>, _node: &SyntaxNode) {}

    /// Runs after the walk with the parser's diagnostics for the unit
    fn check_report(&mut self, _ctx: &mut CheckContext<'_>, _reporter: &ProblemReporter) {}
}
