//! Analysis driver over a set of source units.

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use xquery_syntax::{Problem, SyntaxNode, MAX_DEPTH};

use crate::config::LintConfig;
use crate::error::ConfigError;
use crate::issues::Issue;
use crate::resolver::{GlobalMapper, LocalResolver};
use crate::semantic::checks::RegisteredRule;
use crate::semantic::walker::{map_dependencies, process};
use crate::semantic::{Check, CheckRegistry};

/// One parsed source file and the problems its parser reported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceUnit {
    pub name: String,
    pub tree: SyntaxNode,
    #[serde(default)]
    pub problems: Vec<Problem>,
}

impl SourceUnit {
    pub fn new(name: impl Into<String>, tree: SyntaxNode) -> Self {
        Self {
            name: name.into(),
            tree,
            problems: Vec::new(),
        }
    }

    pub fn with_problems(mut self, problems: Vec<Problem>) -> Self {
        self.problems = problems;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitReport {
    pub unit: String,
    pub issues: Vec<Issue>,
    /// The unit could not be analyzed and contributes no issues
    pub failed: bool,
}

pub struct Analyzer {
    config: LintConfig,
    registry: CheckRegistry,
    rules: Vec<RegisteredRule>,
}

impl Analyzer {
    pub fn new(config: LintConfig) -> Result<Self, ConfigError> {
        Self::with_registry(config, CheckRegistry::new())
    }

    pub fn with_registry(config: LintConfig, registry: CheckRegistry) -> Result<Self, ConfigError> {
        let rules = registry.active(&config)?;
        tracing::debug!("{} active rule(s)", rules.len());
        Ok(Self { config, registry, rules })
    }

    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    fn checks(&self) -> Vec<Box<dyn Check>> {
        self.rules.iter().map(|rule| rule.instantiate(&self.config)).collect()
    }

    /// Map every unit globally, then analyze each unit. Reports keep the
    /// order of `units`.
    ///
    /// Units nesting deeper than [`MAX_DEPTH`] are reported as failed
    /// without being walked.
    pub fn analyze(&self, units: &[SourceUnit]) -> Vec<UnitReport> {
        let mut failed = HashSet::new();

        let mut mapper = GlobalMapper::new();
        for (index, unit) in units.iter().enumerate() {
            let depth = unit.tree.depth();
            if depth > MAX_DEPTH {
                tracing::error!("Skipping {}: tree is {} levels deep (limit {})", unit.name, depth, MAX_DEPTH);
                failed.insert(index);
                continue;
            }
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                map_dependencies(&unit.name, &unit.tree, &mut mapper);
            }));
            if let Err(payload) = result {
                tracing::error!("Mapping {} panicked: {}", unit.name, panic_message(payload.as_ref()));
                mapper.recover();
                failed.insert(index);
            }
        }

        let mut resolver = mapper.into_local();
        units
            .iter()
            .enumerate()
            .map(|(index, unit)| {
                if failed.contains(&index) {
                    return UnitReport::failed(unit);
                }
                self.analyze_unit(unit, &mut resolver)
            })
            .collect()
    }

    fn analyze_unit(&self, unit: &SourceUnit, resolver: &mut LocalResolver) -> UnitReport {
        let mut checks = self.checks();
        let result = panic::catch_unwind(AssertUnwindSafe(|| process(unit, &mut *resolver, &mut checks)));

        match result {
            Ok(issues) => UnitReport {
                unit: unit.name.clone(),
                issues,
                failed: false,
            },
            Err(payload) => {
                tracing::error!("Analysis of {} panicked: {}", unit.name, panic_message(payload.as_ref()));
                resolver.recover();
                UnitReport::failed(unit)
            }
        }
    }
}

impl UnitReport {
    fn failed(unit: &SourceUnit) -> Self {
        Self {
            unit: unit.name.clone(),
            issues: Vec::new(),
            failed: true,
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
