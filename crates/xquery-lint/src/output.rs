//! Rendering unit reports for the terminal.

use std::fmt::Write as _;

use serde::Serialize;
use xquery_analyzer::{CheckRegistry, Priority, UnitReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "human" | "text" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(format!("Unknown format: {other}")),
        }
    }
}

/// One line per issue: `<unit>:<line>: <Priority> [<RuleKey>] <message>`
pub fn format_human(reports: &[UnitReport], registry: &CheckRegistry) -> String {
    let mut out = String::new();
    for report in reports {
        for issue in &report.issues {
            let priority = registry
                .rule(&issue.rule)
                .map_or(Priority::Info, |rule| rule.priority);
            let _ = writeln!(
                out,
                "{}:{}: {} [{}] {}",
                report.unit, issue.line, priority, issue.rule, issue.message
            );
        }
    }
    out
}

#[derive(Serialize)]
struct JsonIssue<'a> {
    rule: &'a str,
    priority: Priority,
    line: u32,
    message: &'a str,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    unit: &'a str,
    failed: bool,
    issues: Vec<JsonIssue<'a>>,
}

pub fn format_json(reports: &[UnitReport], registry: &CheckRegistry) -> Result<String, serde_json::Error> {
    let reports: Vec<JsonReport<'_>> = reports
        .iter()
        .map(|report| JsonReport {
            unit: &report.unit,
            failed: report.failed,
            issues: report
                .issues
                .iter()
                .map(|issue| JsonIssue {
                    rule: &issue.rule,
                    priority: registry.rule(&issue.rule).map_or(Priority::Info, |rule| rule.priority),
                    line: issue.line,
                    message: &issue.message,
                })
                .collect(),
        })
        .collect();
    serde_json::to_string_pretty(&reports)
}
