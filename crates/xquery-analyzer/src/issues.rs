use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Rule priority levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Critical,
    Major,
    Minor,
    Info,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Critical => "Critical",
            Self::Major => "Major",
            Self::Minor => "Minor",
            Self::Info => "Info",
        };
        f.write_str(name)
    }
}

/// A finding raised by a rule check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub rule: String,
    pub line: u32,
    pub message: String,
}

/// Issues of one source unit, unique by (rule, line)
#[derive(Debug, Default)]
pub struct IssueSink {
    issues: Vec<Issue>,
    seen: HashSet<(String, u32)>,
}

impl IssueSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an issue unless one already exists for the same rule and line.
    ///
    /// Lines below 1 are reported on line 1. A missing message falls back to
    /// the rule key. Returns whether the issue was added.
    pub fn create_issue(&mut self, rule: &str, line: u32, message: Option<&str>) -> bool {
        let line = line.max(1);
        if !self.seen.insert((rule.to_string(), line)) {
            return false;
        }
        self.issues.push(Issue {
            rule: rule.to_string(),
            line,
            message: message.unwrap_or(rule).to_string(),
        });
        true
    }

    pub fn issue(&self, rule: &str, line: u32) -> Option<&Issue> {
        self.issues.iter().find(|i| i.rule == rule && i.line == line)
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_issue_is_idempotent_per_rule_and_line() {
        let mut sink = IssueSink::new();
        assert!(sink.create_issue("OrderByRange", 4, Some("first")));
        assert!(!sink.create_issue("OrderByRange", 4, Some("second")));
        assert!(sink.create_issue("OrderByRange", 5, None));
        assert!(sink.create_issue("XQueryVersion", 4, None));

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.issue("OrderByRange", 4).map(|i| i.message.as_str()), Some("first"));
    }

    #[test]
    fn test_message_defaults_to_rule_key() {
        let mut sink = IssueSink::new();
        sink.create_issue("DynamicFunction", 2, None);
        assert_eq!(sink.issues()[0].message, "DynamicFunction");
    }

    #[test]
    fn test_line_zero_is_clamped() {
        let mut sink = IssueSink::new();
        sink.create_issue("ParseError", 0, Some("x"));
        assert!(!sink.create_issue("ParseError", 1, Some("y")));
        assert_eq!(sink.into_issues(), vec![Issue {
            rule: "ParseError".to_string(),
            line: 1,
            message: "x".to_string(),
        }]);
    }

    #[test]
    fn test_priority_display() {
        assert_eq!(Priority::Critical.to_string(), "Critical");
        assert_eq!(Priority::Info.to_string(), "Info");
    }
}
