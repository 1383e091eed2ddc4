//! Syntax problems reported by the parser.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reports caused by the parser running off the end of a truncated unit
const IGNORED_PREFIX: &str = "mismatched input '<EOF>'";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub line: u32,
    #[serde(default)]
    pub column: u32,
    pub message: String,
}

impl Problem {
    pub fn new(line: u32, column: u32, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }

    pub fn message_string(&self) -> String {
        format!(" - line {}: {} - {}", self.line, self.column, self.message)
    }
}

/// Returned when a problem is reported while `fail_on_error` is set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse cancelled:{0}")]
pub struct ParseCancelled(pub String);

#[derive(Debug, Clone, Default)]
pub struct ProblemReporter {
    problems: Vec<Problem>,
    fail_on_error: bool,
}

impl ProblemReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fail_on_error(mut self, fail_on_error: bool) -> Self {
        self.fail_on_error = fail_on_error;
        self
    }

    /// Build a non-failing reporter from problems collected elsewhere.
    pub fn from_problems(problems: impl IntoIterator<Item = Problem>) -> Self {
        let mut reporter = Self::new();
        for problem in problems {
            reporter.record(problem);
        }
        reporter
    }

    pub fn report(&mut self, line: u32, column: u32, message: impl Into<String>) -> Result<(), ParseCancelled> {
        let problem = Problem::new(line, column, message);
        if problem.message.starts_with(IGNORED_PREFIX) {
            return Ok(());
        }
        let rendered = problem.message_string();
        self.problems.push(problem);
        if self.fail_on_error {
            return Err(ParseCancelled(rendered));
        }
        Ok(())
    }

    fn record(&mut self, problem: Problem) {
        if !problem.message.starts_with(IGNORED_PREFIX) {
            self.problems.push(problem);
        }
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}
