use xquery_syntax::ProblemReporter;

use crate::config::DEFAULT_ALLOWED_PARSE_MESSAGES;
use crate::issues::Priority;
use crate::semantic::{Check, CheckContext, RuleInfo};

pub static RULE: RuleInfo = RuleInfo {
    key: "ParseError",
    name: "Code Parsing Error",
    priority: Priority::Info,
    description: "Catches parsing errors. The code may contain a syntax error, or use syntax \
                  the parser cannot process.",
    default_enabled: true,
};

/// Reports parser problems except those matching an allowed message
pub struct ParseErrorCheck {
    allowed: Vec<String>,
}

impl ParseErrorCheck {
    pub fn new(allowed: Vec<String>) -> Self {
        Self { allowed }
    }

    fn is_allowed(&self, message: &str) -> bool {
        self.allowed.iter().any(|allowed| message.contains(allowed.as_str()))
    }
}

impl Default for ParseErrorCheck {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_PARSE_MESSAGES.iter().map(|m| (*m).to_string()).collect())
    }
}

impl Check for ParseErrorCheck {
    fn rule(&self) -> &'static RuleInfo {
        &RULE
    }

    fn check_report(&mut self, ctx: &mut CheckContext<'_>, reporter: &ProblemReporter) {
        for problem in reporter.problems() {
            if problem.line > 0 && !self.is_allowed(&problem.message) {
                ctx.create_issue(RULE.key, problem.line, Some(&problem.message));
            }
        }
    }
}
