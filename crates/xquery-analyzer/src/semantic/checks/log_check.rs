use xquery_syntax::{kind, SyntaxNode};

use crate::issues::Priority;
use crate::semantic::checks::prohibit_function::ProhibitedFunction;
use crate::semantic::{Check, CheckContext, RuleInfo};

pub static RULE: RuleInfo = RuleInfo {
    key: "LogCheck",
    name: "Log Function Usage (MarkLogic)",
    priority: Priority::Minor,
    description: "Favor xdmp:trace() over xdmp:log() so logging can be switched on and off \
                  per trace event.",
    default_enabled: false,
};

const LOG: ProhibitedFunction = ProhibitedFunction {
    prefix: Some("xdmp"),
    namespace: None,
    name: "log",
};

pub struct LogCheck {
    prohibited: ProhibitedFunction,
}

impl LogCheck {
    pub fn new() -> Self {
        Self { prohibited: LOG }
    }
}

impl Default for LogCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for LogCheck {
    fn rule(&self) -> &'static RuleInfo {
        &RULE
    }

    fn enter_expression(&mut self, ctx: &mut CheckContext<'_>, node: &SyntaxNode) {
        if node.is(kind::FUNCTION_CALL) && self.prohibited.matches(ctx.symbols(), node) {
            ctx.create_issue(RULE.key, node.line, Some("Use xdmp:trace() instead of xdmp:log()"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::checks::test_support::{analyze, lines};

    #[test]
    fn test_log_calls_are_reported() {
        let issues = analyze(
            Box::new(LogCheck::new()),
            r#"
(module (mainModule (queryBody
  (functionCall@2 (functionName "xdmp:log") (argumentList "(" (stringLiteral "'hi'") ")"))
  (functionCall@3 (functionName "xdmp:trace") (argumentList "(" ")"))
  (functionCall@4 (functionName "log") (argumentList "(" ")"))
  (functionCall@5 (functionName "math:log") (argumentList "(" ")")))))
"#,
        );
        assert_eq!(lines(&issues), vec![2]);
    }

    #[test]
    fn test_prohibited_function_resolves_namespace() {
        let prohibited = ProhibitedFunction {
            prefix: None,
            namespace: Some("http://marklogic.com/xdmp"),
            name: "log",
        };
        let source = r#"
(module (mainModule
  (moduleImport "import" "module" "namespace" prefix="x" "=" uri=(stringLiteral "'http://marklogic.com/xdmp'") ";")
  (queryBody
    (functionCall@2 (functionName "x:log"))
    (functionCall@3 (functionName "y:log")))))
"#;
        let issues = analyze(Box::new(LogCheck { prohibited }), source);
        assert_eq!(lines(&issues), vec![2]);
    }
}
