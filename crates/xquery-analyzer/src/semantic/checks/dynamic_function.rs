use xquery_syntax::{kind, SyntaxNode};

use crate::issues::Priority;
use crate::node_ext::NodeExt;
use crate::semantic::{Check, CheckContext, RuleInfo};

pub static RULE: RuleInfo = RuleInfo {
    key: "DynamicFunction",
    name: "Dynamic Function Usage (MarkLogic)",
    priority: Priority::Major,
    description: "Avoid xdmp:eval() and xdmp:value() where possible. Use xdmp:invoke(), \
                  xdmp:unpath() or function values to evaluate code dynamically.",
    default_enabled: true,
};

const FUNCTIONS: [&str; 2] = ["xdmp:eval", "xdmp:value"];

pub struct DynamicFunctionCheck;

impl Check for DynamicFunctionCheck {
    fn rule(&self) -> &'static RuleInfo {
        &RULE
    }

    fn enter_expression(&mut self, ctx: &mut CheckContext<'_>, node: &SyntaxNode) {
        if !node.is(kind::FUNCTION_CALL) {
            return;
        }
        if let Some(name) = node.function_name() {
            if FUNCTIONS.contains(&name.as_str()) {
                let message = format!("Avoid dynamic evaluation with {name}()");
                ctx.create_issue(RULE.key, node.line, Some(&message));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::checks::test_support::{analyze, lines};

    #[test]
    fn test_eval_and_value_are_reported() {
        let issues = analyze(
            Box::new(DynamicFunctionCheck),
            r#"
(module (mainModule (queryBody
  (functionCall@2 (functionName "xdmp:eval") (argumentList "(" (stringLiteral "'1 + 1'") ")"))
  (functionCall@3 (functionName "xdmp:value") (argumentList "(" (stringLiteral "'2'") ")"))
  (functionCall@4 (functionName "xdmp:invoke") (argumentList "(" ")")))))
"#,
        );
        assert_eq!(lines(&issues), vec![2, 3]);
        assert_eq!(issues[0].message, "Avoid dynamic evaluation with xdmp:eval()");
    }

    #[test]
    fn test_same_local_name_in_other_prefix_is_valid() {
        let issues = analyze(
            Box::new(DynamicFunctionCheck),
            r#"(module (mainModule (queryBody (functionCall (functionName "my:eval")))))"#,
        );
        assert!(issues.is_empty());
    }
}
