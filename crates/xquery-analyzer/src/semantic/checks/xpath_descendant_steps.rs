use xquery_syntax::{kind, SyntaxNode};

use crate::issues::Priority;
use crate::semantic::checks::path::create_violations;
use crate::semantic::{Check, CheckContext, RuleInfo};

pub static RULE: RuleInfo = RuleInfo {
    key: "XpathDescendantSteps",
    name: "Avoid Using '//' in XPath",
    priority: Priority::Minor,
    description: "Descendant steps traverse the whole subtree. Use explicit child steps \
                  where the structure is known.",
    default_enabled: true,
};

const DESCENDANT: &str = "//";

pub struct XPathDescendantStepsCheck;

impl Check for XPathDescendantStepsCheck {
    fn rule(&self) -> &'static RuleInfo {
        &RULE
    }

    fn enter_expression(&mut self, ctx: &mut CheckContext<'_>, node: &SyntaxNode) {
        if node.is(kind::RELATIVE_PATH_EXPR) {
            create_violations(ctx, &RULE, node, DESCENDANT, "Avoid descendant steps ('//') in XPath");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::checks::test_support::{analyze, lines};

    #[test]
    fn test_each_descendant_step_is_reported() {
        let issues = analyze(
            Box::new(XPathDescendantStepsCheck),
            r#"
(module (mainModule (queryBody
  (relativePathExpr@1 (stepExpr (varRef "$" (qName "doc")))
    "//"@2 (stepExpr "book")
    "/" (stepExpr "chapter")
    "//"@4 (stepExpr "title")))))
"#,
        );
        assert_eq!(lines(&issues), vec![2, 4]);
    }

    #[test]
    fn test_child_steps_are_valid() {
        let issues = analyze(
            Box::new(XPathDescendantStepsCheck),
            r#"(module (mainModule (queryBody (relativePathExpr (stepExpr "a") "/" (stepExpr "b")))))"#,
        );
        assert!(issues.is_empty());
    }
}
