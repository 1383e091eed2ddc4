use xquery_syntax::{kind, SyntaxNode};

use crate::issues::Priority;
use crate::semantic::{Check, CheckContext, RuleInfo};

pub static RULE: RuleInfo = RuleInfo {
    key: "XPathTextSteps",
    name: "Avoid XPath Text Steps",
    priority: Priority::Minor,
    description: "Selecting text() nodes is fragile with mixed content. Use the string value \
                  of the element instead.",
    default_enabled: true,
};

const TEXT_STEP: [&str; 3] = [kind::NODE_TEST, kind::KIND_TEST, kind::TEXT_TEST];

pub struct XPathTextStepsCheck;

impl Check for XPathTextStepsCheck {
    fn rule(&self) -> &'static RuleInfo {
        &RULE
    }

    fn enter_expression(&mut self, ctx: &mut CheckContext<'_>, node: &SyntaxNode) {
        if !node.is(kind::STEP_EXPR) {
            return;
        }
        if let Some(text) = node.find_path(&TEXT_STEP) {
            ctx.create_issue(RULE.key, text.line, Some("Avoid text() steps, use the string value instead"));
        }
    }
}
