use xquery_syntax::{field, kind, SyntaxNode};

use crate::issues::Priority;
use crate::node_ext::NodeExt;
use crate::semantic::{Check, CheckContext, RuleInfo};

pub static RULE: RuleInfo = RuleInfo {
    key: "StrongTypingInModuleVariables",
    name: "Use Strong Typing when Declaring Module Variable",
    priority: Priority::Critical,
    description: "Declare the type of every module variable.",
    default_enabled: true,
};

pub struct StrongTypingInModuleVariablesCheck;

impl Check for StrongTypingInModuleVariablesCheck {
    fn rule(&self) -> &'static RuleInfo {
        &RULE
    }

    fn enter_expression(&mut self, ctx: &mut CheckContext<'_>, node: &SyntaxNode) {
        if node.is(kind::VAR_DECL) && !node.has_field(field::TYPE) {
            let name = node.name_text().unwrap_or_default();
            let message = format!("Declare the type of module variable ${name}");
            ctx.create_issue(RULE.key, node.line, Some(&message));
        }
    }
}
