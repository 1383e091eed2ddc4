use xquery_syntax::{field, kind, SyntaxNode};

use crate::issues::Priority;
use crate::node_ext::NodeExt;
use crate::semantic::{Check, CheckContext, RuleInfo};

pub static RULE: RuleInfo = RuleInfo {
    key: "StrongTypingInFLWOR",
    name: "Use Strong Typing in FLWOR Expressions",
    priority: Priority::Minor,
    description: "Declare the type of for and let variables to help the optimizer and to \
                  catch type errors early.",
    default_enabled: true,
};

pub struct StrongTypingInFlworCheck;

impl Check for StrongTypingInFlworCheck {
    fn rule(&self) -> &'static RuleInfo {
        &RULE
    }

    fn enter_expression(&mut self, ctx: &mut CheckContext<'_>, node: &SyntaxNode) {
        if !(node.is(kind::FOR_VAR) || node.is(kind::LET_VAR)) || node.has_field(field::TYPE) {
            return;
        }
        let name = node.name_text().unwrap_or_default();
        let message = format!("Declare the type of ${name}");
        ctx.create_issue(RULE.key, node.line, Some(&message));
    }
}
