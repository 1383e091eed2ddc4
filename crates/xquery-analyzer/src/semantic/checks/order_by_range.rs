use xquery_syntax::{kind, SyntaxNode};

use crate::issues::Priority;
use crate::semantic::{Check, CheckContext, RuleInfo};

pub static RULE: RuleInfo = RuleInfo {
    key: "OrderByRange",
    name: "Range Evaluation in Order By Clause",
    priority: Priority::Info,
    description: "Order by clauses should use range indexes where possible. Make sure the \
                  ordered expression is backed by a range index.",
    default_enabled: true,
};

pub struct OrderByRangeCheck;

impl Check for OrderByRangeCheck {
    fn rule(&self) -> &'static RuleInfo {
        &RULE
    }

    fn enter_expression(&mut self, ctx: &mut CheckContext<'_>, node: &SyntaxNode) {
        if node.is(kind::ORDER_SPEC) {
            ctx.create_issue(RULE.key, node.line, Some("Make sure the order by expression uses a range index"));
        }
    }
}
