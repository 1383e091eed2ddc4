use xquery_syntax::{kind, SyntaxNode};

use crate::issues::Priority;
use crate::semantic::checks::predicate::PredicateDepth;
use crate::semantic::{Check, CheckContext, RuleInfo};

pub static RULE: RuleInfo = RuleInfo {
    key: "XPathSubExpressionsInPredicate",
    name: "Avoid XPath Sub-Expressions in Predicates",
    priority: Priority::Minor,
    description: "Path expressions and nested predicates inside a predicate are evaluated for \
                  every candidate node. Bind them to a variable first.",
    default_enabled: true,
};

#[derive(Debug, Default)]
pub struct XPathSubExpressionsInPredicateCheck {
    depth: PredicateDepth,
}

impl Check for XPathSubExpressionsInPredicateCheck {
    fn rule(&self) -> &'static RuleInfo {
        &RULE
    }

    fn enter_source(&mut self, _ctx: &mut CheckContext<'_>, _root: &SyntaxNode) {
        self.depth.reset();
    }

    fn enter_expression(&mut self, ctx: &mut CheckContext<'_>, node: &SyntaxNode) {
        if node.is(kind::PREDICATE) {
            if self.depth.in_predicate() {
                ctx.create_issue(RULE.key, node.line, Some("Avoid nested predicates"));
            }
            self.depth.enter();
        } else if self.depth.in_predicate()
            && node.is(kind::RELATIVE_PATH_EXPR)
            && node.tokens().next().is_some()
        {
            ctx.create_issue(RULE.key, node.line, Some("Avoid XPath sub-expressions in predicates"));
        }
    }

    fn exit_expression(&mut self, _ctx: &mut CheckContext<'_>, node: &SyntaxNode) {
        if node.is(kind::PREDICATE) {
            self.depth.exit();
        }
    }
}
