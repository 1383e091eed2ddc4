use xquery_syntax::{kind, SyntaxNode};

use crate::issues::Priority;
use crate::node_ext::NodeExt;
use crate::semantic::checks::predicate::PredicateDepth;
use crate::semantic::{Check, CheckContext, RuleInfo};

pub static RULE: RuleInfo = RuleInfo {
    key: "OperationsInPredicate",
    name: "Avoid Operations in Predicates",
    priority: Priority::Major,
    description: "Arithmetic and function calls inside a predicate are evaluated for every \
                  candidate node. Compute the value once and bind it to a variable.",
    default_enabled: true,
};

/// Functions cheap enough to call inside a predicate
const ALLOWED_FUNCTIONS: [&str; 15] = [
    "data",
    "last",
    "not",
    "exists",
    "xs:integer",
    "string",
    "xs:decimal",
    "xs:double",
    "xs:float",
    "xs:date",
    "xs:dateTime",
    "xs:time",
    "xs:dayTimeDuration",
    "xs:yearMonthDuration",
    "xs:duration",
];

#[derive(Debug, Default)]
pub struct OperationsInPredicateCheck {
    depth: PredicateDepth,
}

impl Check for OperationsInPredicateCheck {
    fn rule(&self) -> &'static RuleInfo {
        &RULE
    }

    fn enter_source(&mut self, _ctx: &mut CheckContext<'_>, _root: &SyntaxNode) {
        self.depth.reset();
    }

    fn enter_expression(&mut self, ctx: &mut CheckContext<'_>, node: &SyntaxNode) {
        match node.kind.as_str() {
            kind::PREDICATE => self.depth.enter(),
            kind::ADD | kind::MULT if self.depth.in_predicate() => {
                ctx.create_issue(RULE.key, node.line, Some("Avoid arithmetic operations in predicates"));
            }
            kind::FUNCTION_CALL if self.depth.in_predicate() => {
                let name = node.function_name().unwrap_or_default();
                if !ALLOWED_FUNCTIONS.iter().any(|allowed| name.ends_with(allowed)) {
                    let message = format!("Avoid calling {name}() in predicates");
                    ctx.create_issue(RULE.key, node.line, Some(&message));
                }
            }
            _ => {}
        }
    }

    fn exit_expression(&mut self, _ctx: &mut CheckContext<'_>, node: &SyntaxNode) {
        if node.is(kind::PREDICATE) {
            self.depth.exit();
        }
    }
}
