use xquery_syntax::SyntaxNode;

use crate::semantic::{CheckContext, RuleInfo};

/// Raise `rule` at every immediate child of `expr` whose text is `expression`.
///
/// The issue goes on the child's own line, which differs from the container's
/// line in multi-line path expressions.
pub fn create_violations(
    ctx: &mut CheckContext<'_>,
    rule: &RuleInfo,
    expr: &SyntaxNode,
    expression: &str,
    message: &str,
) {
    for child in &expr.children {
        if child.text() == expression {
            ctx.create_issue(rule.key, child.line(), Some(message));
        }
    }
}
