use xquery_syntax::{field, kind, SyntaxElement, SyntaxNode};

use crate::declaration::local_name;
use crate::issues::Priority;
use crate::node_ext::NodeExt;
use crate::resolver::SymbolTable;
use crate::semantic::{Check, CheckContext, RuleInfo};

pub static RULE: RuleInfo = RuleInfo {
    key: "EffectiveBoolean",
    name: "Effective Boolean in Conditional Predicate",
    priority: Priority::Minor,
    description: "Use an explicit boolean expression in if conditions instead of relying on \
                  the effective boolean value of a sequence.",
    default_enabled: true,
};

const MESSAGE: &str = "The if condition is not a boolean expression, make the test explicit";

const BOOLEAN_TYPE: &str = "xs:boolean";

/// Function names whose result is boolean
const BOOLEAN_FUNCTIONS: [&str; 10] = [
    "exists",
    "empty",
    "contains",
    "starts-with",
    "ends-with",
    "boolean",
    "not",
    "true",
    "false",
    "matches",
];

/// Expression kinds that always produce a boolean
const BOOLEAN_EXPRESSIONS: [&str; 4] = [kind::COMPARISON, kind::CASTABLE, kind::TREAT, kind::INSTANCE_OF];

pub struct EffectiveBooleanCheck;

/// Whether the condition can be shown to be boolean, and the line to blame if not
fn evaluate(symbols: &SymbolTable, condition: &SyntaxNode) -> (bool, u32) {
    let mut valid = false;
    let mut failure_line = condition.line;

    let path = condition.find(kind::RELATIVE_PATH_EXPR);

    // A function call must be the only step of the path
    if let Some(path) = path.filter(|p| p.children_by_kind(kind::STEP_EXPR).count() == 1) {
        if let Some(name) = path.find(kind::FUNCTION_CALL).and_then(|call| call.function_name()) {
            let declared_boolean = symbols
                .function_declaration(local_name(&name), symbols.resolve_prefix_namespace(&name))
                .is_some_and(|function| function.has_type(BOOLEAN_TYPE));
            if declared_boolean || BOOLEAN_FUNCTIONS.iter().any(|f| name.ends_with(f)) {
                valid = true;
            }
        }
    }

    if BOOLEAN_EXPRESSIONS.iter().any(|k| condition.exists(k)) {
        valid = true;
    }

    if let Some(var) = path.and_then(|p| p.find(kind::VAR_REF)) {
        failure_line = var.line;
        let name = var
            .child_by_kind(kind::QNAME)
            .map(SyntaxNode::text)
            .or_else(|| var.child_by_field(field::NAME).map(SyntaxElement::text))
            .unwrap_or_else(|| var.text());
        let declared_boolean = symbols
            .variable_declaration(local_name(&name), symbols.resolve_prefix_namespace(&name))
            .is_some_and(|decl| decl.has_type(BOOLEAN_TYPE));
        if declared_boolean {
            valid = true;
        }
    }

    (valid, failure_line)
}

impl Check for EffectiveBooleanCheck {
    fn rule(&self) -> &'static RuleInfo {
        &RULE
    }

    fn enter_expression(&mut self, ctx: &mut CheckContext<'_>, node: &SyntaxNode) {
        if !node.is(kind::IF_EXPR) {
            return;
        }
        let Some(condition) = node.node_by_field(field::CONDITION) else {
            return;
        };
        let (valid, failure_line) = evaluate(ctx.symbols(), condition);
        if !valid {
            ctx.create_issue(RULE.key, failure_line, Some(MESSAGE));
        }
    }
}
