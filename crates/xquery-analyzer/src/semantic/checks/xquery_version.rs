use xquery_syntax::{field, kind, SyntaxNode};

use crate::issues::Priority;
use crate::node_ext::NodeExt;
use crate::semantic::{Check, CheckContext, RuleInfo};

pub static RULE: RuleInfo = RuleInfo {
    key: "XQueryVersion",
    name: "XQuery Version",
    priority: Priority::Major,
    description: "Declare the XQuery version of every module, and avoid the deprecated \
                  0.9-ml dialect.",
    default_enabled: true,
};

const DEPRECATED_VERSION: &str = "0.9-ml";

#[derive(Debug, Default)]
pub struct XQueryVersionCheck {
    has_version: bool,
    line: u32,
}

impl Check for XQueryVersionCheck {
    fn rule(&self) -> &'static RuleInfo {
        &RULE
    }

    fn enter_expression(&mut self, ctx: &mut CheckContext<'_>, node: &SyntaxNode) {
        match node.kind.as_str() {
            kind::MODULE_TRANSACTION => {
                self.has_version = false;
                self.line = node.line;
            }
            kind::VERSION_DECL => {
                self.has_version = true;
                if let Some(version) = node.unquoted_field(field::VERSION) {
                    if version == DEPRECATED_VERSION {
                        let message = format!("Avoid the deprecated XQuery version {version}");
                        ctx.create_issue(RULE.key, node.line, Some(&message));
                    }
                }
            }
            _ => {}
        }
    }

    fn exit_expression(&mut self, ctx: &mut CheckContext<'_>, node: &SyntaxNode) {
        if node.is(kind::MODULE_TRANSACTION) && !self.has_version {
            ctx.create_issue(RULE.key, self.line, Some("Declare the XQuery version"));
        }
    }
}
