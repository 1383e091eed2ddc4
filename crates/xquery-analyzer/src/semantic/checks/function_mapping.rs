use xquery_syntax::{field, kind, SyntaxNode};

use crate::issues::Priority;
use crate::node_ext::NodeExt;
use crate::semantic::{Check, CheckContext, RuleInfo};

pub static RULE: RuleInfo = RuleInfo {
    key: "FunctionMapping",
    name: "Function Mapping Usage (MarkLogic)",
    priority: Priority::Major,
    description: "Make sure function mapping is used intentionally. Disable it with \
                  'declare option xdmp:mapping \"false\";' or declare it explicitly with \
                  'declare option xdmp:mapping \"true\";'.",
    default_enabled: true,
};

const MESSAGE: &str = "Declare the xdmp:mapping option when using the 1.0-ml dialect";

/// Flags are per module transaction so multi-transaction units are handled
#[derive(Debug, Default)]
pub struct FunctionMappingCheck {
    capable: bool,
    used: bool,
    line: u32,
}

impl Check for FunctionMappingCheck {
    fn rule(&self) -> &'static RuleInfo {
        &RULE
    }

    fn enter_expression(&mut self, _ctx: &mut CheckContext<'_>, node: &SyntaxNode) {
        match node.kind.as_str() {
            kind::MODULE_TRANSACTION => {
                self.capable = false;
                self.used = false;
                self.line = node.line;
            }
            kind::VERSION_DECL => {
                if node.unquoted_field(field::VERSION).as_deref() == Some("1.0-ml") {
                    self.capable = true;
                }
            }
            kind::OPTION_DECL => {
                if node.name_text().as_deref() == Some("xdmp:mapping") {
                    self.used = true;
                }
            }
            _ => {}
        }
    }

    fn exit_expression(&mut self, ctx: &mut CheckContext<'_>, node: &SyntaxNode) {
        if node.is(kind::MODULE_TRANSACTION) && self.capable && !self.used {
            ctx.create_issue(RULE.key, self.line, Some(MESSAGE));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::checks::test_support::{analyze, lines};

    fn transaction(line: u32, version: &str, option: bool) -> String {
        let option = if option {
            r#"(optionDecl "declare" "option" name=(qName "xdmp:mapping") (stringLiteral "'false'") ";")"#
        } else {
            ""
        };
        format!(
            r#"(moduleTransaction@{line}
                 (versionDecl "xquery" "version" version=(stringLiteral "'{version}'") ";")
                 (mainModule (prolog {option}) (queryBody "1")))"#
        )
    }

    #[test]
    fn test_ml_dialect_without_option_is_reported() {
        let source = format!("(module {})", transaction(2, "1.0-ml", false));
        let issues = analyze(Box::<FunctionMappingCheck>::default(), &source);
        assert_eq!(lines(&issues), vec![2]);
        assert_eq!(issues[0].message, MESSAGE);
    }

    #[test]
    fn test_option_declared_is_valid() {
        let source = format!("(module {})", transaction(1, "1.0-ml", true));
        let issues = analyze(Box::<FunctionMappingCheck>::default(), &source);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_standard_dialect_is_valid() {
        let source = format!("(module {})", transaction(1, "1.0", false));
        let issues = analyze(Box::<FunctionMappingCheck>::default(), &source);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_flags_reset_per_transaction() {
        let source = format!(
            "(module {} {})",
            transaction(1, "1.0-ml", true),
            transaction(5, "1.0-ml", false)
        );
        let issues = analyze(Box::<FunctionMappingCheck>::default(), &source);
        assert_eq!(lines(&issues), vec![5]);
    }
}
