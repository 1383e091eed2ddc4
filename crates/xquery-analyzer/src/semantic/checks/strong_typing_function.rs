use xquery_syntax::{field, kind, SyntaxNode};

use crate::issues::Priority;
use crate::node_ext::NodeExt;
use crate::semantic::{Check, CheckContext, RuleInfo};

pub static RULE: RuleInfo = RuleInfo {
    key: "StrongTypingInFunctionDeclaration",
    name: "Use Strong Typing in Function Declarations",
    priority: Priority::Critical,
    description: "Declare the type of every function parameter and the return type of every \
                  function.",
    default_enabled: true,
};

pub struct StrongTypingInFunctionDeclarationCheck;

impl Check for StrongTypingInFunctionDeclarationCheck {
    fn rule(&self) -> &'static RuleInfo {
        &RULE
    }

    fn enter_expression(&mut self, ctx: &mut CheckContext<'_>, node: &SyntaxNode) {
        if !node.is(kind::FUNCTION_DECL) {
            return;
        }
        let function = node.function_name().unwrap_or_default();

        for param in node.params() {
            if !param.has_field(field::TYPE) {
                let name = param.name_text().unwrap_or_default();
                let message = format!("Declare the type of parameter ${name} of {function}()");
                ctx.create_issue(RULE.key, param.line, Some(&message));
            }
        }
        if !node.has_field(field::TYPE) {
            let message = format!("Declare the return type of {function}()");
            ctx.create_issue(RULE.key, node.line, Some(&message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::checks::test_support::{analyze, lines};

    #[test]
    fn test_params_on_declaration_line_merge() {
        let issues = analyze(
            Box::new(StrongTypingInFunctionDeclarationCheck),
            r#"
(module (mainModule
  (functionDecl@1 "declare" "function" name=(qName "local:f")
    (paramList "(" (param "$" name=(qName "a")) "," (param "$" name=(qName "b")) ")")
    "as" type=(sequenceType (itemType "xs:integer"))
    (functionBody "{" "}"))
  (queryBody "1")))
"#,
        );
        assert_eq!(lines(&issues), vec![1]);
        assert_eq!(issues[0].message, "Declare the type of parameter $a of local:f()");
    }

    #[test]
    fn test_params_on_separate_lines() {
        let issues = analyze(
            Box::new(StrongTypingInFunctionDeclarationCheck),
            r#"
(module (mainModule
  (functionDecl@1 "declare" "function" name=(qName "local:f")
    (paramList "("
      (param@2 "$" name=(qName "a") type=(sequenceType "as" (itemType "xs:string")))
      ","
      (param@3 "$" name=(qName "b"))
      ")")
    (functionBody@4 "{" "}"))
  (queryBody "1")))
"#,
        );
        assert_eq!(lines(&issues), vec![3, 1]);
        assert_eq!(issues[1].message, "Declare the return type of local:f()");
    }

    #[test]
    fn test_fully_typed_function_is_valid() {
        let issues = analyze(
            Box::new(StrongTypingInFunctionDeclarationCheck),
            r#"
(module (mainModule
  (functionDecl "declare" "function" name=(qName "local:f")
    (paramList "(" (param "$" name=(qName "a") type=(sequenceType "as" (itemType "xs:int"))) ")")
    "as" type=(sequenceType (itemType "xs:int"))
    (functionBody "{" (varRef "$" (qName "a")) "}"))
  (queryBody "1")))
"#,
        );
        assert!(issues.is_empty());
    }
}
