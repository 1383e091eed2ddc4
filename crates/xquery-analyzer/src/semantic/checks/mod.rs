//! XQuery rule checks.
//!
//! Each rule lives in its own module next to the helpers several rules share.

mod dynamic_function;
mod effective_boolean;
mod function_mapping;
mod log_check;
mod operations_in_predicate;
mod order_by_range;
mod parse_error;
pub mod path;
pub mod predicate;
pub mod prohibit_function;
mod strong_typing_flwor;
mod strong_typing_function;
mod strong_typing_module_variables;
mod xpath_descendant_steps;
mod xpath_sub_expressions;
mod xpath_text_steps;
mod xquery_version;

pub use dynamic_function::DynamicFunctionCheck;
pub use effective_boolean::EffectiveBooleanCheck;
pub use function_mapping::FunctionMappingCheck;
pub use log_check::LogCheck;
pub use operations_in_predicate::OperationsInPredicateCheck;
pub use order_by_range::OrderByRangeCheck;
pub use parse_error::ParseErrorCheck;
pub use strong_typing_flwor::StrongTypingInFlworCheck;
pub use strong_typing_function::StrongTypingInFunctionDeclarationCheck;
pub use strong_typing_module_variables::StrongTypingInModuleVariablesCheck;
pub use xpath_descendant_steps::XPathDescendantStepsCheck;
pub use xpath_sub_expressions::XPathSubExpressionsInPredicateCheck;
pub use xpath_text_steps::XPathTextStepsCheck;
pub use xquery_version::XQueryVersionCheck;

use crate::config::LintConfig;
use crate::error::ConfigError;
use crate::semantic::{Check, RuleInfo};

/// Builds a fresh check instance for one unit
pub type CheckFactory = fn(&LintConfig) -> Box<dyn Check>;

#[derive(Clone, Copy)]
pub struct RegisteredRule {
    pub info: &'static RuleInfo,
    factory: CheckFactory,
}

impl RegisteredRule {
    pub fn instantiate(&self, config: &LintConfig) -> Box<dyn Check> {
        (self.factory)(config)
    }
}

/// Catalogue of every known rule, in reporting order.
pub struct CheckRegistry {
    rules: Vec<RegisteredRule>,
}

impl Default for CheckRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckRegistry {
    /// Create a registry with all standard rules
    pub fn new() -> Self {
        let mut registry = Self { rules: Vec::new() };

        registry.register(&dynamic_function::RULE, |_| Box::new(DynamicFunctionCheck));
        registry.register(&effective_boolean::RULE, |_| Box::new(EffectiveBooleanCheck));
        registry.register(&function_mapping::RULE, |_| Box::<FunctionMappingCheck>::default());
        registry.register(&operations_in_predicate::RULE, |_| {
            Box::<OperationsInPredicateCheck>::default()
        });
        registry.register(&order_by_range::RULE, |_| Box::new(OrderByRangeCheck));
        registry.register(&parse_error::RULE, |config| {
            Box::new(ParseErrorCheck::new(config.parse_error.allowed_messages.clone()))
        });
        registry.register(&strong_typing_flwor::RULE, |_| Box::new(StrongTypingInFlworCheck));
        registry.register(&strong_typing_function::RULE, |_| {
            Box::new(StrongTypingInFunctionDeclarationCheck)
        });
        registry.register(&strong_typing_module_variables::RULE, |_| {
            Box::new(StrongTypingInModuleVariablesCheck)
        });
        registry.register(&xpath_descendant_steps::RULE, |_| Box::new(XPathDescendantStepsCheck));
        registry.register(&xpath_sub_expressions::RULE, |_| {
            Box::<XPathSubExpressionsInPredicateCheck>::default()
        });
        registry.register(&xpath_text_steps::RULE, |_| Box::new(XPathTextStepsCheck));
        registry.register(&xquery_version::RULE, |_| Box::<XQueryVersionCheck>::default());
        // Opt-in
        registry.register(&log_check::RULE, |_| Box::new(LogCheck::new()));

        registry
    }

    /// Register a rule, replacing any rule with the same key
    pub fn register(&mut self, info: &'static RuleInfo, factory: CheckFactory) {
        let rule = RegisteredRule { info, factory };
        match self.rules.iter_mut().find(|r| r.info.key == info.key) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
    }

    pub fn rules(&self) -> impl Iterator<Item = &'static RuleInfo> + '_ {
        self.rules.iter().map(|r| r.info)
    }

    pub fn rule(&self, key: &str) -> Option<&'static RuleInfo> {
        self.rules.iter().map(|r| r.info).find(|info| info.key == key)
    }

    /// Rules active under `config`, in catalogue order
    pub fn active(&self, config: &LintConfig) -> Result<Vec<RegisteredRule>, ConfigError> {
        for key in config.rules.disable.iter().chain(&config.rules.enable) {
            if self.rule(key).is_none() {
                return Err(ConfigError::UnknownRule(key.clone()));
            }
        }

        let enabled = |key: &str, default: bool| {
            if config.rules.disable.iter().any(|k| k == key) {
                false
            } else {
                default || config.rules.enable.iter().any(|k| k == key)
            }
        };

        Ok(self
            .rules
            .iter()
            .filter(|r| enabled(r.info.key, r.info.default_enabled))
            .copied()
            .collect())
    }

    /// Instantiate a fresh list of active checks
    pub fn build(&self, config: &LintConfig) -> Result<Vec<Box<dyn Check>>, ConfigError> {
        Ok(self
            .active(config)?
            .iter()
            .map(|rule| rule.instantiate(config))
            .collect())
    }
}
