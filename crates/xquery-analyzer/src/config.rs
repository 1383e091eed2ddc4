use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Allowed parse-error substring enabled when no configuration overrides it
pub const DEFAULT_ALLOWED_PARSE_MESSAGES: &[&str] = &["no viable alternative at character 'D'"];

/// Lint configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LintConfig {
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub parse_error: ParseErrorConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesConfig {
    /// Default rules to turn off
    #[serde(default)]
    pub disable: Vec<String>,
    /// Opt-in rules to turn on
    #[serde(default)]
    pub enable: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParseErrorConfig {
    #[serde(default = "default_allowed_messages")]
    pub allowed_messages: Vec<String>,
}

impl Default for ParseErrorConfig {
    fn default() -> Self {
        Self {
            allowed_messages: default_allowed_messages(),
        }
    }
}

fn default_allowed_messages() -> Vec<String> {
    DEFAULT_ALLOWED_PARSE_MESSAGES.iter().map(|m| (*m).to_string()).collect()
}

impl LintConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_from_str(&content)
    }

    pub fn load_from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}
