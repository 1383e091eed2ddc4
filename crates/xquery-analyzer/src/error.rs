use std::path::PathBuf;

use thiserror::Error;

/// Fatal configuration problems, raised before any unit is analyzed
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid resolver mode '{0}': must be either 'global' or 'local'")]
    InvalidMode(String),

    #[error("unknown rule '{0}'")]
    UnknownRule(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),
}
