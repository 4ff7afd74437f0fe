//! Errors raised while loading rule data.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid metaphor data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("metaphor catalog rejected: {0}")]
    InvalidCatalog(String),

    #[error("configuration rejected: {0}")]
    InvalidConfig(String),

    #[error("unknown subsystem label '{0}'")]
    UnknownSubsystem(String),
}
