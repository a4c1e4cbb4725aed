//! Error types for assist-config.

use crate::properties::PropertiesError;

/// Errors produced while loading or resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required setting was not found in any source.
    #[error("{message}")]
    Missing { message: String },

    /// A config key was constructed with an empty name.
    #[error("invalid config key: {reason}")]
    InvalidKey { reason: String },

    /// A properties file has a syntax error.
    #[error("invalid properties file {path}: {source}")]
    Properties {
        path: String,
        source: PropertiesError,
    },

    /// A `-P`/`-D` style assignment is not `key=value`.
    #[error("invalid {flag} assignment \"{value}\": expected key=value")]
    InvalidAssignment { flag: String, value: String },

    /// The manifest is not valid TOML or has unknown fields.
    #[error("invalid assist.toml at {path}: {source}")]
    ManifestParse {
        path: String,
        source: toml::de::Error,
    },

    /// The manifest parsed but violates a rule.
    #[error("invalid assist.toml at {path}: {reason}")]
    InvalidManifest { path: String, reason: String },

    /// A filesystem operation failed.
    #[error("{0}")]
    Util(#[from] assist_util::error::UtilError),
}
