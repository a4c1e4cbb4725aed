//! Error types for assist-engine.

/// Errors produced by engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Loading or resolving configuration failed.
    #[error("{0}")]
    Config(#[from] assist_config::ConfigError),

    /// A filter rule could not be built.
    #[error("{0}")]
    Target(#[from] assist_targets::TargetError),

    /// A utility operation failed.
    #[error("{0}")]
    Util(#[from] assist_util::error::UtilError),

    /// A relation flag holds a value outside the known set.
    #[error("invalid value \"{value}\" for {key}, expected one of: {valid}")]
    UnknownRelation {
        key: String,
        value: String,
        valid: String,
    },

    /// A requested action does not exist in the plan.
    #[error("no action named `{name}`, available actions: {available}")]
    UnknownAction { name: String, available: String },

    /// Two actions were registered under the same name.
    #[error("action `{name}` is already registered")]
    DuplicateAction { name: String },

    /// Ordering relations form a cycle.
    #[error("action relations form a cycle: {cycle}")]
    RelationCycle { cycle: String },
}
