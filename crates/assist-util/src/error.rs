//! Error types for assist-util.

#[derive(Debug, thiserror::Error)]
pub enum UtilError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("cannot run `{program}`: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// Neither `HOME` nor `USERPROFILE` is set.
    #[error("cannot locate the local Maven repository: set HOME (or USERPROFILE on Windows)")]
    NoHomeDirectory,
}
