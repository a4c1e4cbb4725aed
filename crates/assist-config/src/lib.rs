//! Configuration snapshot, layered value resolution, and `assist.toml`.

pub mod credentials_file;
pub mod error;
pub mod key;
pub mod manifest;
pub mod properties;
pub mod resolve;
pub mod snapshot;

pub use error::ConfigError;
pub use key::{ConfigKey, KeySpec, Source, SourceChain};
pub use manifest::Manifest;
pub use resolve::{ResolvedValue, Resolver};
pub use snapshot::{ConfigSnapshot, SnapshotBuilder};
