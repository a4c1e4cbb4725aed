//! Layered lookup of a setting across its source chain.

use crate::error::ConfigError;
use crate::key::{ConfigKey, Source};
use crate::snapshot::ConfigSnapshot;

/// Result of evaluating a key's source chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedValue {
    /// A source held a value.
    Present { value: String, source: Source },
    /// No source held a value; `diagnostic` names every key checked.
    Absent { diagnostic: String },
}

impl ResolvedValue {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present { .. })
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Present { value, .. } => Some(value),
            Self::Absent { .. } => None,
        }
    }

    pub fn source(&self) -> Option<Source> {
        match self {
            Self::Present { source, .. } => Some(*source),
            Self::Absent { .. } => None,
        }
    }

    /// Resolve or fail.
    ///
    /// # Errors
    /// Returns `ConfigError::Missing` carrying the diagnostic when absent.
    pub fn require(self) -> Result<String, ConfigError> {
        match self {
            Self::Present { value, .. } => Ok(value),
            Self::Absent { diagnostic } => Err(ConfigError::Missing {
                message: diagnostic,
            }),
        }
    }

    /// Resolve or fall back to `default`.
    pub fn or_default(self, default: &str) -> String {
        self.optional().unwrap_or_else(|| default.to_owned())
    }

    pub fn optional(self) -> Option<String> {
        match self {
            Self::Present { value, .. } => Some(value),
            Self::Absent { .. } => None,
        }
    }
}

/// Resolves keys against one snapshot. Holds no state of its own, so repeated
/// resolution of the same key always yields the same result.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    snapshot: &'a ConfigSnapshot,
}

impl<'a> Resolver<'a> {
    pub fn new(snapshot: &'a ConfigSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &'a ConfigSnapshot {
        self.snapshot
    }

    /// Walk the key's chain and return the first present value.
    pub fn resolve(&self, key: &ConfigKey) -> ResolvedValue {
        for &source in key.chain().sources() {
            if let Some(value) = self.snapshot.get(source, key.name_in(source)) {
                tracing::trace!(key = %key, %source, "resolved");
                return ResolvedValue::Present {
                    value: value.to_owned(),
                    source,
                };
            }
        }
        tracing::trace!(key = %key, "not set in any source");
        ResolvedValue::Absent {
            diagnostic: key.missing_message(),
        }
    }

    /// Resolve or fail with the key's diagnostic.
    ///
    /// # Errors
    /// Returns `ConfigError::Missing` when no source holds a value.
    pub fn require(&self, key: &ConfigKey) -> Result<String, ConfigError> {
        self.resolve(key).require()
    }

    /// Resolve or use `default`.
    pub fn resolve_or(&self, key: &ConfigKey, default: &str) -> String {
        self.resolve(key).or_default(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::keys;

    fn key(property: &str, environment: &str) -> ConfigKey {
        ConfigKey::new(property, environment).unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn build_property_beats_system_and_environment() {
        let snapshot = ConfigSnapshot::builder()
            .property("signing.password", "from-build")
            .system_property("signing.password", "from-system")
            .environment([("GPG_SIGNING_PASSWORD", "from-env")])
            .build();
        let resolved = Resolver::new(&snapshot).resolve(&keys::SIGNING_PASSWORD.key());
        assert_eq!(
            resolved,
            ResolvedValue::Present {
                value: "from-build".to_owned(),
                source: Source::BuildProperty,
            }
        );
    }

    #[test]
    fn system_property_beats_environment() {
        let snapshot = ConfigSnapshot::builder()
            .system_property("signing.password", "from-system")
            .environment([("GPG_SIGNING_PASSWORD", "from-env")])
            .build();
        let resolved = Resolver::new(&snapshot).resolve(&keys::SIGNING_PASSWORD.key());
        assert_eq!(resolved.value(), Some("from-system"));
        assert_eq!(resolved.source(), Some(Source::SystemProperty));
    }

    #[test]
    fn environment_used_last() {
        let snapshot = ConfigSnapshot::builder()
            .environment([("GPG_SIGNING_PASSWORD", "from-env")])
            .build();
        let resolved = Resolver::new(&snapshot).resolve(&keys::SIGNING_PASSWORD.key());
        assert_eq!(resolved.value(), Some("from-env"));
        assert_eq!(resolved.source(), Some(Source::Environment));
    }

    #[test]
    fn environment_is_looked_up_by_environment_key_only() {
        let snapshot = ConfigSnapshot::builder()
            .environment([("signing.password", "wrong-name")])
            .build();
        let resolved = Resolver::new(&snapshot).resolve(&keys::SIGNING_PASSWORD.key());
        assert!(!resolved.is_present());
    }

    #[test]
    fn empty_string_counts_as_present() {
        let snapshot = ConfigSnapshot::builder()
            .property("signing.password", "")
            .environment([("GPG_SIGNING_PASSWORD", "from-env")])
            .build();
        let resolved = Resolver::new(&snapshot).resolve(&keys::SIGNING_PASSWORD.key());
        assert_eq!(resolved.value(), Some(""));
    }

    #[test]
    fn require_missing_names_both_keys() {
        let snapshot = ConfigSnapshot::default();
        let err = Resolver::new(&snapshot)
            .require(&key("my.prop", "MY_ENV"))
            .unwrap_err()
            .to_string();
        assert_eq!(
            err,
            "Expected property with key 'my.prop' or environment variable 'MY_ENV' to be set."
        );
    }

    #[test]
    fn resolve_or_uses_default_only_when_absent() {
        let empty = ConfigSnapshot::default();
        let ignore_case = keys::TARGET_FILTER_IGNORE_CASE.key();
        assert_eq!(Resolver::new(&empty).resolve_or(&ignore_case, "true"), "true");

        let set = ConfigSnapshot::builder()
            .environment([("TARGET_FILTER_IGNORE_CASE", "false")])
            .build();
        assert_eq!(Resolver::new(&set).resolve_or(&ignore_case, "true"), "false");
    }

    #[test]
    fn build_only_key_ignores_system_and_environment() {
        let snapshot = ConfigSnapshot::builder()
            .system_property("signing.gnupg.keyName", "sys")
            .environment([("signing.gnupg.keyName", "env")])
            .build();
        let resolved = Resolver::new(&snapshot).resolve(&keys::GPG_KEY_NAME.key());
        assert!(!resolved.is_present());
    }

    #[test]
    fn resolution_is_repeatable() {
        let snapshot = ConfigSnapshot::builder()
            .environment([("TARGET_FILTER_EXCLUDE", "(Jvm)")])
            .build();
        let resolver = Resolver::new(&snapshot);
        let key = keys::TARGET_FILTER_EXCLUDE.key();
        assert_eq!(resolver.resolve(&key), resolver.resolve(&key));
    }
}
