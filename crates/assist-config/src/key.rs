//! Config keys, lookup sources, and the keys publish-assist recognizes.

use std::fmt;

use serde::Serialize;

use crate::error::ConfigError;

/// One place a setting can be looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    /// Build-scoped property (`-P`, properties file, `ORG_GRADLE_PROJECT_*`).
    BuildProperty,
    /// Process-wide system property (`-D`, `systemProp.*`).
    SystemProperty,
    /// Environment variable.
    Environment,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::BuildProperty => "build property",
            Self::SystemProperty => "system property",
            Self::Environment => "environment variable",
        };
        f.write_str(label)
    }
}

/// Ordered lookup sources for a key. The first source holding a value wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceChain(Vec<Source>);

impl SourceChain {
    /// Build property, then system property, then environment variable.
    pub fn canonical() -> Self {
        Self(vec![
            Source::BuildProperty,
            Source::SystemProperty,
            Source::Environment,
        ])
    }

    /// Build property only.
    pub fn build_only() -> Self {
        Self(vec![Source::BuildProperty])
    }

    pub fn sources(&self) -> &[Source] {
        &self.0
    }

    pub fn includes_environment(&self) -> bool {
        self.0.contains(&Source::Environment)
    }
}

/// A logical setting identified by a property-name/environment-name pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigKey {
    property_key: String,
    environment_key: String,
    chain: SourceChain,
}

impl ConfigKey {
    /// Key looked up through the canonical chain.
    ///
    /// # Errors
    /// Returns an error if either key name is empty.
    pub fn new(property_key: &str, environment_key: &str) -> Result<Self, ConfigError> {
        if property_key.is_empty() {
            return Err(ConfigError::InvalidKey {
                reason: "property key is empty".to_owned(),
            });
        }
        if environment_key.is_empty() {
            return Err(ConfigError::InvalidKey {
                reason: format!("environment key for property '{property_key}' is empty"),
            });
        }
        Ok(Self {
            property_key: property_key.to_owned(),
            environment_key: environment_key.to_owned(),
            chain: SourceChain::canonical(),
        })
    }

    /// Key that only exists as a build property.
    ///
    /// # Errors
    /// Returns an error if the key name is empty.
    pub fn build_property(property_key: &str) -> Result<Self, ConfigError> {
        let mut key = Self::new(property_key, property_key)?;
        key.chain = SourceChain::build_only();
        Ok(key)
    }

    pub fn property_key(&self) -> &str {
        &self.property_key
    }

    pub fn environment_key(&self) -> &str {
        &self.environment_key
    }

    pub fn chain(&self) -> &SourceChain {
        &self.chain
    }

    /// Name under which this key is stored in `source`.
    pub fn name_in(&self, source: Source) -> &str {
        match source {
            Source::BuildProperty | Source::SystemProperty => &self.property_key,
            Source::Environment => &self.environment_key,
        }
    }

    /// Diagnostic used when no source holds a value.
    pub fn missing_message(&self) -> String {
        if self.chain.includes_environment() {
            format!(
                "Expected property with key '{}' or environment variable '{}' to be set.",
                self.property_key, self.environment_key
            )
        } else {
            format!(
                "Expected property with key '{}' to be set.",
                self.property_key
            )
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.chain.includes_environment() {
            write!(f, "{} / {}", self.property_key, self.environment_key)
        } else {
            f.write_str(&self.property_key)
        }
    }
}

/// Compile-time description of a well-known key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySpec {
    pub property: &'static str,
    /// `None` for keys that are only read as build properties.
    pub environment: Option<&'static str>,
}

impl KeySpec {
    const fn pair(property: &'static str, environment: &'static str) -> Self {
        Self {
            property,
            environment: Some(environment),
        }
    }

    const fn build_only(property: &'static str) -> Self {
        Self {
            property,
            environment: None,
        }
    }

    pub fn key(&self) -> ConfigKey {
        match self.environment {
            Some(environment) => ConfigKey {
                property_key: self.property.to_owned(),
                environment_key: environment.to_owned(),
                chain: SourceChain::canonical(),
            },
            None => ConfigKey {
                property_key: self.property.to_owned(),
                environment_key: self.property.to_owned(),
                chain: SourceChain::build_only(),
            },
        }
    }
}

/// Keys recognized by publish-assist.
pub mod keys {
    use super::KeySpec;

    pub const TARGET_FILTER_EXCLUDE: KeySpec =
        KeySpec::pair("targetFilter.exclude", "TARGET_FILTER_EXCLUDE");
    pub const TARGET_FILTER_INCLUDE: KeySpec =
        KeySpec::pair("targetFilter.include", "TARGET_FILTER_INCLUDE");
    /// `"true"` or `"false"`, default `"true"`.
    pub const TARGET_FILTER_IGNORE_CASE: KeySpec =
        KeySpec::pair("targetFilter.ignoreCase", "TARGET_FILTER_IGNORE_CASE");

    pub const SIGNING_KEY_ID: KeySpec = KeySpec::pair("signing.keyId", "GPG_SIGNING_KEY_ID");
    pub const SIGNING_SECRET_KEY: KeySpec = KeySpec::pair("GPG_SECRET_KEY", "GPG_SECRET_KEY");
    pub const SIGNING_PASSWORD: KeySpec =
        KeySpec::pair("signing.password", "GPG_SIGNING_PASSWORD");

    pub const GPG_KEY_NAME: KeySpec = KeySpec::build_only("signing.gnupg.keyName");
    pub const GPG_PASSPHRASE: KeySpec = KeySpec::build_only("signing.gnupg.passphrase");

    pub const SIGN_RELATES_CHECK: KeySpec = KeySpec::build_only("signRelatesCheck");
    pub const PUBLISH_RELATES_CHECK: KeySpec = KeySpec::build_only("publishRelatesCheck");

    pub const OSSRH_USERNAME: KeySpec = KeySpec::pair("ossrhUsername", "OSSRH_USERNAME");
    pub const OSSRH_PASSWORD: KeySpec = KeySpec::pair("ossrhPassword", "OSSRH_PASSWORD");
    pub const GPR_USER: KeySpec = KeySpec::pair("gpr.user", "GPR_USERNAME");
    pub const GPR_KEY: KeySpec = KeySpec::pair("gpr.key", "GPR_TOKEN");

    pub const ALL: [KeySpec; 14] = [
        TARGET_FILTER_EXCLUDE,
        TARGET_FILTER_INCLUDE,
        TARGET_FILTER_IGNORE_CASE,
        SIGNING_KEY_ID,
        SIGNING_SECRET_KEY,
        SIGNING_PASSWORD,
        GPG_KEY_NAME,
        GPG_PASSPHRASE,
        SIGN_RELATES_CHECK,
        PUBLISH_RELATES_CHECK,
        OSSRH_USERNAME,
        OSSRH_PASSWORD,
        GPR_USER,
        GPR_KEY,
    ];
}
