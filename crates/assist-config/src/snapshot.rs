//! Immutable snapshot of the three lookup stores.
//!
//! Build properties are layered, lowest precedence first: properties file,
//! credentials-file extras, `ORG_GRADLE_PROJECT_<key>` environment variables,
//! explicit `-P` assignments. System properties come from `systemProp.<key>`
//! entries in the properties file, overridden by explicit `-D` assignments.

use std::collections::BTreeMap;
use std::fmt;

use crate::credentials_file::CredentialsFile;
use crate::error::ConfigError;
use crate::key::{keys, Source};
use crate::properties::Properties;

/// Environment variables with this prefix become build properties.
pub const PROJECT_PROPERTY_ENV_PREFIX: &str = "ORG_GRADLE_PROJECT_";

/// Properties-file entries with this prefix become system properties.
pub const SYSTEM_PROPERTY_PREFIX: &str = "systemProp.";

/// The configuration visible to one invocation.
///
/// `Debug` lists key names only, since values routinely hold secrets.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConfigSnapshot {
    build: BTreeMap<String, String>,
    system: BTreeMap<String, String>,
    environment: BTreeMap<String, String>,
}

impl ConfigSnapshot {
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::default()
    }

    /// Look `name` up in a single store.
    pub fn get(&self, source: Source, name: &str) -> Option<&str> {
        let store = match source {
            Source::BuildProperty => &self.build,
            Source::SystemProperty => &self.system,
            Source::Environment => &self.environment,
        };
        store.get(name).map(String::as_str)
    }

    pub fn build_properties(&self) -> &BTreeMap<String, String> {
        &self.build
    }

    pub fn system_properties(&self) -> &BTreeMap<String, String> {
        &self.system
    }

    pub fn environment(&self) -> &BTreeMap<String, String> {
        &self.environment
    }
}

impl fmt::Debug for ConfigSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigSnapshot")
            .field("build", &self.build.keys().collect::<Vec<_>>())
            .field("system", &self.system.keys().collect::<Vec<_>>())
            .field("environment", &self.environment.len())
            .finish()
    }
}

/// Collects the inputs of a [`ConfigSnapshot`].
#[derive(Default)]
pub struct SnapshotBuilder {
    file_properties: BTreeMap<String, String>,
    file_system_properties: BTreeMap<String, String>,
    extra_properties: BTreeMap<String, String>,
    environment: BTreeMap<String, String>,
    cli_properties: BTreeMap<String, String>,
    cli_system_properties: BTreeMap<String, String>,
}

impl SnapshotBuilder {
    /// Add entries of a properties file; `systemProp.*` entries become
    /// system properties.
    pub fn properties_file(mut self, properties: Properties) -> Self {
        for (key, value) in properties.into_entries() {
            match key.strip_prefix(SYSTEM_PROPERTY_PREFIX) {
                Some(name) if !name.is_empty() => {
                    self.file_system_properties.insert(name.to_owned(), value);
                }
                _ => {
                    self.file_properties.insert(key, value);
                }
            }
        }
        self
    }

    /// Add a loaded credentials file: its username and password land under
    /// the Sonatype keys, every other entry as an extra build property.
    pub fn credentials_file(mut self, credentials: CredentialsFile) -> Self {
        if let Some(username) = credentials.username {
            self.extra_properties
                .insert(keys::OSSRH_USERNAME.property.to_owned(), username);
        }
        if let Some(password) = credentials.password {
            self.extra_properties
                .insert(keys::OSSRH_PASSWORD.property.to_owned(), password);
        }
        self.extra_properties.extend(credentials.extras);
        self
    }

    /// Replace the environment store.
    pub fn environment<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.environment = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Use the current process environment. Non-UTF-8 variables are skipped.
    pub fn process_environment(self) -> Self {
        self.environment(
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        )
    }

    /// Explicit build property (`-P key=value`).
    pub fn property(mut self, key: &str, value: &str) -> Self {
        self.cli_properties.insert(key.to_owned(), value.to_owned());
        self
    }

    /// Explicit system property (`-D key=value`).
    pub fn system_property(mut self, key: &str, value: &str) -> Self {
        self.cli_system_properties
            .insert(key.to_owned(), value.to_owned());
        self
    }

    pub fn build(self) -> ConfigSnapshot {
        let mut build = self.file_properties;
        build.extend(self.extra_properties);
        for (name, value) in &self.environment {
            if let Some(property) = name.strip_prefix(PROJECT_PROPERTY_ENV_PREFIX) {
                if !property.is_empty() {
                    build.insert(property.to_owned(), value.clone());
                }
            }
        }
        build.extend(self.cli_properties);

        let mut system = self.file_system_properties;
        system.extend(self.cli_system_properties);

        tracing::debug!(
            build = build.len(),
            system = system.len(),
            environment = self.environment.len(),
            "configuration snapshot built"
        );

        ConfigSnapshot {
            build,
            system,
            environment: self.environment,
        }
    }
}

/// Split a `key=value` command-line assignment.
///
/// # Errors
/// Returns an error if there is no `=` or the key is empty.
pub fn parse_assignment(flag: &str, raw: &str) -> Result<(String, String), ConfigError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_owned(), value.to_owned())),
        _ => Err(ConfigError::InvalidAssignment {
            flag: flag.to_owned(),
            value: raw.to_owned(),
        }),
    }
}
