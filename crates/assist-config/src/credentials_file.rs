//! Optional local credentials file (`local.properties` style).
//!
//! `ossrhUsername`/`ossrhPassword` are the Sonatype credentials; every other
//! entry is handed on as an extra build property.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ConfigError;
use crate::key::keys;
use crate::properties::Properties;

#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialsFile {
    pub username: Option<String>,
    pub password: Option<String>,
    pub extras: BTreeMap<String, String>,
}

impl CredentialsFile {
    /// Load the credentials file. A missing file is not an error.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        let Some(properties) = Properties::from_path_if_exists(path)? else {
            tracing::debug!(path = %path.display(), "no credentials file");
            return Ok(None);
        };
        Ok(Some(Self::from_properties(properties)))
    }

    pub fn from_properties(properties: Properties) -> Self {
        let mut credentials = Self::default();
        for (key, value) in properties.into_entries() {
            if key == keys::OSSRH_USERNAME.property {
                credentials.username = Some(value);
            } else if key == keys::OSSRH_PASSWORD.property {
                credentials.password = Some(value);
            } else {
                credentials.extras.insert(key, value);
            }
        }
        credentials
    }
}

impl std::fmt::Debug for CredentialsFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsFile")
            .field("username", &self.username.as_ref().map(|_| "<set>"))
            .field("password", &self.password.as_ref().map(|_| "<set>"))
            .field("extras", &self.extras.keys().collect::<Vec<_>>())
            .finish()
    }
}
