//! Maven repositories and their credentials.

use assist_config::key::keys;
use assist_config::manifest::RepositoryDecl;
use assist_config::{ConfigKey, Resolver};

use crate::error::EngineError;
use crate::secret::Secret;

/// Sonatype OSSRH staging endpoint.
pub const SONATYPE_STAGING_URL: &str =
    "https://s01.oss.sonatype.org/service/local/staging/deploy/maven2/";

/// GitHub Packages Maven host; the owner and repository follow as path segments.
pub const GITHUB_PACKAGES_URL: &str = "https://maven.pkg.github.com";

/// A remote repository with the keys its credentials are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub name: String,
    pub url: String,
    pub username: ConfigKey,
    pub password: ConfigKey,
}

/// Credentials resolved for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryCredentials {
    pub username: String,
    pub password: Secret,
}

impl Repository {
    pub fn sonatype_staging() -> Self {
        Self {
            name: "SonatypeStaging".to_owned(),
            url: SONATYPE_STAGING_URL.to_owned(),
            username: keys::OSSRH_USERNAME.key(),
            password: keys::OSSRH_PASSWORD.key(),
        }
    }

    pub fn github_packages(owner: &str, repository: &str) -> Self {
        Self {
            name: "GitHubPackages".to_owned(),
            url: format!("{GITHUB_PACKAGES_URL}/{owner}/{repository}"),
            username: keys::GPR_USER.key(),
            password: keys::GPR_KEY.key(),
        }
    }

    pub fn from_decl(decl: &RepositoryDecl) -> Self {
        match decl {
            RepositoryDecl::SonatypeStaging => Self::sonatype_staging(),
            RepositoryDecl::GitHubPackages { owner, repository } => {
                Self::github_packages(owner, repository)
            }
            RepositoryDecl::Custom {
                name,
                url,
                username,
                password,
            } => Self {
                name: name.clone(),
                url: url.clone(),
                username: username.clone(),
                password: password.clone(),
            },
        }
    }

    /// Resolve both username and password.
    ///
    /// # Errors
    /// Returns the missing-configuration error of the first absent value.
    pub fn credentials(&self, resolver: &Resolver<'_>) -> Result<RepositoryCredentials, EngineError> {
        let username = resolver.require(&self.username)?;
        let password = resolver.require(&self.password)?;
        Ok(RepositoryCredentials {
            username,
            password: Secret::new(password),
        })
    }
}
