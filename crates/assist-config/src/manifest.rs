//! The `assist.toml` project manifest: project coordinates, publication
//! targets, and the remote repositories to publish to.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use assist_targets::PUBLICATION_SUFFIX;

use crate::error::ConfigError;
use crate::key::ConfigKey;

/// Properties file read when the manifest does not name one.
pub const DEFAULT_PROPERTIES_FILE: &str = "gradle.properties";

/// Repository name reserved for the local Maven repository.
pub const MAVEN_LOCAL: &str = "MavenLocal";

/// The validated `assist.toml` project manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub project: Project,
    pub repositories: Vec<RepositoryDecl>,
    /// Directory containing the manifest; relative paths resolve against it.
    pub root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub group: String,
    pub name: String,
    pub version: String,
    /// Publication targets, e.g. `["KotlinMultiplatform", "Jvm", "LinuxX64"]`.
    pub targets: Vec<String>,
    #[serde(default)]
    pub properties_file: Option<String>,
    #[serde(default)]
    pub credentials_file: Option<String>,
}

/// Built-in repository definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    SonatypeStaging,
    GithubPackages,
}

/// A remote repository the project publishes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryDecl {
    SonatypeStaging,
    GitHubPackages {
        owner: String,
        repository: String,
    },
    Custom {
        name: String,
        url: String,
        username: ConfigKey,
        password: ConfigKey,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    project: Project,
    #[serde(default, rename = "repository")]
    repositories: Vec<RawRepository>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRepository {
    preset: Option<Preset>,
    name: Option<String>,
    url: Option<String>,
    owner: Option<String>,
    repository: Option<String>,
    username_property: Option<String>,
    username_environment: Option<String>,
    password_property: Option<String>,
    password_environment: Option<String>,
}

impl Manifest {
    /// Read, parse, and validate an `assist.toml`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// violates a manifest rule.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = assist_util::fs::read_file(path)?;
        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self::parse(&content, path, root)
    }

    /// Parse manifest text. `origin` is only used in error messages.
    ///
    /// # Errors
    /// Returns an error if the text is not valid TOML or violates a manifest rule.
    pub fn parse(content: &str, origin: &Path, root: PathBuf) -> Result<Self, ConfigError> {
        let raw: RawManifest = toml::from_str(content).map_err(|e| ConfigError::ManifestParse {
            path: origin.display().to_string(),
            source: e,
        })?;
        let invalid = |reason: String| ConfigError::InvalidManifest {
            path: origin.display().to_string(),
            reason,
        };

        validate_project(&raw.project).map_err(invalid)?;

        let mut repositories = Vec::with_capacity(raw.repositories.len());
        let mut names = BTreeSet::new();
        for (index, spec) in raw.repositories.into_iter().enumerate() {
            let decl = repository_decl(spec)
                .map_err(|reason| invalid(format!("repository #{}: {reason}", index.saturating_add(1))))?;
            let name = decl.name().to_owned();
            if name == MAVEN_LOCAL {
                return Err(invalid(format!("repository name `{MAVEN_LOCAL}` is reserved")));
            }
            if !names.insert(name.clone()) {
                return Err(invalid(format!("duplicate repository `{name}`")));
            }
            repositories.push(decl);
        }

        Ok(Self {
            project: raw.project,
            repositories,
            root,
        })
    }

    /// Path of the properties file to read (may not exist).
    pub fn properties_path(&self) -> PathBuf {
        self.root.join(
            self.project
                .properties_file
                .as_deref()
                .unwrap_or(DEFAULT_PROPERTIES_FILE),
        )
    }

    /// Path of the credentials file, if the manifest names one.
    pub fn credentials_path(&self) -> Option<PathBuf> {
        self.project
            .credentials_file
            .as_deref()
            .map(|file| self.root.join(file))
    }
}

impl RepositoryDecl {
    /// Name used in publish action names (`...To{name}Repository`).
    pub fn name(&self) -> &str {
        match self {
            Self::SonatypeStaging => "SonatypeStaging",
            Self::GitHubPackages { .. } => "GitHubPackages",
            Self::Custom { name, .. } => name,
        }
    }
}

fn is_identifier(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric())
}

fn validate_project(project: &Project) -> Result<(), String> {
    for (field, value) in [
        ("group", &project.group),
        ("name", &project.name),
        ("version", &project.version),
    ] {
        if value.trim().is_empty() {
            return Err(format!("project.{field} is empty"));
        }
    }

    if project.targets.is_empty() {
        return Err("project.targets is empty, list at least one publication target".to_owned());
    }
    let mut seen = BTreeSet::new();
    for target in &project.targets {
        if !is_identifier(target) {
            return Err(format!(
                "target `{target}` must be non-empty and contain only ASCII letters and digits"
            ));
        }
        // Action names are cut at the first occurrence, so the target
        // itself must not contain it.
        if target.contains(PUBLICATION_SUFFIX) {
            return Err(format!(
                "target `{target}` must not contain `{PUBLICATION_SUFFIX}`"
            ));
        }
        // Artifact ids use the lowercased target.
        if !seen.insert(target.to_ascii_lowercase()) {
            return Err(format!("duplicate target `{target}`"));
        }
    }
    Ok(())
}

fn repository_decl(spec: RawRepository) -> Result<RepositoryDecl, String> {
    let custom_fields = [
        ("name", spec.name.is_some()),
        ("url", spec.url.is_some()),
        ("username_property", spec.username_property.is_some()),
        ("username_environment", spec.username_environment.is_some()),
        ("password_property", spec.password_property.is_some()),
        ("password_environment", spec.password_environment.is_some()),
    ];

    match spec.preset {
        Some(preset) => {
            if let Some((field, _)) = custom_fields.iter().find(|(_, set)| *set) {
                return Err(format!("`{field}` cannot be combined with a preset"));
            }
            match preset {
                Preset::SonatypeStaging => {
                    if spec.owner.is_some() || spec.repository.is_some() {
                        return Err(
                            "sonatype-staging takes no `owner` or `repository`".to_owned()
                        );
                    }
                    Ok(RepositoryDecl::SonatypeStaging)
                }
                Preset::GithubPackages => {
                    let (Some(owner), Some(repository)) = (spec.owner, spec.repository) else {
                        return Err("github-packages requires `owner` and `repository`".to_owned());
                    };
                    if owner.is_empty() || repository.is_empty() {
                        return Err("github-packages `owner` and `repository` must not be empty".to_owned());
                    }
                    Ok(RepositoryDecl::GitHubPackages { owner, repository })
                }
            }
        }
        None => {
            if spec.owner.is_some() || spec.repository.is_some() {
                return Err("`owner` and `repository` require preset = \"github-packages\"".to_owned());
            }
            let missing = custom_fields
                .iter()
                .filter(|(_, set)| !*set)
                .map(|(field, _)| format!("`{field}`"))
                .collect::<Vec<_>>();
            if !missing.is_empty() {
                return Err(format!(
                    "set a `preset` or all custom fields (missing {})",
                    missing.join(", ")
                ));
            }
            let (
                Some(name),
                Some(url),
                Some(username_property),
                Some(username_environment),
                Some(password_property),
                Some(password_environment),
            ) = (
                spec.name,
                spec.url,
                spec.username_property,
                spec.username_environment,
                spec.password_property,
                spec.password_environment,
            )
            else {
                return Err("incomplete custom repository".to_owned());
            };
            if !is_identifier(&name) {
                return Err(format!(
                    "repository name `{name}` must contain only ASCII letters and digits"
                ));
            }
            let username = ConfigKey::new(&username_property, &username_environment)
                .map_err(|e| e.to_string())?;
            let password = ConfigKey::new(&password_property, &password_environment)
                .map_err(|e| e.to_string())?;
            Ok(RepositoryDecl::Custom {
                name,
                url,
                username,
                password,
            })
        }
    }
}
