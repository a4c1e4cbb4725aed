//! Everything one invocation decides before registering actions.

use std::path::Path;

use assist_config::credentials_file::CredentialsFile;
use assist_config::properties::Properties;
use assist_config::{ConfigSnapshot, Manifest, Resolver, SnapshotBuilder};
use assist_targets::{FilterRule, TargetName};
use assist_util::maven::MavenCoordinate;

use crate::credentials::Repository;
use crate::error::EngineError;
use crate::filter::filter_rule;
use crate::relation::RelationConfig;
use crate::signing::{signing_state, SigningState};

/// Target whose artifact id is the bare project name.
pub const ROOT_TARGET: &str = "KotlinMultiplatform";

/// Explicit `-P` and `-D` assignments from the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub properties: Vec<(String, String)>,
    pub system_properties: Vec<(String, String)>,
}

impl Overrides {
    /// Add the assignments to `builder`; later ones win.
    pub fn apply(&self, mut builder: SnapshotBuilder) -> SnapshotBuilder {
        for (key, value) in &self.properties {
            builder = builder.property(key, value);
        }
        for (key, value) in &self.system_properties {
            builder = builder.system_property(key, value);
        }
        builder
    }
}

/// Immutable inputs shared by registration and execution.
#[derive(Debug, Clone)]
pub struct BuildContext {
    manifest: Manifest,
    snapshot: ConfigSnapshot,
    filter: FilterRule,
    relations: RelationConfig,
    signing: SigningState,
    repositories: Vec<Repository>,
}

impl BuildContext {
    /// Evaluate the filter rule, relation flags and signing mode once.
    ///
    /// # Errors
    /// Returns an error for an invalid filter pattern, `ignoreCase` value or
    /// relation flag.
    pub fn new(manifest: Manifest, snapshot: ConfigSnapshot) -> Result<Self, EngineError> {
        let resolver = Resolver::new(&snapshot);
        let filter = filter_rule(&resolver)?;
        let relations = RelationConfig::from_resolver(&resolver)?;
        let signing = signing_state(&resolver);
        let repositories = manifest
            .repositories
            .iter()
            .map(Repository::from_decl)
            .collect();
        Ok(Self {
            manifest,
            snapshot,
            filter,
            relations,
            signing,
            repositories,
        })
    }

    /// Read the manifest and build its configuration snapshot.
    ///
    /// # Errors
    /// Returns an error if any file cannot be read or parsed, or if the
    /// resulting configuration is invalid.
    pub fn load(manifest_path: &Path, overrides: &Overrides) -> Result<Self, EngineError> {
        let manifest = Manifest::from_path(manifest_path)?;
        let snapshot = load_snapshot(&manifest, overrides)?;
        Self::new(manifest, snapshot)
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn snapshot(&self) -> &ConfigSnapshot {
        &self.snapshot
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.snapshot)
    }

    pub fn filter(&self) -> &FilterRule {
        &self.filter
    }

    pub fn relations(&self) -> RelationConfig {
        self.relations
    }

    pub fn signing(&self) -> &SigningState {
        &self.signing
    }

    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    pub fn repository(&self, name: &str) -> Option<&Repository> {
        self.repositories.iter().find(|repo| repo.name == name)
    }

    pub fn targets(&self) -> Vec<TargetName> {
        self.manifest
            .project
            .targets
            .iter()
            .map(|target| TargetName::new(target))
            .collect()
    }

    /// Coordinate published for `target`: `KotlinMultiplatform` uses the
    /// project name as artifact id, any other target `<name>-<target>` in
    /// lower case.
    pub fn coordinate(&self, target: &TargetName) -> MavenCoordinate {
        let project = &self.manifest.project;
        let artifact_id = if target.as_str() == ROOT_TARGET {
            project.name.clone()
        } else {
            format!("{}-{}", project.name, target.as_str().to_ascii_lowercase())
        };
        MavenCoordinate::new(&project.group, &artifact_id, &project.version)
    }
}

/// Snapshot from the manifest's properties and credentials files, the
/// process environment, and `overrides`.
///
/// # Errors
/// Returns an error if a file exists but cannot be read or parsed.
pub fn load_snapshot(
    manifest: &Manifest,
    overrides: &Overrides,
) -> Result<ConfigSnapshot, EngineError> {
    let mut builder = ConfigSnapshot::builder();
    let properties_path = manifest.properties_path();
    if let Some(properties) = Properties::from_path_if_exists(&properties_path)? {
        tracing::debug!(
            path = %properties_path.display(),
            entries = properties.len(),
            "loaded properties file"
        );
        builder = builder.properties_file(properties);
    }
    if let Some(path) = manifest.credentials_path() {
        if let Some(credentials) = CredentialsFile::load(&path)? {
            tracing::debug!(path = %path.display(), "loaded credentials file");
            builder = builder.credentials_file(credentials);
        }
    }
    Ok(overrides.apply(builder.process_environment()).build())
}
