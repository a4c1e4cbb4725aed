//! Where a publication lands in a Maven repository.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::UtilError;

/// `group:artifact:version` of one publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MavenCoordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl MavenCoordinate {
    pub fn new(group_id: &str, artifact_id: &str, version: &str) -> Self {
        Self {
            group_id: group_id.to_owned(),
            artifact_id: artifact_id.to_owned(),
            version: version.to_owned(),
        }
    }

    /// Repository-relative directory, e.g. `io/example/demo-jvm/0.1.0`.
    pub fn directory(&self) -> String {
        let group = self.group_id.split('.').collect::<Vec<_>>().join("/");
        format!("{group}/{}/{}", self.artifact_id, self.version)
    }

    /// Directory URL inside a remote repository.
    pub fn url_in(&self, repository_url: &str) -> String {
        format!("{}/{}", repository_url.trim_end_matches('/'), self.directory())
    }

    /// Directory inside a local repository root.
    pub fn path_in(&self, root: &Path) -> PathBuf {
        self.directory().split('/').fold(root.to_path_buf(), |path, part| path.join(part))
    }
}

impl fmt::Display for MavenCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// `~/.m2/repository`.
///
/// # Errors
/// Returns `UtilError::NoHomeDirectory` if neither `HOME` nor `USERPROFILE`
/// is set.
pub fn maven_local_repository() -> Result<PathBuf, UtilError> {
    ["HOME", "USERPROFILE"]
        .into_iter()
        .find_map(|var| std::env::var_os(var).filter(|v| !v.is_empty()))
        .map(|home| PathBuf::from(home).join(".m2").join("repository"))
        .ok_or(UtilError::NoHomeDirectory)
}
