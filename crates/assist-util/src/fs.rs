//! File reading for manifests and properties files.

use std::io::ErrorKind;
use std::path::Path;

use crate::error::UtilError;

fn read_error(path: &Path, source: std::io::Error) -> UtilError {
    UtilError::Read {
        path: path.display().to_string(),
        source,
    }
}

/// Read a UTF-8 file.
///
/// # Errors
/// Returns `UtilError::Read` naming the path.
pub fn read_file(path: &Path) -> Result<String, UtilError> {
    std::fs::read_to_string(path).map_err(|e| read_error(path, e))
}

/// Read an optional UTF-8 file; `Ok(None)` when it does not exist.
///
/// # Errors
/// Returns `UtilError::Read` if the file exists but cannot be read.
pub fn read_file_if_present(path: &Path) -> Result<Option<String>, UtilError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(read_error(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn missing_required_file_names_path() {
        let tmp = dir();
        let path = tmp.path().join("assist.toml");
        let err = read_file(&path).unwrap_err().to_string();
        assert!(err.starts_with("cannot read "), "error was: {err}");
        assert!(err.contains("assist.toml"), "error was: {err}");
    }

    #[test]
    fn optional_file_absent_and_present() {
        let tmp = dir();
        let path = tmp.path().join("local.properties");
        assert!(read_file_if_present(&path)
            .unwrap_or_else(|e| panic!("{e}"))
            .is_none());

        std::fs::write(&path, "ossrhUsername=me\n").unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(
            read_file_if_present(&path)
                .unwrap_or_else(|e| panic!("{e}"))
                .as_deref(),
            Some("ossrhUsername=me\n")
        );
    }

    #[test]
    fn optional_path_that_is_a_directory_is_an_error() {
        let tmp = dir();
        assert!(read_file_if_present(tmp.path()).is_err());
    }
}
