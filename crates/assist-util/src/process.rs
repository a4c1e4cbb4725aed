//! Probing external tools.

use std::process::Command;

use crate::error::UtilError;

/// Run `command` and return the first line of its stdout, or `None` when it
/// exits unsuccessfully.
///
/// # Errors
/// Returns `UtilError::Spawn` if the program cannot be started.
pub fn first_stdout_line(command: &mut Command) -> Result<Option<String>, UtilError> {
    let output = command.output().map_err(|source| UtilError::Spawn {
        program: command.get_program().to_string_lossy().into_owned(),
        source,
    })?;
    if !output.status.success() {
        return Ok(None);
    }
    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|line| line.trim().to_owned()))
}

/// `<program> --version`, first line. `None` if the program is missing or fails.
pub fn probe_version(program: &str) -> Option<String> {
    match first_stdout_line(Command::new(program).arg("--version")) {
        Ok(line) => line,
        Err(e) => {
            tracing::debug!("{e}");
            None
        }
    }
}
