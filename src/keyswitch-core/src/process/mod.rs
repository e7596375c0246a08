use crate::error::process::ProcessError;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::{Command, Output};

/// Resolves a program name against the PATH. Paths with a directory component are
/// checked as given.
pub fn locate_program(program: &OsStr) -> Result<PathBuf, ProcessError> {
    which::which(program).map_err(|e| ProcessError::ProgramNotFound(program.to_owned(), e))
}

/// Runs the command to completion, capturing its output.
/// A non-zero exit status is an error carrying the command's stderr.
pub fn execute_process(cmd: &mut Command) -> Result<Output, ProcessError> {
    let output = cmd
        .output()
        .map_err(|e| ProcessError::ExecutionFailed(cmd.get_program().to_owned(), e))?;
    if !output.status.success() {
        return Err(ProcessError::CommandFailed {
            program: cmd.get_program().to_owned(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output)
}
