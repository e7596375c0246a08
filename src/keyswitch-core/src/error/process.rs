use std::ffi::OsString;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Cannot find '{0:?}' on the PATH")]
    ProgramNotFound(OsString, #[source] which::Error),

    #[error("Execution of '{0:?}' failed")]
    ExecutionFailed(OsString, #[source] std::io::Error),

    #[error("'{program:?}' exited with {status}: {stderr}")]
    CommandFailed {
        program: OsString,
        status: ExitStatus,
        stderr: String,
    },
}
