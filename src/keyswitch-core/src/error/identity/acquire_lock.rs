use crate::error::fs::EnsureDirExistsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AcquireLockError {
    #[error("Failed to create the lock directory")]
    EnsureLockDirFailed(#[source] EnsureDirExistsError),

    #[error("Failed to open lock file {0}")]
    OpenLockFileFailed(PathBuf, #[source] std::io::Error),

    #[error("Failed to lock {0}")]
    LockFailed(PathBuf, #[source] std::io::Error),
}
