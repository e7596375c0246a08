use crate::error::fs::{
    CopyFileError, EnsureParentDirExistsError, FsError, RemoveFileError, RenameError,
};
use crate::error::process::ProcessError;
use crate::error::structured_file::StructuredFileError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ActivateProfileError {
    #[error("Failed to prepare the directory of {0}")]
    EnsureCanonicalDirFailed(PathBuf, #[source] EnsureParentDirExistsError),

    #[error("Failed to stage a replacement for {0}")]
    StageFileFailed(PathBuf, #[source] std::io::Error),

    #[error("Failed to stage a replacement for {0}")]
    StageKeyFailed(PathBuf, #[source] FsError),

    #[error("Failed to back up {0}")]
    BackupCanonicalFileFailed(PathBuf, #[source] CopyFileError),

    #[error("Failed to record the backups of the installation")]
    WriteJournalFailed(#[source] StructuredFileError),

    #[error("Failed to read the record of an interrupted installation")]
    ReadJournalFailed(#[source] StructuredFileError),

    #[error("Failed to restore the previous installation")]
    RestoreBackupFailed(#[source] RenameError),

    #[error("Failed to remove a partially installed file")]
    RemoveInstalledFileFailed(#[source] RemoveFileError),

    #[error("Failed to remove leftover file {0}")]
    RemoveLeftoverFailed(PathBuf, #[source] std::io::Error),

    #[error("Failed to install {0}")]
    InstallCanonicalFileFailed(PathBuf, #[source] std::io::Error),

    #[error("Failed to apply the git author settings")]
    ApplyGitConfigFailed(#[source] ProcessError),

    #[error("Failed to record the active profile")]
    WriteActivePointerFailed(#[source] StructuredFileError),
}
