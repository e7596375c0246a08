use crate::error::fs::{
    EnsureDirExistsError, ReadDirError, ReadToStringError, RemoveDirectoryAndContentsError,
    RenameError,
};
use crate::error::identity::git_identity::WriteGitIdentityError;
use crate::error::structured_file::StructuredFileError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to create the profiles directory")]
    EnsureProfilesRootFailed(#[source] EnsureDirExistsError),

    #[error("Failed to enumerate profiles")]
    ReadProfilesRootFailed(#[source] ReadDirError),

    #[error("Failed to read an entry of {0}")]
    ReadProfileEntryFailed(PathBuf, #[source] std::io::Error),

    #[error("Failed to create staging directory in {0}")]
    CreateStagingDirectoryFailed(PathBuf, #[source] std::io::Error),

    #[error("Failed to write the identity file")]
    WriteIdentityFileFailed(#[source] WriteGitIdentityError),

    #[error("Failed to move the new profile into place")]
    InstallProfileDirectoryFailed(#[source] RenameError),

    #[error("Failed to remove profile directory")]
    RemoveProfileDirectoryFailed(#[source] RemoveDirectoryAndContentsError),

    #[error("Failed to read public key")]
    ReadPublicKeyFailed(#[source] ReadToStringError),

    #[error("Failed to read the active profile")]
    ReadActivePointerFailed(#[source] StructuredFileError),
}
