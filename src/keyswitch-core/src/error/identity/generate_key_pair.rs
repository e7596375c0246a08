use crate::error::fs::SetPermissionsError;
use crate::error::process::ProcessError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateKeyPairError {
    #[error("Key size of {actual} bits is below the minimum of {minimum} bits")]
    KeyTooSmall { minimum: u32, actual: u32 },

    #[error("Cannot find the key generation tool")]
    LocateToolFailed(#[source] ProcessError),

    #[error("The key generation tool failed")]
    RunToolFailed(#[source] ProcessError),

    #[error("The key generation tool did not produce {0}")]
    MissingKeyFile(PathBuf),

    #[error("Failed to restrict key file permissions")]
    SetKeyPermissionsFailed(#[source] SetPermissionsError),
}
