use crate::error::foundation::FoundationError;
use crate::error::structured_file::StructuredFileError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine home directory")]
    DetermineHomeDirectoryFailed(#[source] FoundationError),

    #[error("Failed to determine configuration directory")]
    DetermineConfigDirectoryFailed(#[source] FoundationError),

    #[error("Failed to load settings")]
    LoadSettingsFailed(#[source] StructuredFileError),

    #[error("Invalid settings: key_bits must be at least {minimum}, got {actual}")]
    KeyTooSmall { minimum: u32, actual: u32 },
}
