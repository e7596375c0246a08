use crate::error::identity::acquire_lock::AcquireLockError;
use crate::error::identity::activate_profile::ActivateProfileError;
use crate::error::identity::catalog::CatalogError;
use crate::error::identity::generate_key_pair::GenerateKeyPairError;
use crate::error::identity::git_identity::ReadGitIdentityError;
use crate::error::identity::invalid_input::InvalidInputError;
use thiserror::Error;

pub mod acquire_lock;
pub mod activate_profile;
pub mod catalog;
pub mod generate_key_pair;
pub mod git_identity;
pub mod invalid_input;

/// Every failure the identity service reports to its callers.
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Invalid input")]
    InvalidInput(#[from] InvalidInputError),

    #[error("Profile '{0}' already exists.")]
    DuplicateProfile(String),

    /// Also reported for a profile whose directory exists but whose contents are
    /// malformed; the malformation is the source.
    #[error("Profile '{0}' does not exist.")]
    ProfileNotFound(String, #[source] Option<Box<IdentityError>>),

    #[error("The identity file of profile '{0}' is corrupt")]
    CorruptIdentityFile(String, #[source] ReadGitIdentityError),

    #[error("Cannot remove profile '{0}' because it is the active profile. Switch to another profile first.")]
    CannotRemoveActiveProfile(String),

    #[error("Failed to generate a key pair for profile '{0}'")]
    KeyGenerationFailed(String, #[source] GenerateKeyPairError),

    #[error("Failed to activate profile '{0}'")]
    ActivationFailed(String, #[source] ActivateProfileError),

    #[error("Failed to access the profile catalog")]
    CatalogAccessFailed(#[from] CatalogError),

    #[error("Failed to recover from an interrupted profile switch")]
    RecoverActivationFailed(#[source] ActivateProfileError),

    #[error("Failed to acquire the profile lock")]
    AcquireLockFailed(#[from] AcquireLockError),
}
