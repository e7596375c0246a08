//! Identity types and modules.
//!
//! An identity is a directory below the profiles root holding an SSH key pair and
//! an `identity.json` describing the git author that goes with it. At most one
//! identity is active; activating it copies its material into the canonical
//! locations SSH and git read.
use crate::error::identity::invalid_input::InvalidInputError;
use crate::error::identity::invalid_input::InvalidInputError::{
    ControlCharacter, EmptyDisplayName, EmptyProfileName, InvalidEmail,
    ProfileNameContainsPathSeparator, ProfileNameHasSurroundingWhitespace, ReservedProfileName,
};
use regex::Regex;
use std::path::PathBuf;
use time::OffsetDateTime;

pub mod activation;
pub mod catalog_lock;
pub mod git_identity;
mod identity_file_locations;
pub mod identity_service;
pub mod keygen;
pub mod notify;
pub mod profile_store;
#[cfg(test)]
pub(crate) mod testing;

pub use activation::{ActivationEngine, GitCli, GitConfigurator, NoGlobalGitConfig};
pub use identity_file_locations::ProfileFileLocations;
pub use identity_service::{ClearSummary, IdentityService};
pub use keygen::{KeyGenerator, KeyPairPaths, SshKeygen};
pub use notify::ProfilesChanged;
pub use profile_store::ProfileStore;

pub const IDENTITY_JSON: &str = "identity.json";
pub const TEMP_IDENTITY_PREFIX: &str = "___temp___";

/// Git author metadata kept with each identity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdentityFields {
    /// Becomes git `user.name`.
    pub display_name: String,

    /// Handle on the hosting provider. Informational only.
    pub username: String,

    /// Becomes git `user.email`.
    pub email: String,

    /// Opaque secret. Stored, never transmitted and never written to git config.
    pub token: Option<String>,
}

impl IdentityFields {
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        if self.display_name.trim().is_empty() {
            return Err(EmptyDisplayName());
        }
        reject_control_characters("display name", &self.display_name)?;
        reject_control_characters("username", &self.username)?;
        if let Some(token) = &self.token {
            reject_control_characters("token", token)?;
        }
        validate_email(&self.email)
    }
}

/// A well-formed identity as found in the catalog.
#[derive(Clone, Debug)]
pub struct Profile {
    pub name: String,
    pub fields: IdentityFields,
    pub created_at: Option<OffsetDateTime>,
    pub private_key_path: PathBuf,
    pub public_key_path: PathBuf,
}

/// Profile names double as directory names, so anything that could escape the
/// profiles root or collide with staging directories is refused.
pub fn validate_profile_name(name: &str) -> Result<(), InvalidInputError> {
    if name.is_empty() {
        return Err(EmptyProfileName());
    }
    if name.chars().any(std::path::is_separator) || name.contains('/') || name.contains('\\') {
        return Err(ProfileNameContainsPathSeparator(name.to_string()));
    }
    if name == "." || name == ".." || name.starts_with(TEMP_IDENTITY_PREFIX) {
        return Err(ReservedProfileName(name.to_string()));
    }
    if name.trim() != name {
        return Err(ProfileNameHasSurroundingWhitespace(name.to_string()));
    }
    reject_control_characters("profile name", name)
}

pub fn validate_email(email: &str) -> Result<(), InvalidInputError> {
    lazy_static::lazy_static! {
        static ref EMAIL: Regex = Regex::new(r"^\S+@\S+\.\S+$").unwrap();
    }
    if EMAIL.is_match(email) {
        Ok(())
    } else {
        Err(InvalidEmail(email.to_string()))
    }
}

fn reject_control_characters(field: &'static str, value: &str) -> Result<(), InvalidInputError> {
    if value.chars().any(char::is_control) {
        Err(ControlCharacter(field))
    } else {
        Ok(())
    }
}
