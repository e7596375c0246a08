use crate::config::directories::Locations;
use crate::error::config::ConfigError;
use crate::json::load_json_file;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_KEY_BITS: u32 = 4096;
pub const MINIMUM_KEY_BITS: u32 = 2048;

/// User-tunable behavior, read from `settings.json` in the config directory.
/// Every field is optional in the file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RSA modulus size for newly generated keys.
    pub key_bits: u32,

    /// The key generation program, resolved against the PATH.
    pub ssh_keygen: PathBuf,

    /// The git program used to set global user.name and user.email.
    pub git: PathBuf,

    /// Whether activation also runs `git config --global`.
    pub apply_global_git_config: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            key_bits: DEFAULT_KEY_BITS,
            ssh_keygen: PathBuf::from("ssh-keygen"),
            git: PathBuf::from("git"),
            apply_global_git_config: true,
        }
    }
}

impl Settings {
    /// Loads the settings file, or the defaults if there is none.
    pub fn load(locations: &Locations) -> Result<Self, ConfigError> {
        let path = locations.settings_path();
        let settings = if path.exists() {
            load_json_file(&path).map_err(ConfigError::LoadSettingsFailed)?
        } else {
            Settings::default()
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.key_bits < MINIMUM_KEY_BITS {
            return Err(ConfigError::KeyTooSmall {
                minimum: MINIMUM_KEY_BITS,
                actual: self.key_bits,
            });
        }
        Ok(())
    }
}
