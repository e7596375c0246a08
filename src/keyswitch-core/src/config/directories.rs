use crate::error::config::ConfigError;
use crate::error::config::ConfigError::{
    DetermineConfigDirectoryFailed, DetermineHomeDirectoryFailed,
};
use crate::error::foundation::FoundationError;
use crate::error::foundation::FoundationError::NoHomeInEnvironment;
use crate::foundation::get_user_home;

use directories_next::ProjectDirs;
use std::path::{Path, PathBuf};

/// Overrides the directory holding `.ssh` and `.gitconfig`.
pub const HOME_ENV_VAR: &str = "KEYSWITCH_HOME";
/// Overrides the directory holding the active pointer, lock and settings.
pub const CONFIG_ROOT_ENV_VAR: &str = "KEYSWITCH_CONFIG_ROOT";

pub const PROFILES_DIR_NAME: &str = "profiles";
pub const PRIVATE_KEY_FILE: &str = "id_rsa";
pub const PUBLIC_KEY_FILE: &str = "id_rsa.pub";
pub const GITCONFIG_FILE: &str = ".gitconfig";
pub const ACTIVE_POINTER_FILE: &str = "active.json";
pub const LOCK_FILE: &str = "keyswitch.lock";
pub const SETTINGS_FILE: &str = "settings.json";
pub const ACTIVATION_JOURNAL_FILE: &str = "activation-journal.json";

pub fn project_dirs() -> Result<&'static ProjectDirs, FoundationError> {
    lazy_static::lazy_static! {
        static ref DIRS: Option<ProjectDirs> = ProjectDirs::from("dev", "keyswitch", "keyswitch");
    }
    DIRS.as_ref().ok_or(NoHomeInEnvironment())
}

pub fn get_user_keyswitch_config_dir() -> Result<PathBuf, ConfigError> {
    if let Some(root) = std::env::var_os(CONFIG_ROOT_ENV_VAR) {
        return Ok(PathBuf::from(root));
    }
    let dirs = project_dirs().map_err(DetermineConfigDirectoryFailed)?;
    Ok(dirs.config_dir().to_path_buf())
}

pub fn get_effective_home() -> Result<PathBuf, ConfigError> {
    if let Some(home) = std::env::var_os(HOME_ENV_VAR) {
        return Ok(PathBuf::from(home));
    }
    get_user_home()
        .map(PathBuf::from)
        .map_err(DetermineHomeDirectoryFailed)
}

/// Every path the core reads or writes.
#[derive(Clone, Debug)]
pub struct Locations {
    pub profiles_root: PathBuf,
    pub canonical_private_key: PathBuf,
    pub canonical_public_key: PathBuf,
    pub canonical_gitconfig: PathBuf,
    pub config_dir: PathBuf,
}

impl Locations {
    pub fn from_environment() -> Result<Self, ConfigError> {
        Ok(Self::under_home(
            &get_effective_home()?,
            get_user_keyswitch_config_dir()?,
        ))
    }

    /// The layout SSH and git expect: keys in `<home>/.ssh`, git identity in
    /// `<home>/.gitconfig`, profiles in `<home>/.ssh/profiles`.
    pub fn under_home(home: &Path, config_dir: PathBuf) -> Self {
        let ssh_dir = home.join(".ssh");
        Self {
            profiles_root: ssh_dir.join(PROFILES_DIR_NAME),
            canonical_private_key: ssh_dir.join(PRIVATE_KEY_FILE),
            canonical_public_key: ssh_dir.join(PUBLIC_KEY_FILE),
            canonical_gitconfig: home.join(GITCONFIG_FILE),
            config_dir,
        }
    }

    pub fn active_pointer_path(&self) -> PathBuf {
        self.config_dir.join(ACTIVE_POINTER_FILE)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.config_dir.join(LOCK_FILE)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }

    /// Present only while a profile switch is replacing canonical files.
    pub fn activation_journal_path(&self) -> PathBuf {
        self.config_dir.join(ACTIVATION_JOURNAL_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_under_home() {
        let locations = Locations::under_home(Path::new("/h"), PathBuf::from("/c"));

        assert_eq!(locations.profiles_root, Path::new("/h/.ssh/profiles"));
        assert_eq!(locations.canonical_private_key, Path::new("/h/.ssh/id_rsa"));
        assert_eq!(locations.canonical_public_key, Path::new("/h/.ssh/id_rsa.pub"));
        assert_eq!(locations.canonical_gitconfig, Path::new("/h/.gitconfig"));
        assert_eq!(locations.active_pointer_path(), Path::new("/c/active.json"));
        assert_eq!(locations.lock_path(), Path::new("/c/keyswitch.lock"));
    }
}
