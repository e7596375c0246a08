use crate::config::directories::{PRIVATE_KEY_FILE, PUBLIC_KEY_FILE};
use crate::identity::IDENTITY_JSON;
use std::path::{Path, PathBuf};

/// The files making up one identity directory.
#[derive(Clone, Debug)]
pub struct ProfileFileLocations {
    dir: PathBuf,
}

impl ProfileFileLocations {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn private_key(&self) -> PathBuf {
        self.dir.join(PRIVATE_KEY_FILE)
    }

    pub fn public_key(&self) -> PathBuf {
        self.dir.join(PUBLIC_KEY_FILE)
    }

    pub fn identity_json(&self) -> PathBuf {
        self.dir.join(IDENTITY_JSON)
    }

    /// Both halves of the key pair are present.
    pub fn has_key_pair(&self) -> bool {
        self.private_key().is_file() && self.public_key().is_file()
    }
}
