use crate::config::model::settings::{Settings, MINIMUM_KEY_BITS};
use crate::error::identity::generate_key_pair::GenerateKeyPairError;
use crate::error::identity::generate_key_pair::GenerateKeyPairError::{
    KeyTooSmall, LocateToolFailed, MissingKeyFile, RunToolFailed, SetKeyPermissionsFailed,
};
use crate::fs::composite::remove_file_if_exists;
use crate::identity::ProfileFileLocations;
use crate::process::{execute_process, locate_program};
use slog::{debug, warn, Logger};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

const PRIVATE_KEY_MODE: u32 = 0o600;
const PUBLIC_KEY_MODE: u32 = 0o644;

/// Produces a passphrase-less key pair.
pub trait KeyGenerator: Send + Sync {
    /// Writes `id_rsa` and `id_rsa.pub` into `destination`, labelling the public
    /// key with `comment`.
    fn generate(&self, destination: &Path, comment: &str) -> Result<(), GenerateKeyPairError>;
}

/// Key generation through OpenSSH's `ssh-keygen`.
#[derive(Clone, Debug)]
pub struct SshKeygen {
    program: PathBuf,
    bits: u32,
}

impl SshKeygen {
    pub fn new(program: PathBuf, bits: u32) -> Self {
        Self { program, bits }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.ssh_keygen.clone(), settings.key_bits)
    }
}

impl KeyGenerator for SshKeygen {
    fn generate(&self, destination: &Path, comment: &str) -> Result<(), GenerateKeyPairError> {
        if self.bits < MINIMUM_KEY_BITS {
            return Err(KeyTooSmall {
                minimum: MINIMUM_KEY_BITS,
                actual: self.bits,
            });
        }
        let program = locate_program(self.program.as_os_str()).map_err(LocateToolFailed)?;
        let private_key = ProfileFileLocations::new(destination.to_path_buf()).private_key();

        let mut cmd = Command::new(program);
        cmd.args(["-q", "-t", "rsa", "-b"])
            .arg(self.bits.to_string())
            .args(["-N", "", "-C", comment, "-f"])
            .arg(private_key)
            .stdin(Stdio::null());
        execute_process(&mut cmd).map_err(RunToolFailed)?;
        Ok(())
    }
}

/// Where a freshly generated key pair ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPairPaths {
    pub private_key: PathBuf,
    pub public_key: PathBuf,
}

/// Runs the generator, checks that both files appeared and locks down their
/// permissions. On any failure both key files are removed again.
pub fn generate_key_pair(
    log: &Logger,
    generator: &dyn KeyGenerator,
    destination: &Path,
    comment: &str,
) -> Result<KeyPairPaths, GenerateKeyPairError> {
    let locations = ProfileFileLocations::new(destination.to_path_buf());
    let paths = KeyPairPaths {
        private_key: locations.private_key(),
        public_key: locations.public_key(),
    };

    let result = generator
        .generate(destination, comment)
        .and_then(|()| secure_key_pair(&paths));

    if let Err(err) = result {
        for path in [&paths.private_key, &paths.public_key] {
            if let Err(e) = remove_file_if_exists(path) {
                warn!(log, "Failed to remove partial key file {}: {}", path.display(), e);
            }
        }
        return Err(err);
    }

    debug!(log, "Generated key pair in {}", destination.display());
    Ok(paths)
}

fn secure_key_pair(paths: &KeyPairPaths) -> Result<(), GenerateKeyPairError> {
    for path in [&paths.private_key, &paths.public_key] {
        if !path.is_file() {
            return Err(MissingKeyFile(path.clone()));
        }
    }
    crate::fs::set_mode(&paths.private_key, PRIVATE_KEY_MODE).map_err(SetKeyPermissionsFailed)?;
    crate::fs::set_mode(&paths.public_key, PUBLIC_KEY_MODE).map_err(SetKeyPermissionsFailed)?;
    Ok(())
}
