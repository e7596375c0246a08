//! Makes one identity the host-wide SSH/git identity and remembers which one.
//!
//! Activation stages every replacement file beside its canonical path, backs up
//! what is there, and records the backups in a journal before renaming the
//! staged files into place. If a later step fails, the backups are renamed
//! back. If the process dies mid-switch, the journal is replayed by the next
//! `recover`. The active pointer is written last and marks the switch as done.
use crate::config::directories::Locations;
use crate::error::identity::activate_profile::ActivateProfileError;
use crate::error::identity::activate_profile::ActivateProfileError::{
    ApplyGitConfigFailed, BackupCanonicalFileFailed, EnsureCanonicalDirFailed,
    InstallCanonicalFileFailed, ReadJournalFailed, RemoveInstalledFileFailed,
    RemoveLeftoverFailed, RestoreBackupFailed, StageFileFailed, StageKeyFailed,
    WriteActivePointerFailed, WriteJournalFailed,
};
use crate::error::identity::catalog::CatalogError::ReadActivePointerFailed;
use crate::error::identity::IdentityError;
use crate::error::identity::IdentityError::{
    ActivationFailed, CannotRemoveActiveProfile, RecoverActivationFailed,
};
use crate::error::process::ProcessError;
use crate::fs::composite::{ensure_parent_dir_exists, remove_file_if_exists};
use crate::identity::git_identity::render_gitconfig;
use crate::identity::{IdentityFields, Profile, ProfileStore};
use crate::json::{load_json_file, save_json_file_atomically};
use crate::process::{execute_process, locate_program};
use serde::{Deserialize, Serialize};
use slog::{debug, error, info, trace, warn, Logger};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::NamedTempFile;

const STAGING_PREFIX: &str = ".keyswitch-staged-";
const BACKUP_PREFIX: &str = ".keyswitch-backup-";
const SSH_DIR_MODE: u32 = 0o700;

/// Applies git author settings to the canonical `.gitconfig`.
pub trait GitConfigurator: Send + Sync {
    fn apply(&self, gitconfig: &Path, fields: &IdentityFields) -> Result<(), ProcessError>;
}

/// Runs `git config --file <gitconfig>` for `user.name` and `user.email`.
#[derive(Clone, Debug)]
pub struct GitCli {
    program: PathBuf,
}

impl GitCli {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }
}

impl GitConfigurator for GitCli {
    fn apply(&self, gitconfig: &Path, fields: &IdentityFields) -> Result<(), ProcessError> {
        let git = locate_program(self.program.as_os_str())?;
        for (key, value) in [
            ("user.name", &fields.display_name),
            ("user.email", &fields.email),
        ] {
            let mut cmd = Command::new(&git);
            cmd.arg("config")
                .arg("--file")
                .arg(gitconfig)
                .args([key, value.as_str()]);
            execute_process(&mut cmd)?;
        }
        Ok(())
    }
}

/// Leaves the installed `.gitconfig` as rendered.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoGlobalGitConfig;

impl GitConfigurator for NoGlobalGitConfig {
    fn apply(&self, _gitconfig: &Path, _fields: &IdentityFields) -> Result<(), ProcessError> {
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ActivePointer {
    #[serde(default)]
    active: Option<String>,
}

pub struct ActivationEngine {
    locations: Locations,
    git: Box<dyn GitConfigurator>,
    log: Logger,
}

impl ActivationEngine {
    pub fn new(locations: Locations, git: Box<dyn GitConfigurator>, log: Logger) -> Self {
        Self {
            locations,
            git,
            log,
        }
    }

    /// Install the named identity as the canonical one and record it as active.
    /// Callers must hold the catalog lock.
    pub fn switch_to(&self, store: &ProfileStore, name: &str) -> Result<(), IdentityError> {
        let profile = store.get(name)?;
        self.install(&profile)
            .map_err(|e| ActivationFailed(name.to_string(), e))?;
        info!(self.log, "Activated profile {}", name);
        Ok(())
    }

    /// Finishes or undoes a switch that was interrupted, and removes staging
    /// and backup files nothing refers to. Callers must hold the catalog lock.
    pub fn recover(&self) -> Result<(), IdentityError> {
        let journal_path = self.locations.activation_journal_path();
        if journal_path.exists() {
            let journal: Journal = load_json_file(&journal_path)
                .map_err(|e| RecoverActivationFailed(ReadJournalFailed(e)))?;
            let committed = self.read_pointer()?.as_deref() == Some(journal.profile.as_str());
            let installation = Installation {
                profile: journal.profile,
                journal_path,
                entries: journal.entries,
                log: &self.log,
            };
            if committed {
                debug!(self.log, "Switch to {} had completed", installation.profile);
                installation.complete();
            } else {
                warn!(
                    self.log,
                    "Restoring the installation that was being replaced by profile {}",
                    installation.profile
                );
                installation.restore().map_err(RecoverActivationFailed)?;
                remove_file_if_exists(&installation.journal_path).map_err(|e| {
                    RecoverActivationFailed(RemoveLeftoverFailed(e.path, e.source))
                })?;
            }
        }
        self.remove_leftovers().map_err(RecoverActivationFailed)
    }

    /// The active identity, or none if nothing was activated yet or the recorded
    /// identity no longer exists.
    pub fn get_current(&self, store: &ProfileStore) -> Result<Option<String>, IdentityError> {
        let Some(name) = self.read_pointer()? else {
            return Ok(None);
        };
        match store.get(&name) {
            Ok(_) => Ok(Some(name)),
            Err(e) => {
                debug!(self.log, "Recorded active profile {} is unusable: {}", name, e);
                Ok(None)
            }
        }
    }

    pub fn guard_removal(&self, name: &str) -> Result<(), IdentityError> {
        if self.read_pointer()?.as_deref() == Some(name) {
            return Err(CannotRemoveActiveProfile(name.to_string()));
        }
        Ok(())
    }

    /// The raw pointer, without checking the catalog.
    pub fn read_pointer(&self) -> Result<Option<String>, IdentityError> {
        let path = self.locations.active_pointer_path();
        if !path.exists() {
            return Ok(None);
        }
        let pointer: ActivePointer = load_json_file(&path).map_err(ReadActivePointerFailed)?;
        Ok(pointer.active.filter(|name| !name.is_empty()))
    }

    fn canonical_paths(&self) -> [&Path; 3] {
        [
            self.locations.canonical_private_key.as_path(),
            self.locations.canonical_public_key.as_path(),
            self.locations.canonical_gitconfig.as_path(),
        ]
    }

    fn install(&self, profile: &Profile) -> Result<(), ActivateProfileError> {
        let gitconfig = render_gitconfig(&profile.fields);
        let staged = [
            self.stage(
                Contents::CopyOf(&profile.private_key_path),
                &self.locations.canonical_private_key,
                0o600,
            )?,
            self.stage(
                Contents::CopyOf(&profile.public_key_path),
                &self.locations.canonical_public_key,
                0o644,
            )?,
            self.stage(
                Contents::Text(&gitconfig),
                &self.locations.canonical_gitconfig,
                0o644,
            )?,
        ];

        let installation = Installation::begin(
            &profile.name,
            self.locations.activation_journal_path(),
            &self.canonical_paths(),
            &self.log,
        )?;
        match self.commit(&installation, staged, profile) {
            Ok(()) => {
                installation.complete();
                Ok(())
            }
            Err(e) => {
                installation.roll_back();
                Err(e)
            }
        }
    }

    fn commit(
        &self,
        installation: &Installation,
        staged: [StagedFile; 3],
        profile: &Profile,
    ) -> Result<(), ActivateProfileError> {
        for file in staged {
            installation.replace(file)?;
        }
        self.git
            .apply(&self.locations.canonical_gitconfig, &profile.fields)
            .map_err(ApplyGitConfigFailed)?;
        let pointer = ActivePointer {
            active: Some(profile.name.clone()),
        };
        let pointer_path = self.locations.active_pointer_path();
        ensure_parent_dir_exists(&pointer_path)
            .map_err(|e| EnsureCanonicalDirFailed(pointer_path.clone(), e))?;
        save_json_file_atomically(&pointer_path, &pointer).map_err(WriteActivePointerFailed)?;
        Ok(())
    }

    fn stage(
        &self,
        contents: Contents<'_>,
        target: &Path,
        mode: u32,
    ) -> Result<StagedFile, ActivateProfileError> {
        let dir = self.prepare_parent(target)?;
        let mut file = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempfile_in(&dir)
            .map_err(|e| StageFileFailed(target.to_path_buf(), e))?;
        crate::fs::set_mode(file.path(), mode)
            .map_err(|e| StageKeyFailed(target.to_path_buf(), e.into()))?;

        let bytes = match contents {
            Contents::CopyOf(source) => crate::fs::read(source)
                .map_err(|e| StageKeyFailed(target.to_path_buf(), e.into()))?,
            Contents::Text(text) => text.as_bytes().to_vec(),
        };
        file.write_all(&bytes)
            .and_then(|()| file.as_file().sync_all())
            .map_err(|e| StageFileFailed(target.to_path_buf(), e))?;
        trace!(self.log, "Staged {} at {}", target.display(), file.path().display());

        Ok(StagedFile {
            file,
            target: target.to_path_buf(),
        })
    }

    fn prepare_parent(&self, target: &Path) -> Result<PathBuf, ActivateProfileError> {
        let dir = crate::fs::parent(target)
            .map_err(|e| EnsureCanonicalDirFailed(target.to_path_buf(), e.into()))?;
        if !dir.exists() {
            ensure_parent_dir_exists(target)
                .map_err(|e| EnsureCanonicalDirFailed(target.to_path_buf(), e))?;
            if dir.file_name().is_some_and(|n| n == ".ssh") {
                crate::fs::set_mode(&dir, SSH_DIR_MODE)
                    .map_err(|e| StageKeyFailed(target.to_path_buf(), e.into()))?;
            }
        }
        Ok(dir)
    }

    fn remove_leftovers(&self) -> Result<(), ActivateProfileError> {
        let mut dirs: Vec<PathBuf> = self
            .canonical_paths()
            .iter()
            .filter_map(|p| p.parent().map(Path::to_path_buf))
            .collect();
        dirs.dedup();
        for dir in dirs.iter().filter(|d| d.is_dir()) {
            let entries =
                crate::fs::read_dir(dir).map_err(|e| RemoveLeftoverFailed(e.path, e.source))?;
            for entry in entries {
                let entry = entry.map_err(|e| RemoveLeftoverFailed(dir.clone(), e))?;
                let leftover = entry.file_name().to_str().is_some_and(|name| {
                    name.starts_with(STAGING_PREFIX) || name.starts_with(BACKUP_PREFIX)
                });
                if leftover {
                    remove_file_if_exists(&entry.path())
                        .map_err(|e| RemoveLeftoverFailed(e.path, e.source))?;
                    debug!(self.log, "Removed leftover {}", entry.path().display());
                }
            }
        }
        Ok(())
    }
}

enum Contents<'a> {
    CopyOf(&'a Path),
    Text(&'a str),
}

struct StagedFile {
    file: NamedTempFile,
    target: PathBuf,
}

/// Persisted while canonical files are being replaced.
#[derive(Debug, Serialize, Deserialize)]
struct Journal {
    profile: String,
    entries: Vec<JournalEntry>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct JournalEntry {
    target: PathBuf,
    /// None if there was no file at `target`.
    #[serde(default)]
    backup: Option<PathBuf>,
}

/// The canonical files a switch replaces, with backups of what they held.
struct Installation<'a> {
    profile: String,
    journal_path: PathBuf,
    entries: Vec<JournalEntry>,
    log: &'a Logger,
}

impl<'a> Installation<'a> {
    /// Backs up every target and writes the journal. Nothing is replaced yet.
    fn begin(
        profile: &str,
        journal_path: PathBuf,
        targets: &[&Path],
        log: &'a Logger,
    ) -> Result<Self, ActivateProfileError> {
        let mut installation = Self {
            profile: profile.to_string(),
            journal_path,
            entries: vec![],
            log,
        };
        match installation.back_up(targets) {
            Ok(()) => Ok(installation),
            Err(e) => {
                installation.complete();
                Err(e)
            }
        }
    }

    fn back_up(&mut self, targets: &[&Path]) -> Result<(), ActivateProfileError> {
        for target in targets {
            let backup = if target.is_file() {
                Some(back_up_file(target)?)
            } else {
                None
            };
            self.entries.push(JournalEntry {
                target: target.to_path_buf(),
                backup,
            });
        }
        ensure_parent_dir_exists(&self.journal_path)
            .map_err(|e| EnsureCanonicalDirFailed(self.journal_path.clone(), e))?;
        let journal = Journal {
            profile: self.profile.clone(),
            entries: self.entries.clone(),
        };
        save_json_file_atomically(&self.journal_path, &journal).map_err(WriteJournalFailed)
    }

    fn replace(&self, staged: StagedFile) -> Result<(), ActivateProfileError> {
        let target = staged.target;
        staged
            .file
            .persist(&target)
            .map_err(|e| InstallCanonicalFileFailed(target.clone(), e.error))?;
        Ok(())
    }

    /// Puts back what every target held, newest first.
    fn restore(&self) -> Result<(), ActivateProfileError> {
        let mut first_error = None;
        for entry in self.entries.iter().rev() {
            let restored = match &entry.backup {
                Some(backup) if backup.exists() => {
                    crate::fs::rename(backup, &entry.target).map_err(RestoreBackupFailed)
                }
                // restored by an earlier attempt
                Some(_) => Ok(()),
                None if entry.target.is_file() => {
                    remove_file_if_exists(&entry.target).map_err(RemoveInstalledFileFailed)
                }
                None => Ok(()),
            };
            match restored {
                Ok(()) => debug!(self.log, "Restored {}", entry.target.display()),
                Err(e) => {
                    error!(self.log, "Failed to restore {}: {}", entry.target.display(), e);
                    first_error.get_or_insert(e);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Undoes a failed switch. If anything cannot be restored, the journal is kept
    /// for the next `recover`.
    fn roll_back(self) {
        if self.restore().is_ok() {
            self.remove_journal();
        }
    }

    /// Drops the journal and the backups.
    fn complete(self) {
        self.remove_journal();
        for backup in self.entries.iter().filter_map(|e| e.backup.as_ref()) {
            if let Err(e) = remove_file_if_exists(backup) {
                warn!(self.log, "Failed to remove backup {}: {}", backup.display(), e);
            }
        }
    }

    fn remove_journal(&self) {
        if let Err(e) = remove_file_if_exists(&self.journal_path) {
            warn!(self.log, "Failed to remove {}: {}", self.journal_path.display(), e);
        }
    }
}

fn back_up_file(target: &Path) -> Result<PathBuf, ActivateProfileError> {
    let dir = crate::fs::parent(target)
        .map_err(|e| EnsureCanonicalDirFailed(target.to_path_buf(), e.into()))?;
    let backup = tempfile::Builder::new()
        .prefix(BACKUP_PREFIX)
        .tempfile_in(&dir)
        .map_err(|e| StageFileFailed(target.to_path_buf(), e))?;
    crate::fs::copy(target, backup.path())
        .map_err(|e| BackupCanonicalFileFailed(target.to_path_buf(), e))?;
    let (_, path) = backup
        .keep()
        .map_err(|e| StageFileFailed(target.to_path_buf(), e.error))?;
    Ok(path)
}
