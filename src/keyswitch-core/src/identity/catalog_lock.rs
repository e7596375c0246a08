//! Serializes catalog mutations, both between threads sharing a service and
//! between separate keyswitch processes.
use crate::error::fs::EnsureParentDirExistsError;
use crate::error::identity::acquire_lock::AcquireLockError;
use crate::error::identity::acquire_lock::AcquireLockError::{
    EnsureLockDirFailed, LockFailed, OpenLockFileFailed,
};
use crate::error::identity::IdentityError;
use crate::fs::composite::ensure_parent_dir_exists;
use fd_lock::RwLock as FdRwLock;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug)]
pub struct CatalogLock {
    threads: Mutex<()>,
    path: PathBuf,
}

impl CatalogLock {
    pub fn new(path: PathBuf) -> Self {
        Self {
            threads: Mutex::new(()),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs `f` while holding the lock exclusively. The lock is released when
    /// `f` returns, whether or not it succeeded.
    pub fn with_exclusive<T, F>(&self, f: F) -> Result<T, IdentityError>
    where
        F: FnOnce() -> Result<T, IdentityError>,
    {
        // a panic in another operation leaves the catalog consistent on disk
        let _thread_guard = self
            .threads
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut file = FdRwLock::new(self.open()?);
        let _file_guard = file
            .write()
            .map_err(|e| LockFailed(self.path.clone(), e))?;
        f()
    }

    fn open(&self) -> Result<std::fs::File, AcquireLockError> {
        ensure_parent_dir_exists(&self.path).map_err(|e| match e {
            EnsureParentDirExistsError::EnsureDirExists(e) => EnsureLockDirFailed(e),
            EnsureParentDirExistsError::NoParentPath(_) => OpenLockFileFailed(
                self.path.clone(),
                std::io::Error::new(std::io::ErrorKind::NotFound, "lock file has no parent directory"),
            ),
        })?;
        OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|e| OpenLockFileFailed(self.path.clone(), e))
    }
}
