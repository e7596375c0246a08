use crate::error::fs::{EnsureDirExistsError, EnsureParentDirExistsError};
use std::path::Path;

pub fn ensure_dir_exists(p: &Path) -> Result<(), EnsureDirExistsError> {
    if !p.exists() {
        crate::fs::create_dir_all(p).map_err(EnsureDirExistsError::from)
    } else if !p.is_dir() {
        Err(EnsureDirExistsError::NotADirectory(p.to_path_buf()))
    } else {
        Ok(())
    }
}

pub fn ensure_parent_dir_exists(d: &Path) -> Result<(), EnsureParentDirExistsError> {
    let parent = crate::fs::parent(d)?;
    Ok(ensure_dir_exists(&parent)?)
}

/// Removes a file, treating an already missing file as success.
pub fn remove_file_if_exists(path: &Path) -> Result<(), crate::error::fs::RemoveFileError> {
    match crate::fs::remove_file(path) {
        Err(e) if e.source.kind() == std::io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
