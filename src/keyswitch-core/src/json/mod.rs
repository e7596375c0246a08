use crate::error::fs::FsError;
use crate::error::structured_file::StructuredFileError;
use crate::error::structured_file::StructuredFileError::{
    DeserializeJsonFileFailed, PersistJsonFileFailed, ReadJsonFileFailed, SerializeJsonFileFailed,
    WriteJsonFileFailed,
};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

pub fn load_json_file<T: for<'a> serde::de::Deserialize<'a>>(
    path: &Path,
) -> Result<T, StructuredFileError> {
    let content = crate::fs::read(path).map_err(ReadJsonFileFailed)?;

    serde_json::from_slice(content.as_ref())
        .map_err(|err| DeserializeJsonFileFailed(Box::new(path.to_path_buf()), err))
}

pub fn save_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), StructuredFileError> {
    let content = serde_json::to_string_pretty(&value)
        .map_err(|err| SerializeJsonFileFailed(Box::new(path.to_path_buf()), err))?;
    crate::fs::write(path, content).map_err(|e| WriteJsonFileFailed(FsError::from(e)))?;
    Ok(())
}

/// Writes the file next to its destination and renames it into place, so readers
/// observe either the previous or the new content.
pub fn save_json_file_atomically<T: Serialize>(
    path: &Path,
    value: &T,
) -> Result<(), StructuredFileError> {
    let content = serde_json::to_string_pretty(&value)
        .map_err(|err| SerializeJsonFileFailed(Box::new(path.to_path_buf()), err))?;
    let dir = crate::fs::parent(path).map_err(|e| WriteJsonFileFailed(e.into()))?;
    let mut staged = tempfile::NamedTempFile::new_in(&dir)
        .map_err(|err| PersistJsonFileFailed(Box::new(path.to_path_buf()), err))?;
    staged
        .write_all(content.as_bytes())
        .and_then(|_| staged.as_file().sync_all())
        .map_err(|err| PersistJsonFileFailed(Box::new(path.to_path_buf()), err))?;
    staged
        .persist(path)
        .map_err(|err| PersistJsonFileFailed(Box::new(path.to_path_buf()), err.error))?;
    Ok(())
}
