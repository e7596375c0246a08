use crate::error::structured_file::StructuredFileError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadGitIdentityError {
    #[error("Identity file {0} is missing")]
    MissingIdentityFile(PathBuf),

    #[error("Failed to load identity file")]
    LoadIdentityFileFailed(#[source] StructuredFileError),

    #[error("Identity file {0} has no {1}")]
    MissingField(PathBuf, &'static str),
}

#[derive(Error, Debug)]
#[error("Failed to save identity file")]
pub struct WriteGitIdentityError(#[from] pub StructuredFileError);
