//! The per-identity git author fragment (`identity.json`) and the canonical
//! `.gitconfig` rendered from it at activation time.
use crate::error::identity::git_identity::ReadGitIdentityError::{
    LoadIdentityFileFailed, MissingField, MissingIdentityFile,
};
use crate::error::identity::git_identity::{ReadGitIdentityError, WriteGitIdentityError};
use crate::error::structured_file::StructuredFileError::WriteJsonFileFailed;
use crate::identity::{IdentityFields, ProfileFileLocations};
use crate::json::{load_json_file, save_json_file};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::Path;
use time::OffsetDateTime;

#[derive(Debug, Serialize, Deserialize)]
struct IdentityFile {
    #[serde(default)]
    display_name: Option<String>,

    #[serde(default)]
    username: String,

    #[serde(default)]
    email: Option<String>,

    #[serde(default)]
    token: Option<String>,

    #[serde(default, with = "time::serde::rfc3339::option")]
    created_at: Option<OffsetDateTime>,
}

/// What `read` recovers from an identity directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredIdentity {
    pub fields: IdentityFields,
    pub created_at: Option<OffsetDateTime>,
}

pub fn write(
    dir: &Path,
    fields: &IdentityFields,
    created_at: OffsetDateTime,
) -> Result<(), WriteGitIdentityError> {
    let file = IdentityFile {
        display_name: Some(fields.display_name.clone()),
        username: fields.username.clone(),
        email: Some(fields.email.clone()),
        token: fields.token.clone(),
        created_at: Some(created_at),
    };
    let path = ProfileFileLocations::new(dir.to_path_buf()).identity_json();
    save_json_file(&path, &file)?;
    crate::fs::set_mode(&path, 0o600)
        .map_err(|e| WriteGitIdentityError(WriteJsonFileFailed(e.into())))?;
    Ok(())
}

pub fn read(dir: &Path) -> Result<StoredIdentity, ReadGitIdentityError> {
    let path = ProfileFileLocations::new(dir.to_path_buf()).identity_json();
    if !path.is_file() {
        return Err(MissingIdentityFile(path));
    }
    let file: IdentityFile = load_json_file(&path).map_err(LoadIdentityFileFailed)?;

    let display_name = file
        .display_name
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| MissingField(path.clone(), "display_name"))?;
    let email = file
        .email
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| MissingField(path.clone(), "email"))?;

    Ok(StoredIdentity {
        fields: IdentityFields {
            display_name,
            username: file.username,
            email,
            token: file.token,
        },
        created_at: file.created_at,
    })
}

/// Renders the `.gitconfig` installed on activation. Only `user.name` and
/// `user.email` are written; the token and username never leave the profile.
pub fn render_gitconfig(fields: &IdentityFields) -> String {
    let mut out = String::from("# Installed by keyswitch. Switching profiles overwrites this file.\n");
    out.push_str("[user]\n");
    // writing to a String cannot fail
    let _ = writeln!(out, "\tname = {}", quote(&fields.display_name));
    let _ = writeln!(out, "\temail = {}", quote(&fields.email));
    out
}

fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
