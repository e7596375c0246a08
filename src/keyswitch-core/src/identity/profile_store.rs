use crate::error::identity::catalog::CatalogError;
use crate::error::identity::catalog::CatalogError::{
    CreateStagingDirectoryFailed, EnsureProfilesRootFailed, InstallProfileDirectoryFailed,
    ReadProfileEntryFailed, ReadProfilesRootFailed, ReadPublicKeyFailed,
    RemoveProfileDirectoryFailed, WriteIdentityFileFailed,
};
use crate::error::identity::IdentityError;
use crate::error::identity::IdentityError::{
    CorruptIdentityFile, DuplicateProfile, KeyGenerationFailed, ProfileNotFound,
};
use crate::fs::composite::ensure_dir_exists;
use crate::identity::keygen::generate_key_pair;
use crate::identity::{
    git_identity, validate_profile_name, IdentityFields, KeyGenerator, Profile,
    ProfileFileLocations, TEMP_IDENTITY_PREFIX,
};
use slog::{debug, info, Logger};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

/// CRUD over identity directories below the profiles root.
///
/// The store knows nothing about activation; callers guard removal of the
/// active identity themselves.
#[derive(Clone, Debug)]
pub struct ProfileStore {
    root: PathBuf,
    log: Logger,
}

impl ProfileStore {
    pub fn new(root: PathBuf, log: Logger) -> Self {
        Self { root, log }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validates the name and returns the files it maps to.
    pub fn locations(&self, name: &str) -> Result<ProfileFileLocations, IdentityError> {
        validate_profile_name(name)?;
        Ok(ProfileFileLocations::new(self.root.join(name)))
    }

    /// Create a new identity: a fresh key pair plus its identity file.
    ///
    /// Everything is assembled in a staging directory and renamed into place at the
    /// end, so a failure at any step leaves no trace in the catalog.
    pub fn create(
        &self,
        name: &str,
        fields: &IdentityFields,
        generator: &dyn KeyGenerator,
    ) -> Result<Profile, IdentityError> {
        let locations = self.locations(name)?;
        fields.validate()?;

        if locations.dir().exists() {
            return Err(DuplicateProfile(name.to_string()));
        }
        ensure_dir_exists(&self.root).map_err(EnsureProfilesRootFailed)?;

        let staging = tempfile::Builder::new()
            .prefix(&format!("{TEMP_IDENTITY_PREFIX}{name}."))
            .tempdir_in(&self.root)
            .map_err(|e| CreateStagingDirectoryFailed(self.root.clone(), e))?;
        let staged_dir = staging.path().join(name);
        crate::fs::create_dir_all(&staged_dir)
            .map_err(|e| CreateStagingDirectoryFailed(staged_dir.clone(), e.source))?;

        generate_key_pair(&self.log, generator, &staged_dir, &fields.email)
            .map_err(|e| KeyGenerationFailed(name.to_string(), e))?;
        git_identity::write(&staged_dir, fields, OffsetDateTime::now_utc())
            .map_err(WriteIdentityFileFailed)?;

        if locations.dir().exists() {
            return Err(DuplicateProfile(name.to_string()));
        }
        crate::fs::rename(&staged_dir, locations.dir()).map_err(InstallProfileDirectoryFailed)?;
        info!(self.log, "Created profile {}", name);

        self.load(name, locations)
    }

    /// Names of all well-formed identities, oldest first.
    /// Entries that are not complete identities are skipped.
    pub fn list(&self) -> Result<Vec<String>, IdentityError> {
        Ok(self.list_profiles()?.into_iter().map(|p| p.name).collect())
    }

    pub fn list_profiles(&self) -> Result<Vec<Profile>, IdentityError> {
        let mut profiles = vec![];
        for name in self.directory_names()? {
            let Ok(locations) = self.locations(&name) else {
                continue;
            };
            match self.load(&name, locations) {
                Ok(profile) => profiles.push(profile),
                Err(e) => debug!(self.log, "Skipping malformed profile {}: {}", name, e),
            }
        }
        profiles.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(profiles)
    }

    pub fn get(&self, name: &str) -> Result<Profile, IdentityError> {
        let locations = self.locations(name)?;
        self.load(name, locations)
    }

    pub fn delete(&self, name: &str) -> Result<(), IdentityError> {
        let locations = self.locations(name)?;
        if !locations.dir().is_dir() {
            return Err(ProfileNotFound(name.to_string(), None));
        }
        crate::fs::remove_dir_all(locations.dir()).map_err(RemoveProfileDirectoryFailed)?;
        info!(self.log, "Removed profile {}", name);
        Ok(())
    }

    /// Removes every identity directory except `keep`, returning the removed names.
    /// Malformed directories are removed too; leftover staging directories are not
    /// touched.
    pub fn clear(&self, keep: Option<&str>) -> Result<Vec<String>, IdentityError> {
        let mut removed = vec![];
        for name in self.directory_names()? {
            if Some(name.as_str()) == keep || self.locations(&name).is_err() {
                continue;
            }
            crate::fs::remove_dir_all(&self.root.join(&name))
                .map_err(RemoveProfileDirectoryFailed)?;
            info!(self.log, "Removed profile {}", name);
            removed.push(name);
        }
        removed.sort();
        Ok(removed)
    }

    /// The stored public key, verbatim.
    pub fn public_key(&self, name: &str) -> Result<String, IdentityError> {
        let profile = self.get(name)?;
        let key = crate::fs::read_to_string(&profile.public_key_path).map_err(ReadPublicKeyFailed)?;
        Ok(key)
    }

    fn load(&self, name: &str, locations: ProfileFileLocations) -> Result<Profile, IdentityError> {
        if !locations.dir().is_dir() || !locations.has_key_pair() {
            return Err(ProfileNotFound(name.to_string(), None));
        }
        let stored = git_identity::read(locations.dir()).map_err(|e| {
            ProfileNotFound(
                name.to_string(),
                Some(Box::new(CorruptIdentityFile(name.to_string(), e))),
            )
        })?;
        Ok(Profile {
            name: name.to_string(),
            fields: stored.fields,
            created_at: stored.created_at,
            private_key_path: locations.private_key(),
            public_key_path: locations.public_key(),
        })
    }

    fn directory_names(&self) -> Result<Vec<String>, CatalogError> {
        if !self.root.exists() {
            return Ok(vec![]);
        }
        let mut names = vec![];
        for entry in crate::fs::read_dir(&self.root).map_err(ReadProfilesRootFailed)? {
            let entry = entry.map_err(|e| ReadProfileEntryFailed(self.root.clone(), e))?;
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                // removed by a concurrent operation since the directory was read
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(ReadProfileEntryFailed(entry.path(), e)),
            };
            if !file_type.is_dir() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => debug!(self.log, "Skipping non UTF-8 entry {:?}", raw),
            }
        }
        Ok(names)
    }
}
