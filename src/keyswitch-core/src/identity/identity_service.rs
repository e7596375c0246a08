//! The entry point for everything that manages identities.
//!
//! Reads go straight to disk. Mutations are serialized through the catalog
//! lock and announced to subscribers once they have succeeded.
use crate::config::directories::Locations;
use crate::config::model::settings::Settings;
use crate::error::config::ConfigError;
use crate::error::identity::IdentityError;
use crate::identity::activation::ActivationEngine;
use crate::identity::catalog_lock::CatalogLock;
use crate::identity::notify::{ChangeNotifier, ProfilesChanged};
use crate::identity::{
    GitCli, GitConfigurator, IdentityFields, KeyGenerator, NoGlobalGitConfig, Profile,
    ProfileStore, SshKeygen,
};
use crossbeam::channel::Receiver;
use slog::{info, Logger};

/// Outcome of `clear_profiles`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClearSummary {
    pub removed: Vec<String>,
    /// The active profile, which is never cleared.
    pub retained: Option<String>,
}

pub struct IdentityService {
    locations: Locations,
    store: ProfileStore,
    engine: ActivationEngine,
    generator: Box<dyn KeyGenerator>,
    lock: CatalogLock,
    notifier: ChangeNotifier,
    log: Logger,
}

impl IdentityService {
    /// The service for the current user, honoring `settings.json`.
    pub fn new(log: Logger) -> Result<Self, ConfigError> {
        let locations = Locations::from_environment()?;
        let settings = Settings::load(&locations)?;
        Ok(Self::with_settings(log, locations, &settings))
    }

    pub fn with_settings(log: Logger, locations: Locations, settings: &Settings) -> Self {
        let git: Box<dyn GitConfigurator> = if settings.apply_global_git_config {
            Box::new(GitCli::new(settings.git.clone()))
        } else {
            Box::new(NoGlobalGitConfig)
        };
        Self::with_capabilities(
            log,
            locations,
            Box::new(SshKeygen::from_settings(settings)),
            git,
        )
    }

    pub fn with_capabilities(
        log: Logger,
        locations: Locations,
        generator: Box<dyn KeyGenerator>,
        git: Box<dyn GitConfigurator>,
    ) -> Self {
        let store = ProfileStore::new(locations.profiles_root.clone(), log.clone());
        let engine = ActivationEngine::new(locations.clone(), git, log.clone());
        let lock = CatalogLock::new(locations.lock_path());
        Self {
            locations,
            store,
            engine,
            generator,
            lock,
            notifier: ChangeNotifier::default(),
            log,
        }
    }

    pub fn locations(&self) -> &Locations {
        &self.locations
    }

    /// Names of all well-formed profiles, oldest first.
    pub fn list_profiles(&self) -> Result<Vec<String>, IdentityError> {
        self.store.list()
    }

    pub fn get_current_profile(&self) -> Result<Option<String>, IdentityError> {
        self.engine.get_current(&self.store)
    }

    pub fn get_profile(&self, name: &str) -> Result<Profile, IdentityError> {
        self.store.get(name)
    }

    pub fn create_profile(&self, name: &str, fields: &IdentityFields) -> Result<(), IdentityError> {
        self.exclusive(|| {
            self.store
                .create(name, fields, self.generator.as_ref())
                .map(|_| ())
        })?;
        self.notifier
            .publish(ProfilesChanged::Created(name.to_string()));
        Ok(())
    }

    pub fn switch_profile(&self, name: &str) -> Result<(), IdentityError> {
        self.exclusive(|| self.engine.switch_to(&self.store, name))?;
        self.notifier
            .publish(ProfilesChanged::Switched(name.to_string()));
        Ok(())
    }

    pub fn remove_profile(&self, name: &str) -> Result<(), IdentityError> {
        self.exclusive(|| {
            self.engine.guard_removal(name)?;
            self.store.delete(name)
        })?;
        self.notifier
            .publish(ProfilesChanged::Removed(name.to_string()));
        Ok(())
    }

    /// Removes every profile except the active one. The active profile is kept
    /// even when its files are malformed.
    pub fn clear_profiles(&self) -> Result<ClearSummary, IdentityError> {
        let summary = self.exclusive(|| {
            let retained = self
                .engine
                .read_pointer()?
                .filter(|name| self.locations.profiles_root.join(name).is_dir());
            let removed = self.store.clear(retained.as_deref())?;
            Ok(ClearSummary { removed, retained })
        })?;
        info!(
            self.log,
            "Cleared {} profile(s)",
            summary.removed.len();
            "retained" => summary.retained.as_deref().unwrap_or("")
        );
        self.notifier.publish(ProfilesChanged::Cleared {
            removed: summary.removed.clone(),
        });
        Ok(summary)
    }

    pub fn show_public_key(&self, name: &str) -> Result<String, IdentityError> {
        self.store.public_key(name)
    }

    /// Receives a `ProfilesChanged` for every successful mutation from now on.
    pub fn subscribe(&self) -> Receiver<ProfilesChanged> {
        self.notifier.subscribe()
    }

    /// Mutations first settle any switch a dead process left half done.
    fn exclusive<T, F>(&self, f: F) -> Result<T, IdentityError>
    where
        F: FnOnce() -> Result<T, IdentityError>,
    {
        self.lock.with_exclusive(|| {
            self.engine.recover()?;
            f()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::testing::{fields_for, test_service, KeyGenFailure};
    use proptest::prelude::*;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    #[test]
    fn created_profiles_are_listed() {
        let dir = tempfile::tempdir().unwrap();
        let t = test_service(dir.path());

        for name in ["personal", "work", "client"] {
            t.service.create_profile(name, &fields_for(name)).unwrap();
        }

        let listed: BTreeSet<_> = t.service.list_profiles().unwrap().into_iter().collect();
        assert_eq!(
            listed,
            ["client", "personal", "work"]
                .iter()
                .map(|s| s.to_string())
                .collect::<BTreeSet<String>>()
        );
    }

    #[test]
    fn duplicate_create_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let t = test_service(dir.path());
        t.service.create_profile("work", &fields_for("work")).unwrap();
        let key_before = t.service.show_public_key("work").unwrap();

        let mut other = fields_for("other");
        other.email = "other@example.com".to_string();
        let err = t.service.create_profile("work", &other).unwrap_err();

        assert!(matches!(err, IdentityError::DuplicateProfile(name) if name == "work"));
        assert_eq!(t.service.list_profiles().unwrap(), vec!["work"]);
        assert_eq!(t.service.show_public_key("work").unwrap(), key_before);
        assert_eq!(t.service.get_profile("work").unwrap().fields, fields_for("work"));
    }

    #[test]
    fn switch_then_current() {
        let dir = tempfile::tempdir().unwrap();
        let t = test_service(dir.path());
        t.service.create_profile("home", &fields_for("home")).unwrap();
        t.service.create_profile("work", &fields_for("work")).unwrap();
        assert_eq!(t.service.get_current_profile().unwrap(), None);

        t.service.switch_profile("work").unwrap();
        assert_eq!(t.service.get_current_profile().unwrap(), Some("work".to_string()));

        t.service.switch_profile("home").unwrap();
        assert_eq!(t.service.get_current_profile().unwrap(), Some("home".to_string()));
        assert_eq!(t.git.last_applied(), Some(fields_for("home")));
    }

    #[test]
    fn active_profile_cannot_be_removed() {
        let dir = tempfile::tempdir().unwrap();
        let t = test_service(dir.path());
        t.service.create_profile("home", &fields_for("home")).unwrap();
        t.service.create_profile("work", &fields_for("work")).unwrap();
        t.service.switch_profile("work").unwrap();

        let err = t.service.remove_profile("work").unwrap_err();
        assert!(matches!(err, IdentityError::CannotRemoveActiveProfile(name) if name == "work"));
        assert_eq!(t.service.list_profiles().unwrap().len(), 2);

        t.service.switch_profile("home").unwrap();
        t.service.remove_profile("work").unwrap();
        assert_eq!(t.service.list_profiles().unwrap(), vec!["home"]);
    }

    #[test]
    fn removing_unknown_profile_fails() {
        let dir = tempfile::tempdir().unwrap();
        let t = test_service(dir.path());

        assert!(matches!(
            t.service.remove_profile("ghost"),
            Err(IdentityError::ProfileNotFound(..))
        ));
    }

    #[test]
    fn public_keys_are_distinct() {
        let dir = tempfile::tempdir().unwrap();
        let t = test_service(dir.path());
        t.service.create_profile("alice", &fields_for("alice")).unwrap();
        t.service.create_profile("bob", &fields_for("bob")).unwrap();

        let alice = t.service.show_public_key("alice").unwrap();
        let bob = t.service.show_public_key("bob").unwrap();

        assert!(!alice.trim().is_empty());
        assert_ne!(alice, bob);
        assert!(alice.contains("alice@example.com"));
    }

    #[test]
    fn reads_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let t = test_service(dir.path());
        t.service.create_profile("a", &fields_for("a")).unwrap();
        t.service.create_profile("b", &fields_for("b")).unwrap();
        t.service.switch_profile("b").unwrap();

        let first = (
            t.service.list_profiles().unwrap(),
            t.service.get_current_profile().unwrap(),
            t.service.show_public_key("a").unwrap(),
        );
        let second = (
            t.service.list_profiles().unwrap(),
            t.service.get_current_profile().unwrap(),
            t.service.show_public_key("a").unwrap(),
        );
        assert_eq!(first, second);
    }

    #[test]
    fn failed_key_generation_leaves_no_trace() {
        let dir = tempfile::tempdir().unwrap();
        let t = test_service(dir.path());
        let events = t.service.subscribe();

        for failure in [KeyGenFailure::ToolError, KeyGenFailure::OnlyPrivateKey] {
            t.keygen.fail_next(failure);
            let err = t.service.create_profile("bob", &fields_for("bob")).unwrap_err();

            assert!(matches!(err, IdentityError::KeyGenerationFailed(ref name, _) if name == "bob"));
            assert!(t.service.list_profiles().unwrap().is_empty());
            assert!(!t.locations.profiles_root.join("bob").exists());
        }
        let leftovers = std::fs::read_dir(&t.locations.profiles_root).unwrap().count();
        assert_eq!(leftovers, 0);
        assert!(events.try_recv().is_err());

        t.service.create_profile("bob", &fields_for("bob")).unwrap();
        assert_eq!(t.service.list_profiles().unwrap(), vec!["bob"]);
    }

    #[test]
    fn invalid_input_is_rejected_before_key_generation() {
        let dir = tempfile::tempdir().unwrap();
        let t = test_service(dir.path());
        let mut fields = fields_for("x");
        fields.email = "not-an-email".to_string();

        assert!(matches!(
            t.service.create_profile("x", &fields),
            Err(IdentityError::InvalidInput(_))
        ));
        assert!(matches!(
            t.service.create_profile("../x", &fields_for("x")),
            Err(IdentityError::InvalidInput(_))
        ));
        assert_eq!(t.keygen.generated(), 0);
    }

    #[test]
    fn concurrent_switches_leave_one_consistent_winner() {
        let dir = tempfile::tempdir().unwrap();
        let t = test_service(dir.path());
        t.service.create_profile("a", &fields_for("a")).unwrap();
        t.service.create_profile("b", &fields_for("b")).unwrap();
        let service = Arc::new(t.service);

        let handles: Vec<_> = ["a", "b"]
            .into_iter()
            .map(|name| {
                let service = service.clone();
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        service.switch_profile(name).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let winner = service.get_current_profile().unwrap().unwrap();
        assert!(winner == "a" || winner == "b");
        let profile = service.get_profile(&winner).unwrap();
        assert_eq!(
            std::fs::read(&t.locations.canonical_private_key).unwrap(),
            std::fs::read(&profile.private_key_path).unwrap()
        );
        assert_eq!(
            std::fs::read(&t.locations.canonical_public_key).unwrap(),
            std::fs::read(&profile.public_key_path).unwrap()
        );
        let gitconfig = std::fs::read_to_string(&t.locations.canonical_gitconfig).unwrap();
        assert!(gitconfig.contains(&format!("email = \"{winner}@example.com\"")));
    }

    #[test]
    fn clear_keeps_the_active_profile() {
        let dir = tempfile::tempdir().unwrap();
        let t = test_service(dir.path());
        for name in ["a", "b", "c"] {
            t.service.create_profile(name, &fields_for(name)).unwrap();
        }
        t.service.switch_profile("b").unwrap();

        let summary = t.service.clear_profiles().unwrap();

        assert_eq!(
            summary,
            ClearSummary {
                removed: vec!["a".to_string(), "c".to_string()],
                retained: Some("b".to_string()),
            }
        );
        assert_eq!(t.service.list_profiles().unwrap(), vec!["b"]);
        assert_eq!(t.service.get_current_profile().unwrap(), Some("b".to_string()));
    }

    #[test]
    fn clear_without_active_profile_removes_everything() {
        let dir = tempfile::tempdir().unwrap();
        let t = test_service(dir.path());
        t.service.create_profile("a", &fields_for("a")).unwrap();

        let summary = t.service.clear_profiles().unwrap();

        assert_eq!(summary.removed, vec!["a"]);
        assert_eq!(summary.retained, None);
        assert!(t.service.list_profiles().unwrap().is_empty());
    }

    #[test]
    fn clear_keeps_the_active_profile_even_when_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let t = test_service(dir.path());
        t.service.create_profile("a", &fields_for("a")).unwrap();
        t.service.create_profile("b", &fields_for("b")).unwrap();
        t.service.switch_profile("a").unwrap();
        let active_dir = t.locations.profiles_root.join("a");
        std::fs::write(active_dir.join("identity.json"), "{}").unwrap();

        let summary = t.service.clear_profiles().unwrap();

        assert_eq!(summary.removed, vec!["b"]);
        assert_eq!(summary.retained, Some("a".to_string()));
        assert!(active_dir.is_dir());
        assert!(!t.locations.profiles_root.join("b").exists());
    }

    #[test]
    fn mutations_sweep_files_left_by_an_interrupted_switch() {
        let dir = tempfile::tempdir().unwrap();
        let t = test_service(dir.path());
        t.service.create_profile("a", &fields_for("a")).unwrap();
        t.service.switch_profile("a").unwrap();
        let ssh_dir = t.locations.canonical_private_key.parent().unwrap();
        let leftover = ssh_dir.join(".keyswitch-backup-1a2b3c");
        std::fs::write(&leftover, "old key").unwrap();

        t.service.create_profile("b", &fields_for("b")).unwrap();

        assert!(!leftover.exists());
        assert_eq!(t.service.get_current_profile().unwrap(), Some("a".to_string()));
    }

    #[test]
    fn successful_mutations_are_announced() {
        let dir = tempfile::tempdir().unwrap();
        let t = test_service(dir.path());
        let events = t.service.subscribe();

        t.service.create_profile("a", &fields_for("a")).unwrap();
        t.service.create_profile("b", &fields_for("b")).unwrap();
        t.service.switch_profile("a").unwrap();
        t.service.remove_profile("a").unwrap_err();
        t.service.remove_profile("b").unwrap();
        t.service.clear_profiles().unwrap();

        let received: Vec<_> = events.try_iter().collect();
        assert_eq!(
            received,
            vec![
                ProfilesChanged::Created("a".to_string()),
                ProfilesChanged::Created("b".to_string()),
                ProfilesChanged::Switched("a".to_string()),
                ProfilesChanged::Removed("b".to_string()),
                ProfilesChanged::Cleared { removed: vec![] },
            ]
        );
    }

    #[test]
    fn failed_activation_keeps_previous_identity() {
        let dir = tempfile::tempdir().unwrap();
        let t = test_service(dir.path());
        t.service.create_profile("home", &fields_for("home")).unwrap();
        t.service.create_profile("work", &fields_for("work")).unwrap();
        t.service.switch_profile("home").unwrap();
        let key_before = std::fs::read(&t.locations.canonical_private_key).unwrap();
        t.git.fail_from_now_on(true);

        assert!(matches!(
            t.service.switch_profile("work"),
            Err(IdentityError::ActivationFailed(..))
        ));

        assert_eq!(t.service.get_current_profile().unwrap(), Some("home".to_string()));
        assert_eq!(
            std::fs::read(&t.locations.canonical_private_key).unwrap(),
            key_before
        );
    }

    #[test]
    fn token_presence_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let t = test_service(dir.path());
        let mut with_token = fields_for("a");
        with_token.token = Some("secret".to_string());
        t.service.create_profile("a", &with_token).unwrap();
        t.service.create_profile("b", &fields_for("b")).unwrap();

        assert_eq!(
            t.service.get_profile("a").unwrap().fields.token.as_deref(),
            Some("secret")
        );
        assert_eq!(t.service.get_profile("b").unwrap().fields.token, None);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn list_matches_created_names(names in prop::collection::btree_set("[a-z][a-z0-9-]{0,10}", 0..6)) {
            let dir = tempfile::tempdir().unwrap();
            let t = test_service(dir.path());
            for name in &names {
                t.service.create_profile(name, &fields_for(name)).unwrap();
            }

            let listed: BTreeSet<String> = t.service.list_profiles().unwrap().into_iter().collect();
            prop_assert_eq!(listed, names);
        }
    }
}
