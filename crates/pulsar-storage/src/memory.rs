//! In-memory implementation of the storage traits.
//!
//! [`InMemoryStore`] is a first-class backend for tests and for running the
//! client without a database. Settings are kept as encoded JSON text so that
//! decoding behaves exactly as it does for the SQLite backend.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use pulsar_core::{Project, ProjectId, Settings, SettingsPatch};

use crate::convert::{decode_settings, encode_settings, path_text};
use crate::error::StorageError;
use crate::traits::{ProjectRegistry, SettingsBackend};

#[derive(Debug, Default)]
struct Inner {
    /// Encoded settings body, `None` until the first save.
    settings: Option<String>,
    projects: Vec<Project>,
    /// When set, every call fails with `StorageError::Unavailable`.
    offline: Option<String>,
}

/// Mutex-protected in-memory backend.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore::default()
    }

    /// Creates a store whose persisted settings body is `body`, verbatim.
    ///
    /// Useful to model records written by other versions, including partial
    /// or corrupt ones.
    pub fn with_settings_body(body: impl Into<String>) -> Self {
        let store = InMemoryStore::new();
        store.lock().settings = Some(body.into());
        store
    }

    /// Makes every subsequent call fail as if the backend were unreachable,
    /// or restores it with `None`.
    pub fn set_offline(&self, reason: Option<&str>) {
        self.lock().offline = reason.map(str::to_string);
    }

    /// The raw stored settings body, if any.
    pub fn settings_body(&self) -> Option<String> {
        self.lock().settings.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Locks the store, failing if it was taken offline.
    fn online(&self) -> Result<MutexGuard<'_, Inner>, StorageError> {
        let guard = self.lock();
        if let Some(reason) = &guard.offline {
            return Err(StorageError::Unavailable {
                reason: reason.clone(),
            });
        }
        Ok(guard)
    }
}

impl SettingsBackend for InMemoryStore {
    fn load_settings(&self) -> Result<SettingsPatch, StorageError> {
        match &self.online()?.settings {
            Some(body) => decode_settings(body),
            None => Ok(SettingsPatch::default()),
        }
    }

    fn save_settings(&self, settings: &Settings) -> Result<(), StorageError> {
        let body = encode_settings(settings)?;
        self.online()?.settings = Some(body);
        Ok(())
    }
}

impl ProjectRegistry for InMemoryStore {
    fn list_projects(&self) -> Result<Vec<Project>, StorageError> {
        Ok(self.online()?.projects.clone())
    }

    fn add_project(&self, name: &str, path: &Path) -> Result<Project, StorageError> {
        path_text(path)?;
        let project = Project {
            id: ProjectId(Uuid::new_v4().to_string()),
            name: name.to_string(),
            path: path.to_path_buf(),
        };
        self.online()?.projects.push(project.clone());
        Ok(project)
    }

    fn remove_project(&self, id: &ProjectId) -> Result<(), StorageError> {
        self.online()?.projects.retain(|p| &p.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsar_core::Theme;

    #[test]
    fn test_load_without_saved_settings_is_empty_patch() {
        let store = InMemoryStore::new();
        assert!(store.load_settings().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let store = InMemoryStore::new();
        let settings = Settings::default().merge(
            SettingsPatch::new()
                .with_theme(Theme::Light)
                .with_php_path("/usr/bin/php"),
        );
        store.save_settings(&settings).unwrap();

        let loaded = Settings::from_persisted(store.load_settings().unwrap());
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_seeded_partial_body() {
        let store = InMemoryStore::with_settings_body(r#"{"theme":"light"}"#);
        let patch = store.load_settings().unwrap();
        assert_eq!(patch.theme, Some(Theme::Light));
        assert!(patch.php_path.is_none());
    }

    #[test]
    fn test_offline_store_fails_every_call() {
        let store = InMemoryStore::new();
        store.set_offline(Some("host process gone"));

        let err = store.load_settings().unwrap_err();
        assert_eq!(err.to_string(), "storage unavailable: host process gone");
        assert!(store.save_settings(&Settings::default()).is_err());
        assert!(store.list_projects().is_err());
        assert!(store.settings_body().is_none());

        store.set_offline(None);
        assert!(store.load_settings().is_ok());
    }

    #[test]
    fn test_projects_keep_insertion_order() {
        let store = InMemoryStore::new();
        let a = store.add_project("a", Path::new("/srv/a")).unwrap();
        let b = store.add_project("b", Path::new("/srv/b")).unwrap();
        assert_ne!(a.id, b.id);

        let names: Vec<_> = store.list_projects().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["a", "b"]);

        store.remove_project(&a.id).unwrap();
        store.remove_project(&ProjectId::from("missing")).unwrap();
        assert_eq!(store.list_projects().unwrap(), vec![b]);
    }
}
