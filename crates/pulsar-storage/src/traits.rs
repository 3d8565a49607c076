//! Persistence contracts consumed by the state layer.
//!
//! [`SettingsBackend`] is the settings boundary (`GetSettings` /
//! `UpdateSettings`); [`ProjectRegistry`] is the host's list of registered
//! projects. Both are synchronous, like the rest of the storage layer; async
//! callers run them on a blocking thread. All backends (InMemoryStore,
//! SqliteStore) implement both and are swappable.

use std::path::Path;

use pulsar_core::{Project, ProjectId, Settings, SettingsPatch};

use crate::error::StorageError;

/// Durable home of the settings record.
pub trait SettingsBackend: Send + Sync {
    /// Reads the stored record.
    ///
    /// The record may omit keys (older versions, hand edits); callers merge it
    /// over the defaults. Returns an empty patch when nothing was stored yet.
    fn load_settings(&self) -> Result<SettingsPatch, StorageError>;

    /// Replaces the stored record with `settings`, unknown keys included.
    fn save_settings(&self, settings: &Settings) -> Result<(), StorageError>;
}

/// The host's registry of projects.
pub trait ProjectRegistry: Send + Sync {
    /// All registered projects, oldest first.
    fn list_projects(&self) -> Result<Vec<Project>, StorageError>;

    /// Registers a project and returns it with its newly assigned id.
    fn add_project(&self, name: &str, path: &Path) -> Result<Project, StorageError>;

    /// Unregisters a project. Unknown ids are ignored.
    fn remove_project(&self, id: &ProjectId) -> Result<(), StorageError>;
}
