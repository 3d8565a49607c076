//! Error types for the state layer.
//!
//! [`SettingsError`] never reaches callers of the settings store: it is handed
//! to the diagnostic sink. [`ProjectError`], [`ConfigError`] and
//! [`StateError`] are ordinary returned errors.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use pulsar_core::ProjectId;
use pulsar_storage::StorageError;

/// Why a call to a persistence backend did not complete.
#[derive(Debug, Error)]
pub enum PersistenceFailure {
    /// The backend returned an error.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The call did not finish within the configured timeout.
    #[error("timed out after {0:?}")]
    TimedOut(Duration),

    /// The blocking task running the call panicked or was cancelled.
    #[error("background task failed: {0}")]
    Aborted(String),
}

/// Settings synchronization failures, reported to the diagnostic sink.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Reading the persisted record failed; the in-memory value was kept.
    #[error("failed to load settings: {0}")]
    LoadFailed(#[source] PersistenceFailure),

    /// Persisting the record failed; the in-memory value keeps the change.
    #[error("failed to save settings: {0}")]
    SaveFailed(#[source] PersistenceFailure),
}

impl SettingsError {
    /// Short name of the failed operation, used as a log field.
    pub fn operation(&self) -> &'static str {
        match self {
            SettingsError::LoadFailed(_) => "load",
            SettingsError::SaveFailed(_) => "save",
        }
    }

    pub fn failure(&self) -> &PersistenceFailure {
        match self {
            SettingsError::LoadFailed(failure) | SettingsError::SaveFailed(failure) => failure,
        }
    }
}

/// Errors from project catalog operations.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// The directory has no `artisan` file.
    #[error("not a valid Laravel project: artisan file not found in {}", .path.display())]
    NotLaravelProject { path: PathBuf },

    #[error("project name must not be empty")]
    EmptyName,

    /// No project with this id is in the current project list.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    #[error("project registry: {0}")]
    Persistence(#[from] PersistenceFailure),
}

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name}='{value}': {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Errors building an [`AppState`](crate::state::AppState).
#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
