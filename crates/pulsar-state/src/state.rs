//! Application state container.
//!
//! [`AppState`] owns the one session store and the one settings store of the
//! process and is handed, by clone, to whatever needs them. Nothing here is
//! global.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use pulsar_core::SessionState;
use pulsar_storage::{InMemoryStore, ProjectRegistry, SettingsBackend, SqliteStore};

use crate::config::StateConfig;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::StateError;
use crate::presentation::Presentation;
use crate::projects::ProjectCatalog;
use crate::settings_store::SettingsStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Volatile session cells.
    pub session: SessionState,
    /// Persisted settings with theme side effect.
    pub settings: Arc<SettingsStore>,
    /// Project list synchronization.
    pub projects: Arc<ProjectCatalog>,
    /// Visual root slot shared with `settings`.
    pub presentation: Arc<Presentation>,
}

impl AppState {
    /// Creates an `AppState` backed by the SQLite database in `config`,
    /// logging persistence failures through `tracing`.
    pub fn new(config: &StateConfig) -> Result<Self, StateError> {
        Self::with_diagnostics(config, Arc::new(TracingSink))
    }

    /// Like [`AppState::new`] with a custom diagnostic sink.
    pub fn with_diagnostics(
        config: &StateConfig,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Result<Self, StateError> {
        let store = Arc::new(SqliteStore::new(&config.db_path)?);
        Ok(Self::with_backends(
            store.clone(),
            store,
            diagnostics,
            config.persist_timeout,
        ))
    }

    /// Creates an `AppState` with in-memory persistence (for testing).
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::with_backends(store.clone(), store, Arc::new(TracingSink), None)
    }

    /// Wires the stores to explicit backends.
    pub fn with_backends(
        settings_backend: Arc<dyn SettingsBackend>,
        registry: Arc<dyn ProjectRegistry>,
        diagnostics: Arc<dyn DiagnosticSink>,
        persist_timeout: Option<Duration>,
    ) -> Self {
        let session = SessionState::new();
        let presentation = Arc::new(Presentation::new());
        let settings = SettingsStore::new(settings_backend, Arc::clone(&presentation), diagnostics)
            .with_persist_timeout(persist_timeout);
        let projects =
            ProjectCatalog::new(registry, &session).with_persist_timeout(persist_timeout);

        AppState {
            session,
            settings: Arc::new(settings),
            projects: Arc::new(projects),
            presentation,
        }
    }

    /// Startup sync: loads settings and the project list.
    ///
    /// Settings failures are absorbed by the store; a project list failure is
    /// logged and leaves the list empty.
    pub async fn initialize(&self) {
        self.settings.load().await;
        if let Err(err) = self.projects.refresh().await {
            warn!(error = %err, "failed to load project list");
        }
    }
}
