//! State coordination layer of the Pulsar tinker client.
//!
//! Ties the volatile [`SessionState`](pulsar_core::SessionState) and the
//! persisted [`SettingsStore`] together behind one [`AppState`], and connects
//! them to their boundaries: the storage backends, the visual root, and the
//! diagnostic sink.

mod blocking;

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod presentation;
pub mod projects;
pub mod settings_store;
pub mod state;

pub use config::StateConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, FanoutSink, MemorySink, TracingSink};
pub use error::{ConfigError, PersistenceFailure, ProjectError, SettingsError, StateError};
pub use presentation::{LightModeFlag, Presentation, VisualRoot};
pub use projects::ProjectCatalog;
pub use settings_store::SettingsStore;
pub use state::AppState;
