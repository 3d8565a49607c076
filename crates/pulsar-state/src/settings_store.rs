//! The settings store: one [`Settings`] record kept in sync with a
//! [`SettingsBackend`] and mirrored onto the visual root.
//!
//! # Policy
//!
//! - Every replacement of the value (`load`, `save`, `set`, `update`) applies
//!   the theme exactly once, synchronously, before any other subscriber runs.
//! - `save` is optimistic: the merged record is visible immediately and is not
//!   rolled back if persisting it fails.
//! - Load and save failures are never returned. They go to the
//!   [`DiagnosticSink`] and the UI keeps working with what it has.
//! - Persistence calls run one at a time, in call order, including calls that
//!   timed out and are still running. A `load` that finishes after the value
//!   was replaced by anything else is discarded.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use pulsar_core::{Cell, Settings, SettingsPatch, Subscription};
use pulsar_storage::SettingsBackend;

use crate::blocking::run_blocking_holding;
use crate::diagnostics::DiagnosticSink;
use crate::error::SettingsError;
use crate::presentation::{Presentation, VisualRoot};

pub struct SettingsStore {
    value: Cell<Settings>,
    backend: Arc<dyn SettingsBackend>,
    presentation: Arc<Presentation>,
    diagnostics: Arc<dyn DiagnosticSink>,
    persist_timeout: Option<Duration>,
    /// Held until each persistence call returns. tokio's mutex is FIFO.
    sync: Arc<tokio::sync::Mutex<()>>,
    _theme: Subscription<Settings>,
}

impl SettingsStore {
    /// Creates a store holding the defaults and applies their theme.
    pub fn new(
        backend: Arc<dyn SettingsBackend>,
        presentation: Arc<Presentation>,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Self {
        let value = Cell::new(Settings::default());

        // Registered first, so the theme is in place before consumers hear
        // about the new value.
        let theme = {
            let presentation = Arc::clone(&presentation);
            value.subscribe(move |settings: &Settings| presentation.apply_theme(settings.theme))
        };
        presentation.apply_theme(value.with(|s| s.theme));

        SettingsStore {
            value,
            backend,
            presentation,
            diagnostics,
            persist_timeout: None,
            sync: Arc::new(tokio::sync::Mutex::new(())),
            _theme: theme,
        }
    }

    /// Bounds every persistence call. `None` waits indefinitely.
    pub fn with_persist_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.persist_timeout = timeout;
        self
    }

    pub fn get(&self) -> Settings {
        self.value.get()
    }

    /// The underlying cell, for consumers that take a `Cell<Settings>`.
    pub fn cell(&self) -> &Cell<Settings> {
        &self.value
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription<Settings>
    where
        F: Fn(&Settings) + Send + Sync + 'static,
    {
        self.value.subscribe(listener)
    }

    /// Replaces the value without persisting it.
    pub fn set(&self, settings: Settings) {
        self.value.set(settings);
    }

    /// Transforms the value without persisting it.
    pub fn update(&self, f: impl FnOnce(&Settings) -> Settings) {
        self.value.update(f);
    }

    pub fn presentation(&self) -> &Arc<Presentation> {
        &self.presentation
    }

    /// Attaches a visual root and brings it in line with the current theme.
    pub fn attach_visual_root(&self, root: Arc<dyn VisualRoot>) {
        self.presentation.attach(root);
        self.presentation.apply_theme(self.value.with(|s| s.theme));
    }

    pub fn detach_visual_root(&self) -> Option<Arc<dyn VisualRoot>> {
        self.presentation.detach()
    }

    /// Reads the persisted record and makes it the current value, merged over
    /// the defaults.
    ///
    /// On failure the current value is left as is and a
    /// [`SettingsError::LoadFailed`] is recorded.
    pub async fn load(&self) {
        let started_at = self.value.version();
        let turn = Arc::clone(&self.sync).lock_owned().await;

        let backend = Arc::clone(&self.backend);
        let loaded =
            run_blocking_holding(self.persist_timeout, turn, move || backend.load_settings());
        match loaded.await {
            Ok(record) => {
                let settings = Settings::from_persisted(record);
                let theme = settings.theme;
                if self.value.replace_if_version(started_at, settings) {
                    info!(%theme, "settings loaded");
                } else {
                    debug!("discarding loaded settings: value changed while loading");
                }
            }
            Err(failure) => self.diagnostics.record(&SettingsError::LoadFailed(failure)),
        }
    }

    /// Merges `patch` over the current value, publishes the result, then
    /// persists it.
    ///
    /// The new value stays in place even if persisting fails; the failure is
    /// recorded as [`SettingsError::SaveFailed`].
    pub async fn save(&self, patch: SettingsPatch) {
        let merged = self.value.with(|current| current.merge(patch));
        self.value.set(merged.clone());

        let turn = Arc::clone(&self.sync).lock_owned().await;
        let backend = Arc::clone(&self.backend);
        let theme = merged.theme;
        let persisted = run_blocking_holding(self.persist_timeout, turn, move || {
            backend.save_settings(&merged)
        });
        match persisted.await {
            Ok(()) => info!(%theme, "settings saved"),
            Err(failure) => self.diagnostics.record(&SettingsError::SaveFailed(failure)),
        }
    }
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("value", &self.value)
            .field("persist_timeout", &self.persist_timeout)
            .finish()
    }
}
