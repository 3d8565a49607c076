//! Diagnostic sink for settings persistence failures.
//!
//! Load and save failures are absorbed by the settings store and only show up
//! here. [`TracingSink`] turns them into structured log events;
//! [`MemorySink`] keeps them for callers that need to react (tests, the CLI's
//! exit code).

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::SettingsError;

/// Receives every absorbed [`SettingsError`].
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, error: &SettingsError);
}

/// Which settings operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    LoadFailed,
    SaveFailed,
}

/// A recorded failure with its rendered message, source detail included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl From<&SettingsError> for Diagnostic {
    fn from(error: &SettingsError) -> Self {
        let kind = match error {
            SettingsError::LoadFailed(_) => DiagnosticKind::LoadFailed,
            SettingsError::SaveFailed(_) => DiagnosticKind::SaveFailed,
        };
        Diagnostic {
            kind,
            message: error.to_string(),
        }
    }
}

/// Emits a `tracing` error event per failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, error: &SettingsError) {
        tracing::error!(
            operation = error.operation(),
            error = %error.failure(),
            "settings persistence failed"
        );
    }
}

/// Keeps failures in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        MemorySink::default()
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    /// Returns and clears the recorded failures.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.lock().iter().filter(|d| d.kind == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&self, error: &SettingsError) {
        self.lock().push(Diagnostic::from(error));
    }
}

/// Forwards each failure to several sinks, in order.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn DiagnosticSink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Arc<dyn DiagnosticSink>>) -> Self {
        FanoutSink { sinks }
    }
}

impl DiagnosticSink for FanoutSink {
    fn record(&self, error: &SettingsError) {
        for sink in &self.sinks {
            sink.record(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PersistenceFailure;
    use pulsar_storage::StorageError;

    fn save_failed() -> SettingsError {
        SettingsError::SaveFailed(PersistenceFailure::Storage(StorageError::Unavailable {
            reason: "disk full".into(),
        }))
    }

    #[test]
    fn test_memory_sink_keeps_kind_and_detail() {
        let sink = MemorySink::new();
        sink.record(&save_failed());

        let entries = sink.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, DiagnosticKind::SaveFailed);
        assert_eq!(
            entries[0].message,
            "failed to save settings: storage unavailable: disk full"
        );
        assert_eq!(sink.count(DiagnosticKind::LoadFailed), 0);

        assert_eq!(sink.take().len(), 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_fanout_reaches_every_sink() {
        let a = Arc::new(MemorySink::new());
        let b = Arc::new(MemorySink::new());
        let sinks: Vec<Arc<dyn DiagnosticSink>> = vec![a.clone(), b.clone(), Arc::new(TracingSink)];
        let fanout = FanoutSink::new(sinks);

        fanout.record(&save_failed());
        assert_eq!(a.count(DiagnosticKind::SaveFailed), 1);
        assert_eq!(b.count(DiagnosticKind::SaveFailed), 1);
    }
}
