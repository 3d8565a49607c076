//! Presentation boundary: the visual root that shows the theme.
//!
//! The settings store only needs one effect from the UI, turning light mode on
//! or off. [`Presentation`] holds the currently attached [`VisualRoot`], if
//! any; applying a theme with nothing attached does nothing.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use pulsar_core::Theme;

/// The active visual root (window, document root, terminal palette...).
pub trait VisualRoot: Send + Sync {
    fn set_light_mode(&self, light: bool);
}

/// Slot for the visual root, shared between the settings store and the UI.
#[derive(Default)]
pub struct Presentation {
    root: RwLock<Option<Arc<dyn VisualRoot>>>,
}

impl Presentation {
    pub fn new() -> Self {
        Presentation::default()
    }

    pub fn with_root(root: Arc<dyn VisualRoot>) -> Self {
        Presentation {
            root: RwLock::new(Some(root)),
        }
    }

    /// Attaches `root`, replacing any previous one. Does not apply a theme;
    /// see `SettingsStore::attach_visual_root`.
    pub fn attach(&self, root: Arc<dyn VisualRoot>) {
        *self.root.write().unwrap_or_else(PoisonError::into_inner) = Some(root);
    }

    /// Detaches and returns the current root.
    pub fn detach(&self) -> Option<Arc<dyn VisualRoot>> {
        self.root
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn has_root(&self) -> bool {
        self.current().is_some()
    }

    /// Sets light mode on the attached root to match `theme`.
    pub fn apply_theme(&self, theme: Theme) {
        if let Some(root) = self.current() {
            root.set_light_mode(theme == Theme::Light);
        }
    }

    // Cloned out so the root is called without holding the lock.
    fn current(&self) -> Option<Arc<dyn VisualRoot>> {
        self.root
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl std::fmt::Debug for Presentation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Presentation")
            .field("has_root", &self.has_root())
            .finish()
    }
}

/// Headless visual root: a light-mode flag plus a count of how often it
/// was set.
#[derive(Debug, Default)]
pub struct LightModeFlag {
    light: AtomicBool,
    applied: AtomicUsize,
}

impl LightModeFlag {
    pub fn new() -> Self {
        LightModeFlag::default()
    }

    pub fn is_light(&self) -> bool {
        self.light.load(Ordering::SeqCst)
    }

    /// Number of `set_light_mode` calls received.
    pub fn apply_count(&self) -> usize {
        self.applied.load(Ordering::SeqCst)
    }
}

impl VisualRoot for LightModeFlag {
    fn set_light_mode(&self, light: bool) {
        self.light.store(light, Ordering::SeqCst);
        self.applied.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_without_root_is_noop() {
        let presentation = Presentation::new();
        assert!(!presentation.has_root());
        presentation.apply_theme(Theme::Light);
    }

    #[test]
    fn test_apply_sets_flag() {
        let flag = Arc::new(LightModeFlag::new());
        let presentation = Presentation::with_root(flag.clone());

        presentation.apply_theme(Theme::Light);
        assert!(flag.is_light());
        presentation.apply_theme(Theme::Dark);
        assert!(!flag.is_light());
        assert_eq!(flag.apply_count(), 2);
    }

    #[test]
    fn test_detach_stops_updates() {
        let flag = Arc::new(LightModeFlag::new());
        let presentation = Presentation::new();
        presentation.attach(flag.clone());
        assert!(presentation.detach().is_some());

        presentation.apply_theme(Theme::Light);
        assert!(!flag.is_light());
        assert_eq!(flag.apply_count(), 0);
    }
}
