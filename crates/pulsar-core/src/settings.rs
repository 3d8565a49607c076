//! The persisted user settings record and its merge rules.
//!
//! [`Settings`] is always total: every known field has a value, and keys this
//! version does not know about are kept in [`Settings::extra`] so they survive
//! a load/save round trip. [`SettingsPatch`] is the partial shape used both
//! for `save` arguments and for records read back from persistence.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::model::string_enum;

/// Serialized names of the fields [`Settings`] models explicitly.
pub const KNOWN_KEYS: [&str; 2] = ["theme", "phpPath"];

/// Visual theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

string_enum!(Theme, "theme", {
    Dark => "dark",
    Light => "light",
});

/// The complete settings record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub theme: Theme,
    /// PHP interpreter used to run tinker. Empty means "php" on PATH.
    pub php_path: String,
    /// Keys not modelled above, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            theme: Theme::Dark,
            php_path: String::new(),
            extra: Map::new(),
        }
    }
}

impl Settings {
    /// Builds a total record from a (possibly partial) persisted one by
    /// overlaying it onto the defaults.
    pub fn from_persisted(record: SettingsPatch) -> Settings {
        Settings::default().merge(record)
    }

    /// Overlays `patch` onto `self` field by field. Fields the patch leaves
    /// out keep their current value; extra keys are added or replaced.
    pub fn merge(&self, patch: SettingsPatch) -> Settings {
        let mut extra = self.extra.clone();
        extra.extend(
            patch
                .extra
                .into_iter()
                .filter(|(key, _)| !KNOWN_KEYS.contains(&key.as_str())),
        );
        Settings {
            theme: patch.theme.unwrap_or(self.theme),
            php_path: patch.php_path.unwrap_or_else(|| self.php_path.clone()),
            extra,
        }
    }

    pub fn is_light(&self) -> bool {
        self.theme == Theme::Light
    }
}

/// A partial settings record. `None` fields are left unchanged by a merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub php_path: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SettingsPatch {
    pub fn new() -> Self {
        SettingsPatch::default()
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn with_php_path(mut self, php_path: impl Into<String>) -> Self {
        self.php_path = Some(php_path.into());
        self
    }

    /// Sets an unmodelled key. Known keys are ignored here; use the typed
    /// setters for those.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if !KNOWN_KEYS.contains(&key.as_str()) {
            self.extra.insert(key, value);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.theme.is_none() && self.php_path.is_none() && self.extra.is_empty()
    }
}

impl From<Settings> for SettingsPatch {
    fn from(settings: Settings) -> Self {
        SettingsPatch {
            theme: Some(settings.theme),
            php_path: Some(settings.php_path),
            extra: settings.extra,
        }
    }
}
