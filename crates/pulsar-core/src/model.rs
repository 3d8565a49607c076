//! Session data model: projects, snippets, and the small enums that drive
//! the layout and the log panel.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Implements `as_str`, `Display`, and `FromStr` for a fieldless enum whose
/// serde names are the lowercase variant names.
macro_rules! string_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// The stable lowercase name of this value.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok($ty::$variant),)+
                    _ => Err(CoreError::UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

pub(crate) use string_enum;

/// Opaque project identifier assigned by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub String);

impl ProjectId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        ProjectId(s.to_string())
    }
}

/// A user workspace the snippets run against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    /// Display name.
    pub name: String,
    /// Project root on disk.
    pub path: PathBuf,
}

/// A user-defined quick-access code entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub name: String,
    pub code: String,
}

/// Editor/output split orientation. UI only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Horizontal,
    Vertical,
}

impl Layout {
    /// The other orientation.
    pub fn toggled(self) -> Layout {
        match self {
            Layout::Horizontal => Layout::Vertical,
            Layout::Vertical => Layout::Horizontal,
        }
    }
}

string_enum!(Layout, "layout", {
    Horizontal => "horizontal",
    Vertical => "vertical",
});

/// Which panel the output area shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputTab {
    #[default]
    Tinker,
    Logs,
}

string_enum!(OutputTab, "output tab", {
    Tinker => "tinker",
    Logs => "logs",
});

/// Status of the external log tailer.
///
/// ```text
/// Idle -> Loading -> Tailing -> Idle
///            |          |
///            +-> Error <+
/// Error -> Loading | Idle
/// ```
///
/// The session store does not enforce these transitions; the tailer can check
/// its own moves with [`LogStatus::transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    #[default]
    Idle,
    Loading,
    Tailing,
    Error,
}

string_enum!(LogStatus, "log status", {
    Idle => "idle",
    Loading => "loading",
    Tailing => "tailing",
    Error => "error",
});

impl LogStatus {
    /// Whether the tailing state machine allows moving from `self` to `next`.
    pub fn can_transition_to(self, next: LogStatus) -> bool {
        use LogStatus::*;
        matches!(
            (self, next),
            (Idle, Loading)
                | (Loading, Tailing)
                | (Loading, Error)
                | (Tailing, Idle)
                | (Tailing, Error)
                | (Error, Loading)
                | (Error, Idle)
        )
    }

    /// Returns `next` if the move is allowed.
    pub fn transition(self, next: LogStatus) -> Result<LogStatus, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidLogTransition {
                from: self,
                to: next,
            })
        }
    }

    /// True when the log buffer holds output of the current or last stream.
    pub fn has_meaningful_logs(self) -> bool {
        matches!(self, LogStatus::Tailing | LogStatus::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_status_happy_path_is_allowed() {
        let status = LogStatus::default();
        let status = status.transition(LogStatus::Loading).unwrap();
        let status = status.transition(LogStatus::Tailing).unwrap();
        let status = status.transition(LogStatus::Idle).unwrap();
        assert_eq!(status, LogStatus::Idle);
    }

    #[test]
    fn log_status_error_recovers_by_retry_or_reset() {
        assert!(LogStatus::Tailing.can_transition_to(LogStatus::Error));
        assert!(LogStatus::Error.can_transition_to(LogStatus::Loading));
        assert!(LogStatus::Error.can_transition_to(LogStatus::Idle));
    }

    #[test]
    fn log_status_rejects_skipping_loading() {
        let err = LogStatus::Idle.transition(LogStatus::Tailing).unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidLogTransition {
                from: LogStatus::Idle,
                to: LogStatus::Tailing,
            }
        );
        assert_eq!(err.to_string(), "invalid log status transition: idle -> tailing");
    }

    #[test]
    fn meaningful_logs_only_while_tailing_or_failed() {
        assert!(!LogStatus::Idle.has_meaningful_logs());
        assert!(!LogStatus::Loading.has_meaningful_logs());
        assert!(LogStatus::Tailing.has_meaningful_logs());
        assert!(LogStatus::Error.has_meaningful_logs());
    }

    #[test]
    fn enums_parse_case_insensitively() {
        assert_eq!("Vertical".parse::<Layout>().unwrap(), Layout::Vertical);
        assert_eq!(" logs ".parse::<OutputTab>().unwrap(), OutputTab::Logs);
        assert_eq!("TAILING".parse::<LogStatus>().unwrap(), LogStatus::Tailing);

        let err = "diagonal".parse::<Layout>().unwrap_err();
        assert_eq!(err.to_string(), "unknown layout: 'diagonal'");
    }

    #[test]
    fn layout_toggles() {
        assert_eq!(Layout::Horizontal.toggled(), Layout::Vertical);
        assert_eq!(Layout::Vertical.toggled(), Layout::Horizontal);
    }

    #[test]
    fn enums_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&LogStatus::Loading).unwrap(), "\"loading\"");
        assert_eq!(serde_json::to_string(&OutputTab::Tinker).unwrap(), "\"tinker\"");
        let project = Project {
            id: ProjectId::from("42"),
            name: "shop".into(),
            path: PathBuf::from("/srv/shop"),
        };
        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["id"], "42");
    }
}
