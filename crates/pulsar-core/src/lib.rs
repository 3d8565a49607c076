//! Reactive state primitives and data model for the Pulsar tinker client.
//!
//! - [`cell`]: the observable [`Cell`] every store is built from
//! - [`model`]: projects, snippets, layout and log status enums
//! - [`settings`]: the persisted settings record and its merge rules
//! - [`session`]: the volatile [`SessionState`] store

pub mod cell;
pub mod error;
pub mod model;
pub mod session;
pub mod settings;

// Re-export commonly used types
pub use cell::{Cell, Subscription};
pub use error::CoreError;
pub use model::{Layout, LogStatus, OutputTab, Project, ProjectId, Snippet};
pub use session::{SessionState, DEFAULT_CODE};
pub use settings::{Settings, SettingsPatch, Theme};
