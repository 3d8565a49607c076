//! Persistence backends for the Pulsar state layer.
//!
//! Provides the [`SettingsBackend`] and [`ProjectRegistry`] traits the state
//! layer talks to, plus the [`InMemoryStore`] and [`SqliteStore`] backends.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`traits`]: the persistence contracts
//! - [`convert`]: settings record encoding
//! - [`memory`]: InMemoryStore implementation
//! - [`schema`]: migrations and connection setup
//! - [`sqlite`]: SqliteStore implementation

pub mod convert;
pub mod error;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;

// Re-export key types for ergonomic use.
pub use error::StorageError;
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{ProjectRegistry, SettingsBackend};
