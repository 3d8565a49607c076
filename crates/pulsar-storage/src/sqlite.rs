//! SQLite implementation of the storage traits.
//!
//! [`SqliteStore`] keeps the settings record as one JSON row and registered
//! projects in their own table. The connection sits behind a mutex so the
//! store can be shared with the blocking threads the state layer uses.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use pulsar_core::{Project, ProjectId, Settings, SettingsPatch};

use crate::convert::{decode_settings, encode_settings, path_text};
use crate::error::StorageError;
use crate::traits::{ProjectRegistry, SettingsBackend};

/// SQLite-backed implementation of [`SettingsBackend`] and [`ProjectRegistry`].
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SettingsBackend for SqliteStore {
    fn load_settings(&self) -> Result<SettingsPatch, StorageError> {
        let body: Option<String> = self
            .conn()
            .query_row("SELECT body FROM settings WHERE id = 1", [], |row| row.get(0))
            .optional()?;

        match body {
            Some(body) => decode_settings(&body),
            None => Ok(SettingsPatch::default()),
        }
    }

    fn save_settings(&self, settings: &Settings) -> Result<(), StorageError> {
        let body = encode_settings(settings)?;
        self.conn().execute(
            "INSERT INTO settings (id, body) VALUES (1, ?1)
             ON CONFLICT(id) DO UPDATE SET
                 body = excluded.body,
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
            params![body],
        )?;
        Ok(())
    }
}

impl ProjectRegistry for SqliteStore {
    fn list_projects(&self) -> Result<Vec<Project>, StorageError> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT id, name, path FROM projects ORDER BY seq ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok(Project {
                id: ProjectId(row.get(0)?),
                name: row.get(1)?,
                path: PathBuf::from(row.get::<_, String>(2)?),
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn add_project(&self, name: &str, path: &Path) -> Result<Project, StorageError> {
        let stored_path = path_text(path)?;
        let project = Project {
            id: ProjectId(Uuid::new_v4().to_string()),
            name: name.to_string(),
            path: path.to_path_buf(),
        };
        self.conn().execute(
            "INSERT INTO projects (id, name, path) VALUES (?1, ?2, ?3)",
            params![project.id.as_str(), project.name, stored_path],
        )?;
        Ok(project)
    }

    fn remove_project(&self, id: &ProjectId) -> Result<(), StorageError> {
        self.conn()
            .execute("DELETE FROM projects WHERE id = ?1", params![id.as_str()])?;
        Ok(())
    }
}
