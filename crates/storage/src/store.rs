//! SQLite grant store implementation.

use crate::{Error, GrantStore, Permission, Result, StoredGrant};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::debug;

/// SQLite-backed grant store.
pub struct SqliteGrantStore {
    conn: Connection,
}

impl SqliteGrantStore {
    /// Open or create a grant store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory grant store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS permissions (
                origin TEXT NOT NULL,
                type TEXT NOT NULL,
                permission INTEGER NOT NULL,
                modified_at TEXT NOT NULL,
                PRIMARY KEY (origin, type)
            );
            "#,
        )?;
        Ok(())
    }
}

impl GrantStore for SqliteGrantStore {
    fn add(&self, origin: &str, key: &str, permission: Permission) -> Result<()> {
        // Re-adding an identical grant leaves the row untouched.
        let changed = self.conn.execute(
            "INSERT INTO permissions (origin, type, permission, modified_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (origin, type) DO UPDATE
                SET permission = excluded.permission, modified_at = excluded.modified_at
                WHERE permission != excluded.permission",
            params![origin, key, permission.as_u32(), Utc::now().to_rfc3339()],
        )?;
        debug!(origin, key, changed, "grant upserted");
        Ok(())
    }

    fn get(&self, origin: &str, key: &str) -> Result<Option<Permission>> {
        let value: Option<u32> = self
            .conn
            .query_row(
                "SELECT permission FROM permissions WHERE origin = ?1 AND type = ?2",
                params![origin, key],
                |row| row.get(0),
            )
            .optional()?;

        value.map(Permission::from_u32).transpose()
    }

    fn list(&self) -> Result<Vec<StoredGrant>> {
        let mut stmt = self.conn.prepare(
            "SELECT origin, type, permission, modified_at FROM permissions
             ORDER BY origin, type",
        )?;

        let rows = stmt
            .query_map([], |row| {
                let origin: String = row.get(0)?;
                let key: String = row.get(1)?;
                let permission: u32 = row.get(2)?;
                let modified_at: String = row.get(3)?;
                Ok((origin, key, permission, modified_at))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(origin, key, permission, modified_at)| {
                Ok(StoredGrant {
                    origin,
                    key,
                    permission: Permission::from_u32(permission)?,
                    modified_at: modified_at
                        .parse()
                        .map_err(|e| Error::Corrupt(format!("bad timestamp: {e}")))?,
                })
            })
            .collect()
    }
}
