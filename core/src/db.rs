use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;

use crate::error::CoreError;
use crate::migrations::MIGRATIONS;

#[derive(Debug)]
pub struct StoreDb {
    pub path: PathBuf,
    pub conn: Connection,
}

/// Opens (and if necessary creates) the store, applying pragmas and any
/// pending migrations.
pub fn open_store(path: impl AsRef<Path>) -> Result<StoreDb, CoreError> {
    let path = path.as_ref().to_path_buf();
    let conn = Connection::open(&path)?;
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.execute_batch(
        "PRAGMA journal_mode = WAL; \
         PRAGMA synchronous = NORMAL; \
         PRAGMA foreign_keys = ON; \
         PRAGMA journal_size_limit = 67108864; \
         PRAGMA temp_store = MEMORY;",
    )?;
    apply_migrations(&conn)?;
    Ok(StoreDb { path, conn })
}

/// Like [`open_store`] but refuses to invent an empty store. Operator tooling
/// that mutates the store must never silently create a fresh database at a
/// mistyped path.
pub fn open_store_existing(path: impl AsRef<Path>) -> Result<StoreDb, CoreError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(CoreError::StoreUnavailable {
            path: path.to_path_buf(),
            reason: "database file not found".to_string(),
        });
    }
    open_store(path)
}

pub fn apply_migrations(conn: &Connection) -> Result<(), CoreError> {
    let current_version: i64 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let mut version = current_version as usize;
    for (idx, sql) in MIGRATIONS.iter().enumerate() {
        let next_version = idx + 1;
        if next_version <= version {
            continue;
        }
        conn.execute_batch(sql)?;
        conn.execute_batch(&format!("PRAGMA user_version = {};", next_version))?;
        version = next_version;
    }
    Ok(())
}
