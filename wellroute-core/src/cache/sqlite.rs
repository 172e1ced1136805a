//! SQLite-backed cache store.

use std::{fmt, path::Path, sync::Mutex};

use rusqlite::{Connection, OptionalExtension, params};

use super::{CacheError, CacheStore};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS route_cache (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)";

/// Cache store persisting entries in a single SQLite table.
///
/// The `route_cache(key, value)` table is created on open if missing.
pub struct SqliteCacheStore {
    connection: Mutex<Connection>,
}

impl fmt::Debug for SqliteCacheStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteCacheStore").finish_non_exhaustive()
    }
}

impl SqliteCacheStore {
    /// Open (or create) a cache database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::OpenDatabase`] when the file cannot be opened and
    /// [`CacheError::Database`] when the table cannot be created.
    pub fn open<P>(path: P) -> Result<Self, CacheError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let connection = Connection::open(path).map_err(|source| CacheError::OpenDatabase {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(connection)
    }

    /// Open a private in-memory cache database.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Database`] when SQLite cannot initialise.
    pub fn open_in_memory() -> Result<Self, CacheError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(connection: Connection) -> Result<Self, CacheError> {
        connection.execute(CREATE_TABLE, [])?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }
}

impl CacheStore for SqliteCacheStore {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let connection = self.connection.lock().map_err(|_| CacheError::Poisoned)?;
        let value = connection
            .query_row(
                "SELECT value FROM route_cache WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let connection = self.connection.lock().map_err(|_| CacheError::Poisoned)?;
        connection.execute(
            "INSERT INTO route_cache (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}
