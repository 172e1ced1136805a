//! Read-through caching of expensive lookups.
//!
//! A [`CacheStore`] maps string keys to JSON text. [`read_through`] returns
//! the stored value when one exists and otherwise computes, stores and
//! returns it. Stores are passed explicitly; nothing here is global.

use std::collections::HashMap;
use std::sync::Mutex;

use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::Site;

#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use sqlite::SqliteCacheStore;

/// Errors raised by a [`CacheStore`] backend.
#[derive(Debug, Error)]
pub enum CacheError {
    /// A thread panicked while holding the store lock.
    #[error("cache store lock was poisoned")]
    Poisoned,
    /// Opening the SQLite database failed.
    #[cfg(feature = "store-sqlite")]
    #[error("failed to open cache database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: std::path::PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Generic SQLite error when reading or writing entries.
    #[cfg(feature = "store-sqlite")]
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// Key-value storage for cached JSON payloads.
pub trait CacheStore {
    /// Return the payload stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`, replacing any previous payload.
    fn put(&self, key: &str, value: &str) -> Result<(), CacheError>;
}

/// Errors returned by [`read_through`].
#[derive(Debug, Error)]
pub enum ReadThroughError<E>
where
    E: std::error::Error + 'static,
{
    /// The store could not be read.
    #[error("failed to read cache entry {key:?}: {source}")]
    Read {
        /// Cache key.
        key: String,
        /// Backend failure.
        #[source]
        source: CacheError,
    },
    /// A stored payload could not be decoded.
    #[error("cache entry {key:?} holds invalid JSON: {source}")]
    Decode {
        /// Cache key.
        key: String,
        /// JSON decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// Computing the value on a miss failed.
    #[error(transparent)]
    Compute(E),
}

/// Return the cached value for `key`, computing and storing it on a miss.
///
/// Failing to encode or store a freshly computed value is logged and does not
/// fail the lookup.
///
/// # Errors
///
/// Returns [`ReadThroughError::Read`] when the store cannot be queried,
/// [`ReadThroughError::Decode`] when a stored payload is not valid JSON for
/// `T`, and [`ReadThroughError::Compute`] when `compute` fails.
///
/// # Examples
///
/// ```
/// use std::convert::Infallible;
/// use wellroute_core::cache::{MemoryCacheStore, read_through};
///
/// let store = MemoryCacheStore::default();
/// let first: Vec<u64> = read_through(&store, "k", || Ok::<_, Infallible>(vec![1, 2]))?;
/// let second: Vec<u64> = read_through(&store, "k", || Ok::<_, Infallible>(vec![9]))?;
/// assert_eq!(first, second);
/// # Ok::<(), wellroute_core::cache::ReadThroughError<Infallible>>(())
/// ```
pub fn read_through<S, T, E, F>(store: &S, key: &str, compute: F) -> Result<T, ReadThroughError<E>>
where
    S: CacheStore + ?Sized,
    T: Serialize + DeserializeOwned,
    E: std::error::Error + 'static,
    F: FnOnce() -> Result<T, E>,
{
    let cached = store.get(key).map_err(|source| ReadThroughError::Read {
        key: key.to_owned(),
        source,
    })?;
    if let Some(payload) = cached {
        debug!("cache hit for {key}");
        return serde_json::from_str(&payload).map_err(|source| ReadThroughError::Decode {
            key: key.to_owned(),
            source,
        });
    }

    debug!("cache miss for {key}");
    let value = compute().map_err(ReadThroughError::Compute)?;
    match serde_json::to_string(&value) {
        Ok(payload) => {
            if let Err(err) = store.put(key, &payload) {
                warn!("failed to store cache entry {key}: {err}");
            }
        }
        Err(err) => warn!("failed to encode cache entry {key}: {err}"),
    }
    Ok(value)
}

/// Cache key for the travel-time matrix between `sites`, in order.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use wellroute_core::Site;
/// use wellroute_core::cache::matrix_cache_key;
///
/// let sites = [
///     Site::new(0, "Home", Coord { x: 0.0, y: 0.0 }),
///     Site::new(1, "Well 1", Coord { x: 1.0, y: 1.0 }),
/// ];
/// assert_eq!(matrix_cache_key(&sites), "matrix:Home;Well 1");
/// ```
#[must_use]
pub fn matrix_cache_key(sites: &[Site]) -> String {
    let names: Vec<&str> = sites.iter().map(|site| site.name.as_str()).collect();
    format!("matrix:{}", names.join(";"))
}

/// Cache key for the site table stored under `route_name`.
#[must_use]
pub fn site_table_cache_key(route_name: &str) -> String {
    format!("sites:{route_name}")
}

/// In-process [`CacheStore`] backed by a hash map.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCacheStore {
    /// Number of stored entries.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Poisoned`] when the lock is poisoned.
    pub fn len(&self) -> Result<usize, CacheError> {
        self.entries
            .lock()
            .map(|entries| entries.len())
            .map_err(|_| CacheError::Poisoned)
    }

    /// Whether the store holds no entries.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Poisoned`] when the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, CacheError> {
        self.len().map(|len| len == 0)
    }
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
