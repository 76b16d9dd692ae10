pub mod schema;
mod sqlite;

use std::collections::HashMap;

use crate::domain::{Album, Collection};
use crate::error::{Error, Result};

pub use sqlite::SqliteStore;

/// Key under which the album collection is stored.
pub const ALBUMS_KEY: &str = "photoAlbums";

/// Roughly what browsers allow a single origin in `localStorage`.
pub const LOCAL_STORAGE_QUOTA: usize = 5 * 1024 * 1024;

/// A flat string-to-string store. Each `set` replaces the whole value
/// atomically: readers see either the old value or the new one.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
    fn keys(&self) -> Result<Vec<String>>;
}

/// In-process store, optionally capped to a byte quota.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(quota),
        }
    }

    fn used_excluding(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(quota) = self.quota {
            let requested = self.used_excluding(key) + key.len() + value.len();
            if requested > quota {
                return Err(Error::QuotaExceeded { requested, quota });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

/// Result of reading the stored collection. `warning` is set when the stored
/// payload could not be read and the session fell back to an empty collection.
#[derive(Debug)]
pub struct Loaded {
    pub albums: Collection,
    pub warning: Option<Error>,
}

/// Reads and writes the full album collection as one JSON document under
/// [`ALBUMS_KEY`]. Every save overwrites the previous snapshot.
pub struct SnapshotStore<S> {
    backend: S,
}

impl<S: KeyValueStore> SnapshotStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn load(&self) -> Loaded {
        let raw = match self.backend.get(ALBUMS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                return Loaded {
                    albums: Vec::new(),
                    warning: None,
                }
            }
            Err(err) => {
                log::warn!("failed to read album snapshot: {}", err);
                return Loaded {
                    albums: Vec::new(),
                    warning: Some(err),
                };
            }
        };

        match serde_json::from_str::<Collection>(&raw) {
            Ok(albums) => Loaded {
                albums,
                warning: None,
            },
            Err(err) => {
                log::warn!("album snapshot is corrupt, starting empty: {}", err);
                Loaded {
                    albums: Vec::new(),
                    warning: Some(Error::Parse(err)),
                }
            }
        }
    }

    pub fn save(&mut self, albums: &[Album]) -> Result<()> {
        let raw = serde_json::to_string(albums).map_err(|e| Error::persistence(e.into()))?;
        self.backend
            .set(ALBUMS_KEY, &raw)
            .map_err(Error::persistence)?;
        log::debug!("saved {} albums ({} bytes)", albums.len(), raw.len());
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.backend.remove(ALBUMS_KEY).map_err(Error::persistence)
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }
}
