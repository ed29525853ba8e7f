//! Local list persistence
//!
//! Each user list (favorites, watchlist, recent searches) is one JSON-encoded array stored
//! under its own key. There is no indexing, no migration and no locking across
//! read-modify-write cycles: two writers racing on the same key resolve as last write wins.

use std::collections::HashMap;
use std::fmt::Display;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;

use crate::error::StoreResult;

pub mod file;
pub mod redis;

pub use self::file::FileStore;
pub use self::redis::{create_redis_client, RedisStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKey {
    Favorites,
    Watchlist,
    RecentSearches,
}

impl Display for ListKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListKey::Favorites => write!(f, "FavoriteMovies"),
            ListKey::Watchlist => write!(f, "WatchlistMovies"),
            ListKey::RecentSearches => write!(f, "RecentSearches"),
        }
    }
}

/// Key-value storage for small serialized blobs
#[async_trait::async_trait]
pub trait ListStore: Send + Sync {
    async fn get(&self, key: ListKey) -> StoreResult<Option<Vec<u8>>>;

    async fn set(&self, key: ListKey, value: Vec<u8>) -> StoreResult<()>;

    async fn remove(&self, key: ListKey) -> StoreResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Loads a persisted list, degrading to an empty list when it is missing, unreadable or corrupt
pub async fn load_list<T: DeserializeOwned>(store: &dyn ListStore, key: ListKey) -> Vec<T> {
    match try_load_list(store, key).await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, key = %key, store = store.name(), "Failed to read list");
            Vec::new()
        }
    }
}

/// Loads a persisted list for a read-modify-write cycle
///
/// Missing or corrupt data reads as empty, but a failed read is an error: rewriting the list
/// from an empty base would drop every stored entry.
pub async fn try_load_list<T: DeserializeOwned>(
    store: &dyn ListStore,
    key: ListKey,
) -> StoreResult<Vec<T>> {
    let Some(bytes) = store.get(key).await? else {
        return Ok(Vec::new());
    };

    match serde_json::from_slice(&bytes) {
        Ok(items) => Ok(items),
        Err(e) => {
            tracing::warn!(error = %e, key = %key, "Discarding corrupt list");
            Ok(Vec::new())
        }
    }
}

/// Serializes and writes a whole list
pub async fn save_list<T: Serialize>(
    store: &dyn ListStore,
    key: ListKey,
    items: &[T],
) -> StoreResult<()> {
    let bytes = serde_json::to_vec(items)?;
    store.set(key, bytes).await?;
    tracing::debug!(key = %key, len = items.len(), store = store.name(), "List persisted");
    Ok(())
}

/// Process-local store, used in tests and when nothing should outlive the process
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<ListKey, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ListStore for MemoryStore {
    async fn get(&self, key: ListKey) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.entries.read().await.get(&key).cloned())
    }

    async fn set(&self, key: ListKey, value: Vec<u8>) -> StoreResult<()> {
        self.entries.write().await.insert(key, value);
        Ok(())
    }

    async fn remove(&self, key: ListKey) -> StoreResult<()> {
        self.entries.write().await.remove(&key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
