use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    error::StoreResult,
    store::{load_list, save_list, ListKey, ListStore},
};

pub const MAX_RECENT_SEARCHES: usize = 10;

/// Moves `query` to the front of `entries`, dropping case-insensitive duplicates and
/// anything past [`MAX_RECENT_SEARCHES`]
pub fn push_recent(entries: &mut Vec<String>, query: &str) {
    let lowered = query.to_lowercase();
    entries.retain(|e| e.to_lowercase() != lowered);
    entries.insert(0, query.to_string());
    entries.truncate(MAX_RECENT_SEARCHES);
}

/// Persisted, most-recent-first search history
pub struct RecentSearches {
    store: Arc<dyn ListStore>,
    entries: Mutex<Vec<String>>,
}

impl RecentSearches {
    /// Loads the persisted history once; unreadable data starts an empty history
    pub async fn load(store: Arc<dyn ListStore>) -> Self {
        let mut entries: Vec<String> = load_list(store.as_ref(), ListKey::RecentSearches).await;
        entries.truncate(MAX_RECENT_SEARCHES);

        tracing::debug!(count = entries.len(), "Loaded recent searches");

        Self {
            store,
            entries: Mutex::new(entries),
        }
    }

    pub async fn entries(&self) -> Vec<String> {
        self.entries.lock().await.clone()
    }

    pub async fn record(&self, query: &str) -> StoreResult<()> {
        let mut entries = self.entries.lock().await;
        push_recent(&mut entries, query);
        save_list(self.store.as_ref(), ListKey::RecentSearches, &entries).await
    }

    /// Removes an exact entry
    pub async fn remove(&self, query: &str) -> StoreResult<()> {
        let mut entries = self.entries.lock().await;
        entries.retain(|e| e != query);
        save_list(self.store.as_ref(), ListKey::RecentSearches, &entries).await
    }

    pub async fn clear(&self) -> StoreResult<()> {
        let mut entries = self.entries.lock().await;
        entries.clear();
        self.store.remove(ListKey::RecentSearches).await
    }
}
