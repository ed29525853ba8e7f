use std::marker::PhantomData;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    error::StoreResult,
    models::{Bookmark, FavoriteMovie, Movie, MovieDetails, MovieId, WatchlistMovie},
    store::{load_list, save_list, try_load_list, ListStore},
};

pub type Favorites = BookmarkList<FavoriteMovie>;
pub type Watchlist = BookmarkList<WatchlistMovie>;

/// A persisted list of movie bookmarks with set-like membership by id
///
/// Reads always go to the store; every mutation rewrites the whole list. The in-process
/// lock only orders mutations made through this handle.
pub struct BookmarkList<T: Bookmark> {
    store: Arc<dyn ListStore>,
    write_lock: Mutex<()>,
    _entry: PhantomData<fn() -> T>,
}

impl<T: Bookmark> BookmarkList<T> {
    pub fn new(store: Arc<dyn ListStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
            _entry: PhantomData,
        }
    }

    /// Persisted entries in insertion order; missing or corrupt data reads as empty
    pub async fn load_all(&self) -> Vec<T> {
        load_list(self.store.as_ref(), T::KEY).await
    }

    pub async fn is_member(&self, id: MovieId) -> bool {
        self.load_all().await.iter().any(|e| e.movie_id() == id)
    }

    /// Removes the movie if present, otherwise appends it. Returns the resulting membership.
    pub async fn toggle(&self, movie: &Movie) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut entries: Vec<T> = try_load_list(self.store.as_ref(), T::KEY).await?;

        let member = if let Some(pos) = entries.iter().position(|e| e.movie_id() == movie.id) {
            entries.remove(pos);
            false
        } else {
            entries.push(T::from_movie(movie));
            true
        };

        save_list(self.store.as_ref(), T::KEY, &entries).await?;

        tracing::info!(
            list = %T::KEY,
            movie_id = movie.id,
            member,
            "Bookmark toggled"
        );

        Ok(member)
    }

    pub async fn toggle_details(&self, details: &MovieDetails) -> StoreResult<bool> {
        self.toggle(&details.summary()).await
    }

    /// Appends an entry unless one with the same id exists. Returns whether it was added.
    pub async fn add(&self, entry: T) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut entries: Vec<T> = try_load_list(self.store.as_ref(), T::KEY).await?;

        if entries.iter().any(|e| e.movie_id() == entry.movie_id()) {
            return Ok(false);
        }

        entries.push(entry);
        save_list(self.store.as_ref(), T::KEY, &entries).await?;
        Ok(true)
    }

    /// Removes the entry with `id`. Returns whether anything was removed.
    pub async fn remove(&self, id: MovieId) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut entries: Vec<T> = try_load_list(self.store.as_ref(), T::KEY).await?;
        let before = entries.len();
        entries.retain(|e| e.movie_id() != id);

        if entries.len() == before {
            return Ok(false);
        }

        save_list(self.store.as_ref(), T::KEY, &entries).await?;
        Ok(true)
    }

    pub async fn clear_all(&self) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        save_list::<T>(self.store.as_ref(), T::KEY, &[]).await?;
        tracing::info!(list = %T::KEY, "Bookmarks cleared");
        Ok(())
    }
}
