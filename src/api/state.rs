use std::sync::Arc;
use std::time::Duration;

use crate::{
    services::{CatalogClient, DetailsLoader, Favorites, HomeFeed, SearchEngine, Watchlist},
    store::ListStore,
};

/// Shared application state
///
/// One search session per process; the HTTP surface fronts a single user's app state.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogClient>,
    pub search: Arc<SearchEngine>,
    pub home: Arc<HomeFeed>,
    pub favorites: Arc<Favorites>,
    pub watchlist: Arc<Watchlist>,
    pub details: DetailsLoader,
    pub search_debounce: Duration,
}

impl AppState {
    pub async fn new(
        catalog: Arc<dyn CatalogClient>,
        store: Arc<dyn ListStore>,
        search_debounce: Duration,
    ) -> Self {
        let favorites = Arc::new(Favorites::new(store.clone()));
        let watchlist = Arc::new(Watchlist::new(store.clone()));
        let search = Arc::new(SearchEngine::new(catalog.clone(), store).await);

        Self {
            details: DetailsLoader::new(catalog.clone(), favorites.clone(), watchlist.clone()),
            home: Arc::new(HomeFeed::new(catalog.clone())),
            catalog,
            search,
            favorites,
            watchlist,
            search_debounce,
        }
    }
}
