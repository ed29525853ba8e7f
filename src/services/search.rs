//! Search session: query, pagination, filters and recent-search history
//!
//! Every fetch captures the session generation when it is issued. A response is committed
//! only if the generation is unchanged when it arrives, so a slow reply to a superseded
//! query can never overwrite newer state. `search`, `set_query("")` and `clear` bump the
//! generation; `load_more` reuses it so that a new search also invalidates pending pages.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;

use crate::{
    error::{CatalogResult, StoreResult},
    models::{Genre, GenreId, LoadState, Movie, MovieList, Page, SortOption},
    services::{
        catalog::{CatalogClient, SearchRequest},
        history::RecentSearches,
    },
    store::ListStore,
};

/// What happened to a search operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOutcome {
    /// The response was applied to the session
    Committed,
    /// Preconditions were not met; nothing was fetched
    Skipped,
    /// The response belonged to a superseded request and was dropped
    Discarded,
    /// Newer input arrived during the debounce window; nothing was fetched
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchKind {
    FirstPage,
    NextPage,
}

/// Operation to re-run on retry
#[derive(Debug, Clone, PartialEq, Eq)]
enum Operation {
    Search(String),
    LoadMore,
    ApplyFilters,
}

/// Popular movies shown while the query is empty
const SUGGESTION_LIMIT: usize = 20;

#[derive(Debug, Default)]
struct SessionState {
    /// Text as typed; may differ from the query the results belong to
    query: String,
    /// Query whose pages make up `results`
    active_query: String,
    results: Vec<Movie>,
    current_page: u32,
    total_pages: u32,
    total_results: u32,
    genre: Option<GenreId>,
    sort: SortOption,
    available_genres: Vec<Genre>,
    suggestions: Vec<Movie>,
    load_state: LoadState,
    in_flight: Option<FetchKind>,
    generation: u64,
    failed: Option<Operation>,
}

impl SessionState {
    fn has_more_pages(&self) -> bool {
        self.current_page < self.total_pages
    }

    fn request(&self, query: &str, page: u32) -> SearchRequest {
        SearchRequest {
            query: query.to_string(),
            page,
            sort: self.sort,
            genre: self.genre,
        }
    }

    /// Drops results and cancels whatever is in flight
    fn reset_results(&mut self) {
        self.generation += 1;
        self.active_query.clear();
        self.results.clear();
        self.current_page = 0;
        self.total_pages = 0;
        self.total_results = 0;
        self.in_flight = None;
        self.load_state = LoadState::Idle;
        self.failed = None;
    }
}

/// Immutable view of the session handed to presentation code
#[derive(Debug, Clone, Serialize)]
pub struct SearchSnapshot {
    pub query: String,
    pub active_query: String,
    pub results: Vec<Movie>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_results: u32,
    pub has_more_pages: bool,
    pub genre: Option<GenreId>,
    pub sort: SortOption,
    pub available_genres: Vec<Genre>,
    pub suggestions: Vec<Movie>,
    pub state: LoadState,
    pub error_message: Option<String>,
    pub is_loading_more: bool,
    pub recent_searches: Vec<String>,
}

pub struct SearchEngine {
    catalog: Arc<dyn CatalogClient>,
    history: RecentSearches,
    state: Mutex<SessionState>,
    /// Bumped on every input change; a debounced search fires only if it is unchanged
    input_rev: AtomicU64,
}

impl SearchEngine {
    /// Creates a session and loads the persisted search history
    pub async fn new(catalog: Arc<dyn CatalogClient>, store: Arc<dyn ListStore>) -> Self {
        Self {
            catalog,
            history: RecentSearches::load(store).await,
            state: Mutex::new(SessionState::default()),
            input_rev: AtomicU64::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn bump_input(&self) -> u64 {
        self.input_rev.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub async fn recent_searches(&self) -> Vec<String> {
        self.history.entries().await
    }

    pub async fn remove_recent(&self, query: &str) -> StoreResult<()> {
        self.history.remove(query).await
    }

    pub async fn clear_recent(&self) -> StoreResult<()> {
        self.history.clear().await?;
        tracing::info!("Recent searches cleared");
        Ok(())
    }

    pub async fn snapshot(&self) -> SearchSnapshot {
        let recent_searches = self.history.entries().await;
        let state = self.state();

        SearchSnapshot {
            query: state.query.clone(),
            active_query: state.active_query.clone(),
            results: state.results.clone(),
            current_page: state.current_page,
            total_pages: state.total_pages,
            total_results: state.total_results,
            has_more_pages: state.has_more_pages(),
            genre: state.genre,
            sort: state.sort,
            available_genres: state.available_genres.clone(),
            suggestions: state.suggestions.clone(),
            state: state.load_state.clone(),
            error_message: state.load_state.error_message().map(str::to_string),
            is_loading_more: state.in_flight == Some(FetchKind::NextPage),
            recent_searches,
        }
    }

    /// Updates the typed text. Empty text clears the results and cancels in-flight work
    /// without issuing a request.
    pub fn set_query(&self, text: &str) {
        self.update_query(text);
    }

    /// Returns the input revision this update was assigned
    fn update_query(&self, text: &str) -> u64 {
        let rev = self.bump_input();
        let mut state = self.state();
        state.query = text.to_string();

        if text.trim().is_empty() {
            state.reset_results();
            tracing::debug!("Search query cleared");
        }

        rev
    }

    pub fn set_genre(&self, genre: Option<GenreId>) {
        self.state().genre = genre;
    }

    pub fn set_sort(&self, sort: SortOption) {
        self.state().sort = sort;
    }

    /// Searches for `query`, superseding any earlier request
    pub async fn search(&self, query: &str) -> CatalogResult<SearchOutcome> {
        self.bump_input();
        self.run_search(query).await
    }

    /// Searches for `query` once no newer input has arrived for `delay`
    pub async fn search_debounced(
        &self,
        query: &str,
        delay: Duration,
    ) -> CatalogResult<SearchOutcome> {
        let rev = self.update_query(query);
        if query.trim().is_empty() {
            return Ok(SearchOutcome::Skipped);
        }

        tokio::time::sleep(delay).await;

        if self.input_rev.load(Ordering::SeqCst) != rev {
            tracing::debug!(query = %query, "Debounced search superseded");
            return Ok(SearchOutcome::Superseded);
        }

        self.run_search(query).await
    }

    async fn run_search(&self, query: &str) -> CatalogResult<SearchOutcome> {
        let trimmed = query.trim();

        let (generation, request) = {
            let mut state = self.state();
            state.query = query.to_string();

            if trimmed.is_empty() {
                state.reset_results();
                return Ok(SearchOutcome::Skipped);
            }

            state.generation += 1;
            state.in_flight = Some(FetchKind::FirstPage);
            state.load_state = LoadState::Loading;
            (state.generation, state.request(trimmed, 1))
        };

        tracing::debug!(query = %trimmed, generation, "Search issued");

        let result = self.catalog.search_movies(request).await;
        let outcome = self.commit(
            generation,
            Operation::Search(trimmed.to_string()),
            Some(trimmed),
            result,
        )?;

        if outcome == SearchOutcome::Committed {
            if let Err(e) = self.history.record(trimmed).await {
                tracing::warn!(error = %e, query = %trimmed, "Failed to persist recent search");
            }
        }

        Ok(outcome)
    }

    /// Fetches the next page of the active query and appends it
    pub async fn load_more(&self) -> CatalogResult<SearchOutcome> {
        let (generation, request) = {
            let mut state = self.state();

            if state.in_flight.is_some()
                || !state.has_more_pages()
                || state.active_query.is_empty()
            {
                return Ok(SearchOutcome::Skipped);
            }

            state.in_flight = Some(FetchKind::NextPage);
            let next = state.current_page + 1;
            (state.generation, state.request(&state.active_query, next))
        };

        tracing::debug!(page = request.page, generation, "Loading more results");

        let result = self.catalog.search_movies(request).await;
        self.commit(generation, Operation::LoadMore, None, result)
    }

    /// Re-fetches page 1 of the active query with the current genre and sort
    pub async fn apply_filters(&self) -> CatalogResult<SearchOutcome> {
        let (generation, request) = {
            let mut state = self.state();

            if state.active_query.is_empty() {
                return Ok(SearchOutcome::Skipped);
            }

            state.generation += 1;
            state.in_flight = Some(FetchKind::FirstPage);
            state.load_state = LoadState::Loading;
            (state.generation, state.request(&state.active_query, 1))
        };

        tracing::debug!(
            genre = ?request.genre,
            sort = request.sort.api_value(),
            generation,
            "Applying search filters"
        );

        let query = request.query.clone();
        let result = self.catalog.search_movies(request).await;
        self.commit(generation, Operation::ApplyFilters, Some(&query), result)
    }

    /// Sets genre and sort, then re-fetches
    pub async fn update_filters(
        &self,
        genre: Option<GenreId>,
        sort: SortOption,
    ) -> CatalogResult<SearchOutcome> {
        {
            let mut state = self.state();
            state.genre = genre;
            state.sort = sort;
        }
        self.apply_filters().await
    }

    /// Pull-to-refresh: re-runs page 1 of the active query, or reloads the popular
    /// suggestions when there is none
    pub async fn refresh(&self) -> CatalogResult<SearchOutcome> {
        let active = self.state().active_query.clone();
        if active.is_empty() {
            return Ok(match self.load_suggestions().await {
                Some(_) => SearchOutcome::Committed,
                None => SearchOutcome::Skipped,
            });
        }
        self.search(&active).await
    }

    /// Re-runs the operation that last failed
    pub async fn retry(&self) -> CatalogResult<SearchOutcome> {
        let failed = self.state().failed.clone();

        match failed {
            None => Ok(SearchOutcome::Skipped),
            Some(Operation::Search(query)) => self.search(&query).await,
            Some(Operation::LoadMore) => self.load_more().await,
            Some(Operation::ApplyFilters) => self.apply_filters().await,
        }
    }

    /// Resets query, results, pagination and filters. History is kept.
    pub fn clear(&self) {
        self.bump_input();
        let mut state = self.state();
        state.reset_results();
        state.query.clear();
        state.genre = None;
        state.sort = SortOption::default();
    }

    /// Best-effort genre list for the filter picker; failures leave it empty
    pub async fn load_genres(&self) -> Vec<Genre> {
        match self.catalog.genres().await {
            Ok(genres) => {
                self.state().available_genres = genres.clone();
                genres
            }
            Err(e) => {
                tracing::warn!(error = %e, catalog = self.catalog.name(), "Failed to fetch genres");
                Vec::new()
            }
        }
    }

    /// Best-effort popular movies for the empty-query screen. A failure is logged and
    /// leaves the previous suggestions and the load state untouched.
    pub async fn load_suggestions(&self) -> Option<Vec<Movie>> {
        match self.catalog.movie_list(MovieList::Popular, 1).await {
            Ok(page) => {
                let suggestions: Vec<Movie> =
                    page.results.into_iter().take(SUGGESTION_LIMIT).collect();
                tracing::debug!(count = suggestions.len(), "Suggestions loaded");
                self.state().suggestions = suggestions.clone();
                Some(suggestions)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    catalog = self.catalog.name(),
                    "Failed to fetch suggestions"
                );
                None
            }
        }
    }

    fn commit(
        &self,
        generation: u64,
        operation: Operation,
        replaces_with: Option<&str>,
        result: CatalogResult<Page<Movie>>,
    ) -> CatalogResult<SearchOutcome> {
        let mut state = self.state();

        if state.generation != generation {
            tracing::debug!(
                generation,
                current = state.generation,
                "Discarding stale search response"
            );
            return Ok(SearchOutcome::Discarded);
        }

        state.in_flight = None;

        match result {
            Ok(page) => {
                let received = page.results.len();
                match replaces_with {
                    Some(query) => {
                        state.active_query = query.to_string();
                        state.results = page.results;
                    }
                    None => state.results.extend(page.results),
                }
                state.current_page = page.page;
                state.total_pages = page.total_pages;
                state.total_results = page.total_results;
                state.load_state = LoadState::Success;
                state.failed = None;

                tracing::info!(
                    query = %state.active_query,
                    page = state.current_page,
                    received,
                    accumulated = state.results.len(),
                    total_results = state.total_results,
                    "Search results committed"
                );

                Ok(SearchOutcome::Committed)
            }
            Err(e) => {
                tracing::error!(error = %e, operation = ?operation, "Search failed");
                state.load_state = LoadState::Failure(e.to_string());
                state.failed = Some(operation);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use crate::services::catalog::MockCatalogClient;
    use crate::store::MemoryStore;
    use crate::testing::{movie, page, FakeCatalog};

    async fn engine_with(catalog: Arc<FakeCatalog>) -> Arc<SearchEngine> {
        Arc::new(SearchEngine::new(catalog, Arc::new(MemoryStore::new())).await)
    }

    fn dune_catalog() -> Arc<FakeCatalog> {
        let catalog = Arc::new(FakeCatalog::new());
        catalog.set_search("dune", 1, Ok(page(1, vec![movie(1, "Dune")], 3, 45)));
        catalog.set_search(
            "dune",
            2,
            Ok(page(2, vec![movie(2, "Dune: Part Two")], 3, 45)),
        );
        catalog
    }

    #[tokio::test]
    async fn test_search_then_load_more_appends() {
        let engine = engine_with(dune_catalog()).await;

        assert_eq!(engine.search("dune").await, Ok(SearchOutcome::Committed));
        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.results.len(), 1);
        assert!(snapshot.has_more_pages);
        assert_eq!(snapshot.total_results, 45);
        assert_eq!(snapshot.state, LoadState::Success);

        assert_eq!(engine.load_more().await, Ok(SearchOutcome::Committed));
        let snapshot = engine.snapshot().await;
        let ids: Vec<_> = snapshot.results.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(snapshot.current_page, 2);
    }

    #[tokio::test]
    async fn test_search_trims_and_records_history() {
        let catalog = dune_catalog();
        let engine = engine_with(catalog.clone()).await;

        engine.search("  dune \n").await.unwrap();

        assert_eq!(catalog.calls()[0].query, "dune");
        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.active_query, "dune");
        assert_eq!(snapshot.recent_searches, vec!["dune"]);
    }

    #[tokio::test]
    async fn test_history_dedup_through_engine() {
        let engine = engine_with(Arc::new(FakeCatalog::new())).await;

        engine.search("Batman").await.unwrap();
        engine.search("batman").await.unwrap();

        assert_eq!(engine.snapshot().await.recent_searches, vec!["batman"]);
    }

    #[tokio::test]
    async fn test_blank_search_clears_without_request() {
        let catalog = dune_catalog();
        let engine = engine_with(catalog.clone()).await;
        engine.search("dune").await.unwrap();

        assert_eq!(engine.search("   ").await, Ok(SearchOutcome::Skipped));

        assert_eq!(catalog.calls().len(), 1);
        let snapshot = engine.snapshot().await;
        assert!(snapshot.results.is_empty());
        assert_eq!(snapshot.total_results, 0);
        assert!(!snapshot.has_more_pages);
        assert_eq!(snapshot.state, LoadState::Idle);
    }

    #[tokio::test]
    async fn test_set_query_empty_cancels_in_flight() {
        let catalog = dune_catalog();
        let gate = catalog.gate("dune", 1);
        let engine = engine_with(catalog.clone()).await;

        let pending = tokio::spawn({
            let engine = engine.clone();
            async move { engine.search("dune").await }
        });
        catalog.wait_for_calls(1).await;

        engine.set_query("");
        gate.notify_one();

        assert_eq!(pending.await.unwrap(), Ok(SearchOutcome::Discarded));
        let snapshot = engine.snapshot().await;
        assert!(snapshot.results.is_empty());
        assert!(snapshot.recent_searches.is_empty());
    }

    #[tokio::test]
    async fn test_set_query_non_empty_keeps_results() {
        let engine = engine_with(dune_catalog()).await;
        engine.search("dune").await.unwrap();

        engine.set_query("dun");

        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.query, "dun");
        assert_eq!(snapshot.active_query, "dune");
        assert_eq!(snapshot.results.len(), 1);
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded_when_it_arrives_last() {
        let catalog = Arc::new(FakeCatalog::new());
        catalog.set_search("slow", 1, Ok(page(1, vec![movie(1, "Slow")], 1, 1)));
        catalog.set_search("fast", 1, Ok(page(1, vec![movie(2, "Fast")], 1, 1)));
        let gate = catalog.gate("slow", 1);
        let engine = engine_with(catalog.clone()).await;

        let slow = tokio::spawn({
            let engine = engine.clone();
            async move { engine.search("slow").await }
        });
        catalog.wait_for_calls(1).await;

        assert_eq!(engine.search("fast").await, Ok(SearchOutcome::Committed));
        gate.notify_one();
        assert_eq!(slow.await.unwrap(), Ok(SearchOutcome::Discarded));

        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.active_query, "fast");
        assert_eq!(snapshot.results[0].id, 2);
        assert_eq!(snapshot.recent_searches, vec!["fast"]);
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded_when_it_arrives_first() {
        let catalog = Arc::new(FakeCatalog::new());
        catalog.set_search("first", 1, Ok(page(1, vec![movie(1, "First")], 1, 1)));
        catalog.set_search("second", 1, Ok(page(1, vec![movie(2, "Second")], 1, 1)));
        let first_gate = catalog.gate("first", 1);
        let second_gate = catalog.gate("second", 1);
        let engine = engine_with(catalog.clone()).await;

        let first = tokio::spawn({
            let engine = engine.clone();
            async move { engine.search("first").await }
        });
        catalog.wait_for_calls(1).await;
        let second = tokio::spawn({
            let engine = engine.clone();
            async move { engine.search("second").await }
        });
        catalog.wait_for_calls(2).await;

        first_gate.notify_one();
        assert_eq!(first.await.unwrap(), Ok(SearchOutcome::Discarded));
        assert!(engine.snapshot().await.results.is_empty());

        second_gate.notify_one();
        assert_eq!(second.await.unwrap(), Ok(SearchOutcome::Committed));
        assert_eq!(engine.snapshot().await.results[0].id, 2);
    }

    #[tokio::test]
    async fn test_stale_failure_does_not_set_error() {
        let catalog = Arc::new(FakeCatalog::new());
        catalog.set_search("broken", 1, Err(CatalogError::ServerError(500)));
        catalog.set_search("fine", 1, Ok(page(1, vec![movie(3, "Fine")], 1, 1)));
        let gate = catalog.gate("broken", 1);
        let engine = engine_with(catalog.clone()).await;

        let broken = tokio::spawn({
            let engine = engine.clone();
            async move { engine.search("broken").await }
        });
        catalog.wait_for_calls(1).await;
        engine.search("fine").await.unwrap();
        gate.notify_one();

        assert_eq!(broken.await.unwrap(), Ok(SearchOutcome::Discarded));
        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.error_message, None);
        assert_eq!(snapshot.state, LoadState::Success);
    }

    #[tokio::test]
    async fn test_load_more_skipped_without_more_pages() {
        let catalog = Arc::new(FakeCatalog::new());
        catalog.set_search("heat", 1, Ok(page(1, vec![movie(1, "Heat")], 1, 1)));
        let engine = engine_with(catalog.clone()).await;
        engine.search("heat").await.unwrap();

        assert_eq!(engine.load_more().await, Ok(SearchOutcome::Skipped));
        assert_eq!(catalog.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_load_more_skipped_without_query() {
        let catalog = Arc::new(FakeCatalog::new());
        let engine = engine_with(catalog.clone()).await;

        assert_eq!(engine.load_more().await, Ok(SearchOutcome::Skipped));
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test]
    async fn test_load_more_skipped_while_in_flight() {
        let catalog = dune_catalog();
        let gate = catalog.gate("dune", 2);
        let engine = engine_with(catalog.clone()).await;
        engine.search("dune").await.unwrap();

        let pending = tokio::spawn({
            let engine = engine.clone();
            async move { engine.load_more().await }
        });
        catalog.wait_for_calls(2).await;
        assert!(engine.snapshot().await.is_loading_more);

        assert_eq!(engine.load_more().await, Ok(SearchOutcome::Skipped));
        assert_eq!(catalog.calls().len(), 2);

        gate.notify_one();
        assert_eq!(pending.await.unwrap(), Ok(SearchOutcome::Committed));
        assert_eq!(engine.snapshot().await.results.len(), 2);
    }

    #[tokio::test]
    async fn test_new_search_discards_pending_page() {
        let catalog = dune_catalog();
        catalog.set_search("alien", 1, Ok(page(1, vec![movie(9, "Alien")], 1, 1)));
        let gate = catalog.gate("dune", 2);
        let engine = engine_with(catalog.clone()).await;
        engine.search("dune").await.unwrap();

        let pending = tokio::spawn({
            let engine = engine.clone();
            async move { engine.load_more().await }
        });
        catalog.wait_for_calls(2).await;

        engine.search("alien").await.unwrap();
        gate.notify_one();

        assert_eq!(pending.await.unwrap(), Ok(SearchOutcome::Discarded));
        let ids: Vec<_> = engine
            .snapshot()
            .await
            .results
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![9]);
    }

    #[tokio::test]
    async fn test_server_error_keeps_previous_results() {
        let catalog = dune_catalog();
        catalog.set_search("heat", 1, Err(CatalogError::ServerError(500)));
        let engine = engine_with(catalog).await;
        engine.search("dune").await.unwrap();

        let result = engine.search("heat").await;

        assert_eq!(result, Err(CatalogError::ServerError(500)));
        let snapshot = engine.snapshot().await;
        assert!(snapshot.error_message.unwrap().contains("500"));
        assert_eq!(snapshot.results.len(), 1);
        assert_eq!(snapshot.results[0].title, "Dune");
        assert_eq!(snapshot.active_query, "dune");
        assert_eq!(snapshot.recent_searches, vec!["dune"]);
    }

    #[tokio::test]
    async fn test_retry_reruns_failed_search() {
        let catalog = Arc::new(FakeCatalog::new());
        catalog.set_search("heat", 1, Err(CatalogError::RequestFailed));
        let engine = engine_with(catalog.clone()).await;

        assert!(engine.search("heat").await.is_err());
        catalog.set_search("heat", 1, Ok(page(1, vec![movie(5, "Heat")], 1, 1)));

        assert_eq!(engine.retry().await, Ok(SearchOutcome::Committed));
        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.results[0].id, 5);
        assert_eq!(snapshot.state, LoadState::Success);
        assert_eq!(catalog.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_retry_reruns_failed_load_more() {
        let catalog = dune_catalog();
        catalog.set_search("dune", 2, Err(CatalogError::DecodingFailed));
        let engine = engine_with(catalog.clone()).await;
        engine.search("dune").await.unwrap();

        assert_eq!(engine.load_more().await, Err(CatalogError::DecodingFailed));
        assert_eq!(engine.snapshot().await.results.len(), 1);

        catalog.set_search(
            "dune",
            2,
            Ok(page(2, vec![movie(2, "Dune: Part Two")], 3, 45)),
        );
        assert_eq!(engine.retry().await, Ok(SearchOutcome::Committed));

        let last = catalog.calls().pop().unwrap();
        assert_eq!(last.page, 2);
        assert_eq!(engine.snapshot().await.results.len(), 2);
    }

    #[tokio::test]
    async fn test_retry_without_failure_is_skipped() {
        let engine = engine_with(dune_catalog()).await;
        engine.search("dune").await.unwrap();
        assert_eq!(engine.retry().await, Ok(SearchOutcome::Skipped));
    }

    #[tokio::test]
    async fn test_apply_filters_refetches_first_page() {
        let catalog = Arc::new(FakeCatalog::new());
        let mut scifi = movie(1, "Dune");
        scifi.genre_ids = vec![878];
        let mut drama = movie(2, "Dune Drama");
        drama.genre_ids = vec![18];
        catalog.set_search("dune", 1, Ok(page(1, vec![scifi, drama], 2, 30)));
        let engine = engine_with(catalog.clone()).await;
        engine.search("dune").await.unwrap();
        engine.load_more().await.unwrap();

        let outcome = engine
            .update_filters(Some(878), SortOption::Rating)
            .await
            .unwrap();

        assert_eq!(outcome, SearchOutcome::Committed);
        let last = catalog.calls().pop().unwrap();
        assert_eq!(last.page, 1);
        assert_eq!(last.genre, Some(878));
        assert_eq!(last.sort, SortOption::Rating);

        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.current_page, 1);
        assert_eq!(snapshot.results.len(), 1);
        assert_eq!(snapshot.recent_searches, vec!["dune"]);
    }

    #[tokio::test]
    async fn test_apply_filters_without_query_is_skipped() {
        let catalog = Arc::new(FakeCatalog::new());
        let engine = engine_with(catalog.clone()).await;
        engine.set_genre(Some(28));

        assert_eq!(engine.apply_filters().await, Ok(SearchOutcome::Skipped));
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test]
    async fn test_clear_resets_everything_but_history() {
        let engine = engine_with(dune_catalog()).await;
        engine.search("dune").await.unwrap();
        engine.set_genre(Some(878));
        engine.set_sort(SortOption::Title);

        engine.clear();

        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.query, "");
        assert!(snapshot.results.is_empty());
        assert_eq!(snapshot.current_page, 0);
        assert_eq!(snapshot.genre, None);
        assert_eq!(snapshot.sort, SortOption::Popularity);
        assert_eq!(snapshot.recent_searches, vec!["dune"]);
    }

    #[tokio::test]
    async fn test_refresh_goes_back_to_first_page() {
        let catalog = dune_catalog();
        let engine = engine_with(catalog.clone()).await;
        engine.search("dune").await.unwrap();
        engine.load_more().await.unwrap();

        assert_eq!(engine.refresh().await, Ok(SearchOutcome::Committed));

        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.current_page, 1);
        assert_eq!(snapshot.results.len(), 1);
        assert_eq!(snapshot.state, LoadState::Success);
    }

    #[tokio::test]
    async fn test_refresh_without_query_loads_suggestions() {
        let catalog = Arc::new(FakeCatalog::new());
        let popular: Vec<_> = (1..=25).map(|id| movie(id, "Popular")).collect();
        catalog.set_list(MovieList::Popular, Ok(page(1, popular, 10, 200)));
        let engine = engine_with(catalog.clone()).await;

        assert_eq!(engine.refresh().await, Ok(SearchOutcome::Committed));

        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.suggestions.len(), SUGGESTION_LIMIT);
        assert_eq!(snapshot.suggestions[0].id, 1);
        assert!(snapshot.results.is_empty());
        assert_eq!(snapshot.state, LoadState::Idle);
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test]
    async fn test_suggestion_failure_sets_no_error() {
        let catalog = Arc::new(FakeCatalog::new());
        catalog.set_list(MovieList::Popular, Err(CatalogError::RequestFailed));
        let engine = engine_with(catalog).await;

        assert_eq!(engine.refresh().await, Ok(SearchOutcome::Skipped));

        let snapshot = engine.snapshot().await;
        assert!(snapshot.suggestions.is_empty());
        assert_eq!(snapshot.error_message, None);
        assert_eq!(snapshot.state, LoadState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_drops_superseded_input() {
        let catalog = dune_catalog();
        let engine = engine_with(catalog.clone()).await;
        let delay = Duration::from_millis(300);

        let early = tokio::spawn({
            let engine = engine.clone();
            async move { engine.search_debounced("du", delay).await }
        });
        tokio::time::sleep(Duration::from_millis(100)).await;

        let late = engine.search_debounced("dune", delay).await;

        assert_eq!(early.await.unwrap(), Ok(SearchOutcome::Superseded));
        assert_eq!(late, Ok(SearchOutcome::Committed));
        let queries: Vec<_> = catalog.calls().into_iter().map(|c| c.query).collect();
        assert_eq!(queries, vec!["dune"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_superseded_by_plain_query_update() {
        let catalog = dune_catalog();
        let engine = engine_with(catalog.clone()).await;

        let pending = tokio::spawn({
            let engine = engine.clone();
            async move {
                engine
                    .search_debounced("dune", Duration::from_millis(300))
                    .await
            }
        });
        tokio::time::sleep(Duration::from_millis(100)).await;
        engine.set_query("dunes");

        assert_eq!(pending.await.unwrap(), Ok(SearchOutcome::Superseded));
        assert!(catalog.calls().is_empty());
        assert_eq!(engine.snapshot().await.query, "dunes");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_debounced_inputs_fetch_only_when_unsuperseded() {
        let catalog = dune_catalog();
        let engine = engine_with(catalog.clone()).await;
        let delay = Duration::from_millis(200);

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let engine = engine.clone();
                tokio::spawn(async move { engine.search_debounced("dune", delay).await })
            })
            .collect();

        let mut fired = 0;
        let mut committed = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(SearchOutcome::Committed) => {
                    fired += 1;
                    committed += 1;
                }
                Ok(SearchOutcome::Discarded) => fired += 1,
                Ok(SearchOutcome::Superseded) => {}
                other => panic!("unexpected outcome {other:?}"),
            }
        }

        assert!(committed >= 1);
        assert_eq!(catalog.calls().len(), fired);
        assert_eq!(engine.snapshot().await.active_query, "dune");
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_blank_input_clears_immediately() {
        let engine = engine_with(dune_catalog()).await;
        engine.search("dune").await.unwrap();

        let outcome = engine
            .search_debounced(" ", Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(outcome, SearchOutcome::Skipped);
        assert!(engine.snapshot().await.results.is_empty());
    }

    #[tokio::test]
    async fn test_recent_search_removal_and_clear() {
        let store: Arc<dyn ListStore> = Arc::new(MemoryStore::new());
        let engine = SearchEngine::new(Arc::new(FakeCatalog::new()), store.clone()).await;
        engine.search("alien").await.unwrap();
        engine.search("heat").await.unwrap();

        engine.remove_recent("alien").await.unwrap();
        assert_eq!(engine.recent_searches().await, vec!["heat"]);

        let reopened = SearchEngine::new(Arc::new(FakeCatalog::new()), store.clone()).await;
        assert_eq!(reopened.recent_searches().await, vec!["heat"]);

        reopened.clear_recent().await.unwrap();
        assert!(reopened.recent_searches().await.is_empty());
        assert_eq!(
            store.get(crate::store::ListKey::RecentSearches).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_genre_failure_is_swallowed() {
        let mut mock = MockCatalogClient::new();
        mock.expect_genres()
            .times(1)
            .returning(|| Err(CatalogError::RequestFailed));
        mock.expect_name().return_const("mock");

        let engine = SearchEngine::new(Arc::new(mock), Arc::new(MemoryStore::new())).await;

        assert!(engine.load_genres().await.is_empty());
        let snapshot = engine.snapshot().await;
        assert!(snapshot.available_genres.is_empty());
        assert_eq!(snapshot.error_message, None);
    }

    #[tokio::test]
    async fn test_genres_are_exposed_in_snapshot() {
        let mut mock = MockCatalogClient::new();
        mock.expect_genres().returning(|| {
            Ok(vec![Genre {
                id: 878,
                name: "Science Fiction".to_string(),
            }])
        });

        let engine = SearchEngine::new(Arc::new(mock), Arc::new(MemoryStore::new())).await;
        engine.load_genres().await;

        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.available_genres.len(), 1);
        assert_eq!(snapshot.available_genres[0].name, "Science Fiction");
    }
}
