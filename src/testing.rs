//! In-memory catalog for exercising the engine and the HTTP layer without a network
//!
//! Responses are scripted per `(query, page)`. A gate holds a response back until the test
//! releases it, which is how out-of-order completion is reproduced.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::Notify;

use crate::{
    error::{CatalogError, CatalogResult},
    models::{
        Credits, Genre, Movie, MovieDetails, MovieId, MovieList, MovieVideo, Page, Review,
    },
    services::catalog::{CatalogClient, SearchRequest},
};

/// Minimal movie with only identity and title filled in
pub fn movie(id: MovieId, title: &str) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        overview: String::new(),
        poster_path: None,
        release_date: String::new(),
        original_language: "en".to_string(),
        vote_average: 0.0,
        genre_ids: vec![],
        popularity: 0.0,
    }
}

pub fn page(number: u32, results: Vec<Movie>, total_pages: u32, total_results: u32) -> Page<Movie> {
    Page {
        page: number,
        results,
        total_pages,
        total_results,
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Default)]
pub struct FakeCatalog {
    searches: Mutex<HashMap<(String, u32), CatalogResult<Page<Movie>>>>,
    gates: Mutex<HashMap<(String, u32), Arc<Notify>>>,
    calls: Mutex<Vec<SearchRequest>>,
    lists: Mutex<HashMap<MovieList, CatalogResult<Page<Movie>>>>,
    details: Mutex<HashMap<MovieId, MovieDetails>>,
    genres: Mutex<Option<CatalogResult<Vec<Genre>>>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_search(&self, query: &str, page: u32, response: CatalogResult<Page<Movie>>) {
        lock(&self.searches).insert((query.to_string(), page), response);
    }

    /// Holds back the response for `(query, page)` until the returned handle is notified
    pub fn gate(&self, query: &str, page: u32) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        lock(&self.gates).insert((query.to_string(), page), gate.clone());
        gate
    }

    pub fn set_list(&self, list: MovieList, response: CatalogResult<Page<Movie>>) {
        lock(&self.lists).insert(list, response);
    }

    pub fn set_details(&self, details: MovieDetails) {
        lock(&self.details).insert(details.id, details);
    }

    pub fn set_genres(&self, response: CatalogResult<Vec<Genre>>) {
        *lock(&self.genres) = Some(response);
    }

    /// Search requests received so far, in arrival order
    pub fn calls(&self) -> Vec<SearchRequest> {
        lock(&self.calls).clone()
    }

    /// Yields until at least `count` search requests have arrived
    pub async fn wait_for_calls(&self, count: usize) {
        while lock(&self.calls).len() < count {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait::async_trait]
impl CatalogClient for FakeCatalog {
    async fn search_movies(&self, request: SearchRequest) -> CatalogResult<Page<Movie>> {
        let key = (request.query.clone(), request.page);
        lock(&self.calls).push(request.clone());

        let gate = lock(&self.gates).get(&key).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let response = lock(&self.searches)
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Ok(page(request.page, vec![], 0, 0)));

        response.map(|mut found| {
            found.results = request.refine(found.results);
            found
        })
    }

    async fn movie_list(&self, list: MovieList, page_number: u32) -> CatalogResult<Page<Movie>> {
        lock(&self.lists)
            .get(&list)
            .cloned()
            .unwrap_or_else(|| Ok(page(page_number, vec![], 0, 0)))
    }

    async fn genres(&self) -> CatalogResult<Vec<Genre>> {
        lock(&self.genres).clone().unwrap_or_else(|| Ok(vec![]))
    }

    async fn movie_details(&self, id: MovieId) -> CatalogResult<MovieDetails> {
        lock(&self.details)
            .get(&id)
            .cloned()
            .ok_or(CatalogError::ServerError(404))
    }

    async fn movie_videos(&self, _id: MovieId) -> CatalogResult<Vec<MovieVideo>> {
        Ok(vec![])
    }

    async fn movie_credits(&self, _id: MovieId) -> CatalogResult<Credits> {
        Ok(Credits::default())
    }

    async fn similar_movies(&self, _id: MovieId, page_number: u32) -> CatalogResult<Page<Movie>> {
        Ok(page(page_number, vec![], 0, 0))
    }

    async fn movie_reviews(&self, _id: MovieId, page_number: u32) -> CatalogResult<Page<Review>> {
        Ok(Page {
            page: page_number,
            results: vec![],
            total_pages: 0,
            total_results: 0,
        })
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}
