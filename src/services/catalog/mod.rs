//! Remote movie catalog abstraction
//!
//! The rest of the crate only talks to the catalog through [`CatalogClient`], so tests and
//! alternative backends can stand in for TMDB.

use crate::{
    error::CatalogResult,
    models::{
        Credits, Genre, GenreId, Movie, MovieDetails, MovieId, MovieList, MovieVideo, Page,
        Review, SortOption,
    },
};

pub mod tmdb;

pub use tmdb::TmdbClient;

/// Parameters of a single search page fetch
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub page: u32,
    pub sort: SortOption,
    pub genre: Option<GenreId>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, page: u32) -> Self {
        Self {
            query: query.into(),
            page,
            sort: SortOption::default(),
            genre: None,
        }
    }

    /// Applies the genre filter and sort order to one page of results
    pub fn refine(&self, mut movies: Vec<Movie>) -> Vec<Movie> {
        if let Some(genre) = self.genre {
            movies.retain(|m| m.genre_ids.contains(&genre));
        }
        self.sort.sort(&mut movies);
        movies
    }
}

/// Read-only access to the movie catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// One page of free-text search results, filtered and sorted per the request
    async fn search_movies(&self, request: SearchRequest) -> CatalogResult<Page<Movie>>;

    async fn movie_list(&self, list: MovieList, page: u32) -> CatalogResult<Page<Movie>>;

    async fn genres(&self) -> CatalogResult<Vec<Genre>>;

    async fn movie_details(&self, id: MovieId) -> CatalogResult<MovieDetails>;

    async fn movie_videos(&self, id: MovieId) -> CatalogResult<Vec<MovieVideo>>;

    async fn movie_credits(&self, id: MovieId) -> CatalogResult<Credits>;

    async fn similar_movies(&self, id: MovieId, page: u32) -> CatalogResult<Page<Movie>>;

    async fn movie_reviews(&self, id: MovieId, page: u32) -> CatalogResult<Page<Review>>;

    /// Client name for logging and debugging
    fn name(&self) -> &'static str;
}
