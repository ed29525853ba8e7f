use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    error::{AppResult, CatalogResult},
    models::{Credits, Movie, MovieDetails, MovieId, MovieVideo, Review},
    services::{
        bookmarks::{Favorites, Watchlist},
        catalog::CatalogClient,
    },
};

const NOT_AVAILABLE: &str = "N/A";

/// Everything the details screen shows for one movie
#[derive(Debug, Clone, Serialize)]
pub struct MovieDetailsView {
    pub details: MovieDetails,
    pub trailers: Vec<MovieVideo>,
    pub credits: Credits,
    pub similar: Vec<Movie>,
    pub reviews: Vec<Review>,
    pub is_favorite: bool,
    pub is_in_watchlist: bool,
    pub runtime: String,
    pub release_date: String,
    pub budget: String,
    pub revenue: String,
    pub trailer_url: Option<String>,
    pub share_text: String,
}

/// Loads a movie's details together with its secondary data and bookmark membership
///
/// Only the primary details fetch can fail the load. Videos, credits, similar movies and
/// reviews are fetched concurrently and fall back to empty on error.
#[derive(Clone)]
pub struct DetailsLoader {
    catalog: Arc<dyn CatalogClient>,
    favorites: Arc<Favorites>,
    watchlist: Arc<Watchlist>,
}

impl DetailsLoader {
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        favorites: Arc<Favorites>,
        watchlist: Arc<Watchlist>,
    ) -> Self {
        Self {
            catalog,
            favorites,
            watchlist,
        }
    }

    pub async fn load(&self, id: MovieId) -> CatalogResult<MovieDetailsView> {
        let details = self.catalog.movie_details(id).await?;

        let (videos, credits, similar, reviews) = tokio::join!(
            self.catalog.movie_videos(id),
            self.catalog.movie_credits(id),
            self.catalog.similar_movies(id, 1),
            self.catalog.movie_reviews(id, 1),
        );

        let trailers: Vec<MovieVideo> = best_effort(id, "videos", videos)
            .into_iter()
            .filter(MovieVideo::is_youtube_trailer)
            .collect();
        let credits = best_effort(id, "credits", credits);
        let similar = best_effort(id, "similar", similar.map(|p| p.results));
        let reviews = best_effort(id, "reviews", reviews.map(|p| p.results));

        let (is_favorite, is_in_watchlist) =
            tokio::join!(self.favorites.is_member(id), self.watchlist.is_member(id));

        tracing::info!(
            movie_id = id,
            title = %details.title,
            trailers = trailers.len(),
            similar = similar.len(),
            "Movie details loaded"
        );

        Ok(MovieDetailsView {
            runtime: format_runtime(details.runtime),
            release_date: format_release_date(&details.release_date),
            budget: format_currency(details.budget),
            revenue: format_currency(details.revenue),
            trailer_url: trailer_url(&trailers),
            share_text: share_text(&details),
            details,
            trailers,
            credits,
            similar,
            reviews,
            is_favorite,
            is_in_watchlist,
        })
    }

    /// Fetches the movie and flips its favorite membership
    pub async fn toggle_favorite(&self, id: MovieId) -> AppResult<bool> {
        let details = self.catalog.movie_details(id).await?;
        Ok(self.favorites.toggle_details(&details).await?)
    }

    /// Fetches the movie and flips its watchlist membership
    pub async fn toggle_watchlist(&self, id: MovieId) -> AppResult<bool> {
        let details = self.catalog.movie_details(id).await?;
        Ok(self.watchlist.toggle_details(&details).await?)
    }
}

fn best_effort<T: Default>(id: MovieId, what: &str, result: CatalogResult<T>) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!(error = %e, movie_id = id, what, "Secondary details fetch failed");
        T::default()
    })
}

/// `148` → `"2h 28m"`, `45` → `"45m"`
pub fn format_runtime(minutes: Option<u32>) -> String {
    match minutes {
        None => NOT_AVAILABLE.to_string(),
        Some(m) if m >= 60 => format!("{}h {}m", m / 60, m % 60),
        Some(m) => format!("{}m", m),
    }
}

/// `"2010-07-16"` → `"July 16, 2010"`. Unparsable dates are returned as given.
pub fn format_release_date(date: &str) -> String {
    if date.is_empty() {
        return NOT_AVAILABLE.to_string();
    }

    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => parsed.format("%B %-d, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// Whole US dollars with thousands separators; zero means unknown
pub fn format_currency(amount: u64) -> String {
    if amount == 0 {
        return NOT_AVAILABLE.to_string();
    }

    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    grouped.push('$');
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Watch URL of the first trailer
pub fn trailer_url(trailers: &[MovieVideo]) -> Option<String> {
    trailers.first().and_then(MovieVideo::watch_url)
}

pub fn share_text(details: &MovieDetails) -> String {
    let year = details
        .release_date
        .get(..4)
        .filter(|y| !y.is_empty())
        .unwrap_or("Unknown");

    format!(
        "Check out \"{}\" ({}) - Rated {:.1}/10 ⭐",
        details.title, year, details.vote_average
    )
}
