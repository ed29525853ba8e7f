use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::Movie;

/// Result ordering offered on the search screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOption {
    #[default]
    #[serde(rename = "popularity.desc")]
    Popularity,
    #[serde(rename = "release_date.desc")]
    ReleaseDate,
    #[serde(rename = "vote_average.desc")]
    Rating,
    #[serde(rename = "title.asc")]
    Title,
}

impl SortOption {
    pub const ALL: [SortOption; 4] = [
        SortOption::Popularity,
        SortOption::ReleaseDate,
        SortOption::Rating,
        SortOption::Title,
    ];

    /// TMDB `sort_by` value
    pub fn api_value(&self) -> &'static str {
        match self {
            SortOption::Popularity => "popularity.desc",
            SortOption::ReleaseDate => "release_date.desc",
            SortOption::Rating => "vote_average.desc",
            SortOption::Title => "title.asc",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Popularity => "Popularity",
            SortOption::ReleaseDate => "Release Date",
            SortOption::Rating => "Rating",
            SortOption::Title => "Title",
        }
    }

    pub fn compare(&self, a: &Movie, b: &Movie) -> Ordering {
        match self {
            SortOption::Popularity => b.popularity.total_cmp(&a.popularity),
            // ISO dates order lexically; undated movies go last
            SortOption::ReleaseDate => match (a.release_date.is_empty(), b.release_date.is_empty()) {
                (false, true) => Ordering::Less,
                (true, false) => Ordering::Greater,
                _ => b.release_date.cmp(&a.release_date),
            },
            SortOption::Rating => b.vote_average.total_cmp(&a.vote_average),
            SortOption::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        }
    }

    /// Stable in-place sort
    pub fn sort(&self, movies: &mut [Movie]) {
        movies.sort_by(|a, b| self.compare(a, b));
    }
}
