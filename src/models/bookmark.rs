use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::{Movie, MovieId};
use crate::store::ListKey;

/// A persisted projection of a movie kept in a user list
pub trait Bookmark: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Store key holding the serialized list
    const KEY: ListKey;

    fn movie_id(&self) -> MovieId;

    fn from_movie(movie: &Movie) -> Self;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteMovie {
    pub id: MovieId,
    pub title: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub rating: f32,
}

impl Bookmark for FavoriteMovie {
    const KEY: ListKey = ListKey::Favorites;

    fn movie_id(&self) -> MovieId {
        self.id
    }

    fn from_movie(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            poster_path: movie.poster_path.clone(),
            release_date: non_empty(&movie.release_date),
            rating: movie.vote_average,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistMovie {
    pub id: MovieId,
    pub title: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub overview: Option<String>,
}

impl Bookmark for WatchlistMovie {
    const KEY: ListKey = ListKey::Watchlist;

    fn movie_id(&self) -> MovieId {
        self.id
    }

    fn from_movie(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            poster_path: movie.poster_path.clone(),
            release_date: non_empty(&movie.release_date),
            overview: non_empty(&movie.overview),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
