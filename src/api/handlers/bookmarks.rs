//! Handlers shared by the favorites and watchlist routers
//!
//! Each router carries its own `Arc<BookmarkList<T>>` as state, so the same handlers serve
//! both lists.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::{
    error::AppResult,
    models::{Bookmark, Movie, MovieId},
    services::BookmarkList,
};

#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    pub id: MovieId,
    pub member: bool,
}

pub fn bookmark_routes<T, S>(list: Arc<BookmarkList<T>>) -> Router<S>
where
    T: Bookmark,
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(list_all::<T>).delete(clear_all::<T>))
        .route("/toggle", post(toggle::<T>))
        .route("/:id", get(membership::<T>).delete(remove::<T>))
        .with_state(list)
}

async fn list_all<T: Bookmark>(State(list): State<Arc<BookmarkList<T>>>) -> Json<Vec<T>> {
    Json(list.load_all().await)
}

async fn toggle<T: Bookmark>(
    State(list): State<Arc<BookmarkList<T>>>,
    Json(movie): Json<Movie>,
) -> AppResult<Json<MembershipResponse>> {
    let member = list.toggle(&movie).await?;
    Ok(Json(MembershipResponse {
        id: movie.id,
        member,
    }))
}

async fn membership<T: Bookmark>(
    State(list): State<Arc<BookmarkList<T>>>,
    Path(id): Path<MovieId>,
) -> Json<MembershipResponse> {
    Json(MembershipResponse {
        id,
        member: list.is_member(id).await,
    })
}

async fn remove<T: Bookmark>(
    State(list): State<Arc<BookmarkList<T>>>,
    Path(id): Path<MovieId>,
) -> AppResult<StatusCode> {
    if list.remove(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Ok(StatusCode::NOT_FOUND)
    }
}

async fn clear_all<T: Bookmark>(State(list): State<Arc<BookmarkList<T>>>) -> AppResult<StatusCode> {
    list.clear_all().await?;
    Ok(StatusCode::NO_CONTENT)
}
