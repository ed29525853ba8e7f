use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::bookmarks::MembershipResponse;
use crate::{
    api::AppState,
    error::{AppError, AppResult},
    models::{Movie, MovieId, MovieList, Page, Review},
    services::{HomeSnapshot, MovieDetailsView},
};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page")]
    pub page: u32,
}

fn first_page() -> u32 {
    1
}

impl PageQuery {
    /// Catalog pages are 1-based
    fn page(&self) -> AppResult<u32> {
        if self.page == 0 {
            return Err(AppError::InvalidInput("page must be at least 1".to_string()));
        }
        Ok(self.page)
    }
}

pub async fn home(State(state): State<AppState>) -> Json<HomeSnapshot> {
    Json(state.home.load().await)
}

pub async fn list(
    State(state): State<AppState>,
    Path(list): Path<String>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<Page<Movie>>> {
    let list: MovieList = list.parse().map_err(AppError::InvalidInput)?;
    let page = state.catalog.movie_list(list, params.page()?).await?;
    Ok(Json(page))
}

pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<MovieId>,
) -> AppResult<Json<MovieDetailsView>> {
    Ok(Json(state.details.load(id).await?))
}

pub async fn similar(
    State(state): State<AppState>,
    Path(id): Path<MovieId>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<Page<Movie>>> {
    Ok(Json(state.catalog.similar_movies(id, params.page()?).await?))
}

pub async fn reviews(
    State(state): State<AppState>,
    Path(id): Path<MovieId>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<Page<Review>>> {
    Ok(Json(state.catalog.movie_reviews(id, params.page()?).await?))
}

pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path(id): Path<MovieId>,
) -> AppResult<Json<MembershipResponse>> {
    let member = state.details.toggle_favorite(id).await?;
    Ok(Json(MembershipResponse { id, member }))
}

pub async fn toggle_watchlist(
    State(state): State<AppState>,
    Path(id): Path<MovieId>,
) -> AppResult<Json<MembershipResponse>> {
    let member = state.details.toggle_watchlist(id).await?;
    Ok(Json(MembershipResponse { id, member }))
}
