use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::AppState,
    error::AppResult,
    models::{Genre, GenreId, Movie, SortOption},
    services::{SearchOutcome, SearchSnapshot},
};

#[derive(Debug, Deserialize)]
pub struct SearchBody {
    pub query: String,
    /// Wait out the configured quiet period before fetching
    #[serde(default)]
    pub debounce: bool,
}

#[derive(Debug, Deserialize)]
pub struct QueryBody {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct FiltersBody {
    #[serde(default)]
    pub genre: Option<GenreId>,
    #[serde(default)]
    pub sort: SortOption,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub outcome: SearchOutcome,
    #[serde(flatten)]
    pub snapshot: SearchSnapshot,
}

async fn respond(state: &AppState, outcome: SearchOutcome) -> Json<SearchResponse> {
    Json(SearchResponse {
        outcome,
        snapshot: state.search.snapshot().await,
    })
}

pub async fn snapshot(State(state): State<AppState>) -> Json<SearchSnapshot> {
    Json(state.search.snapshot().await)
}

pub async fn search(
    State(state): State<AppState>,
    Json(body): Json<SearchBody>,
) -> AppResult<Json<SearchResponse>> {
    let outcome = if body.debounce {
        state
            .search
            .search_debounced(&body.query, state.search_debounce)
            .await?
    } else {
        state.search.search(&body.query).await?
    };
    Ok(respond(&state, outcome).await)
}

/// Records typed text without fetching; empty text clears the results
pub async fn set_query(
    State(state): State<AppState>,
    Json(body): Json<QueryBody>,
) -> Json<SearchSnapshot> {
    state.search.set_query(&body.query);
    Json(state.search.snapshot().await)
}

pub async fn clear(State(state): State<AppState>) -> Json<SearchSnapshot> {
    state.search.clear();
    Json(state.search.snapshot().await)
}

pub async fn load_more(State(state): State<AppState>) -> AppResult<Json<SearchResponse>> {
    let outcome = state.search.load_more().await?;
    Ok(respond(&state, outcome).await)
}

pub async fn update_filters(
    State(state): State<AppState>,
    Json(body): Json<FiltersBody>,
) -> AppResult<Json<SearchResponse>> {
    let outcome = state.search.update_filters(body.genre, body.sort).await?;
    Ok(respond(&state, outcome).await)
}

pub async fn refresh(State(state): State<AppState>) -> AppResult<Json<SearchResponse>> {
    let outcome = state.search.refresh().await?;
    Ok(respond(&state, outcome).await)
}

pub async fn retry(State(state): State<AppState>) -> AppResult<Json<SearchResponse>> {
    let outcome = state.search.retry().await?;
    Ok(respond(&state, outcome).await)
}

pub async fn recent(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.search.recent_searches().await)
}

pub async fn remove_recent(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> AppResult<Json<Vec<String>>> {
    state.search.remove_recent(&query).await?;
    Ok(Json(state.search.recent_searches().await))
}

pub async fn clear_recent(State(state): State<AppState>) -> AppResult<StatusCode> {
    state.search.clear_recent().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Genre list for the filter picker; empty when the catalog is unavailable
pub async fn genres(State(state): State<AppState>) -> Json<Vec<Genre>> {
    Json(state.search.load_genres().await)
}

/// Popular movies for the empty-query screen; the last good list when the catalog fails
pub async fn suggestions(State(state): State<AppState>) -> Json<Vec<Movie>> {
    match state.search.load_suggestions().await {
        Some(movies) => Json(movies),
        None => Json(state.search.snapshot().await.suggestions),
    }
}
