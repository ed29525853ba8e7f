use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{self, bookmarks::bookmark_routes, movies, search};
use super::AppState;
use crate::middleware::{make_span_with_request_id, request_id_middleware};

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes(state))
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}

/// API routes under /api/v1
fn api_routes(state: AppState) -> Router {
    Router::new()
        // Search session
        .route(
            "/search",
            get(search::snapshot)
                .post(search::search)
                .delete(search::clear),
        )
        .route("/search/query", put(search::set_query))
        .route("/search/more", post(search::load_more))
        .route("/search/filters", put(search::update_filters))
        .route("/search/refresh", post(search::refresh))
        .route("/search/retry", post(search::retry))
        .route(
            "/search/recent",
            get(search::recent).delete(search::clear_recent),
        )
        .route("/search/recent/:query", delete(search::remove_recent))
        .route("/search/suggestions", get(search::suggestions))
        .route("/genres", get(search::genres))
        // Catalog
        .route("/movies/home", get(movies::home))
        .route("/movies/lists/:list", get(movies::list))
        .route("/movies/:id", get(movies::details))
        .route("/movies/:id/similar", get(movies::similar))
        .route("/movies/:id/reviews", get(movies::reviews))
        .route("/movies/:id/favorite", post(movies::toggle_favorite))
        .route("/movies/:id/watchlist", post(movies::toggle_watchlist))
        // User lists
        .nest("/favorites", bookmark_routes(state.favorites.clone()))
        .nest("/watchlist", bookmark_routes(state.watchlist.clone()))
        .with_state(state)
}
