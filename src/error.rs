use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failures talking to the remote movie catalog
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("The URL is invalid.")]
    InvalidUrl,

    #[error("Network request failed.")]
    RequestFailed,

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Failed to decode data.")]
    DecodingFailed,
}

/// Failures reading or writing the local list store
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Catalog(CatalogError::ServerError(404)) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            AppError::Catalog(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::Store(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
pub type CatalogResult<T> = Result<T, CatalogError>;
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_messages() {
        assert_eq!(CatalogError::InvalidUrl.to_string(), "The URL is invalid.");
        assert_eq!(
            CatalogError::RequestFailed.to_string(),
            "Network request failed."
        );
        assert_eq!(CatalogError::ServerError(500).to_string(), "Server error: 500");
        assert_eq!(
            CatalogError::DecodingFailed.to_string(),
            "Failed to decode data."
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        let cases = vec![
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (
                AppError::Catalog(CatalogError::ServerError(503)),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::Catalog(CatalogError::ServerError(404)),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
