//! TMDB API client
//!
//! Every request carries the bearer token and the configured language. Failures map onto
//! [`CatalogError`]: unparsable endpoint → `InvalidUrl`, transport failure → `RequestFailed`,
//! non-2xx → `ServerError(status)`, body shape mismatch → `DecodingFailed`.

use crate::{
    error::{CatalogError, CatalogResult},
    models::{
        Credits, Genre, GenresResponse, Movie, MovieDetails, MovieId, MovieList, MovieVideo,
        Page, Review, VideosResponse,
    },
    services::catalog::{CatalogClient, SearchRequest},
};
use reqwest::{header::ACCEPT, Client as HttpClient, Url};
use serde::de::DeserializeOwned;

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_url: String,
    api_token: String,
    language: String,
}

impl TmdbClient {
    pub fn new(api_url: String, api_token: String, language: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
            api_token,
            language,
        }
    }

    fn endpoint(&self, path: &str) -> CatalogResult<Url> {
        let raw = format!("{}/{}", self.api_url.trim_end_matches('/'), path);
        Url::parse(&raw).map_err(|e| {
            tracing::error!(error = %e, url = %raw, "Invalid catalog endpoint");
            CatalogError::InvalidUrl
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> CatalogResult<T> {
        let url = self.endpoint(path)?;

        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.api_token)
            .header(ACCEPT, "application/json")
            .query(&[("language", self.language.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, path = %path, "Catalog request failed");
                CatalogError::RequestFailed
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                path = %path,
                status = %status,
                body = %body,
                "Catalog returned an error status"
            );
            return Err(CatalogError::ServerError(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| {
            tracing::warn!(error = %e, path = %path, "Failed to read catalog response");
            CatalogError::RequestFailed
        })?;

        serde_json::from_slice(&body).map_err(|e| {
            tracing::error!(error = %e, path = %path, "Failed to deserialize catalog response");
            CatalogError::DecodingFailed
        })
    }
}

#[async_trait::async_trait]
impl CatalogClient for TmdbClient {
    async fn search_movies(&self, request: SearchRequest) -> CatalogResult<Page<Movie>> {
        let params = [
            ("query", request.query.clone()),
            ("page", request.page.to_string()),
            ("include_adult", "false".to_string()),
        ];

        let mut page: Page<Movie> = self.get("search/movie", &params).await?;
        let fetched = page.results.len();
        page.results = request.refine(page.results);

        tracing::info!(
            query = %request.query,
            page = page.page,
            fetched,
            kept = page.results.len(),
            total_results = page.total_results,
            "Movie search completed"
        );

        Ok(page)
    }

    async fn movie_list(&self, list: MovieList, page: u32) -> CatalogResult<Page<Movie>> {
        let path = format!("movie/{}", list.path_segment());
        let movies: Page<Movie> = self.get(&path, &[("page", page.to_string())]).await?;

        tracing::debug!(
            list = list.path_segment(),
            page = movies.page,
            results = movies.results.len(),
            "Movie list fetched"
        );

        Ok(movies)
    }

    async fn genres(&self) -> CatalogResult<Vec<Genre>> {
        let response: GenresResponse = self.get("genre/movie/list", &[]).await?;
        Ok(response.genres)
    }

    async fn movie_details(&self, id: MovieId) -> CatalogResult<MovieDetails> {
        let details: MovieDetails = self.get(&format!("movie/{}", id), &[]).await?;
        tracing::debug!(movie_id = id, title = %details.title, "Movie details fetched");
        Ok(details)
    }

    async fn movie_videos(&self, id: MovieId) -> CatalogResult<Vec<MovieVideo>> {
        let response: VideosResponse = self.get(&format!("movie/{}/videos", id), &[]).await?;
        Ok(response.results)
    }

    async fn movie_credits(&self, id: MovieId) -> CatalogResult<Credits> {
        self.get(&format!("movie/{}/credits", id), &[]).await
    }

    async fn similar_movies(&self, id: MovieId, page: u32) -> CatalogResult<Page<Movie>> {
        self.get(
            &format!("movie/{}/similar", id),
            &[("page", page.to_string())],
        )
        .await
    }

    async fn movie_reviews(&self, id: MovieId, page: u32) -> CatalogResult<Page<Review>> {
        self.get(
            &format!("movie/{}/reviews", id),
            &[("page", page.to_string())],
        )
        .await
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
