//! TMDB catalog provider
//!
//! Uses the TMDB v3 REST API, authenticated with an `api_key` query
//! parameter. Responses are cached in Redis when a cache is configured.
//!
//! API Flow:
//! 1. Lists: /movie/popular, /movie/top_rated → paged movie summaries
//! 2. Search: /search/movie?query= → paged movie summaries
//! 3. Details: /movie/{id}?append_to_response=credits → details with cast

use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{MovieDetails, MovieId, MoviePage, TmdbMovieDetails},
    services::catalog::CatalogProvider,
};

const LIST_CACHE_TTL: u64 = 3600; // 1 hour
const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour
const DETAILS_CACHE_TTL: u64 = 86400; // 1 day

/// TMDB refuses pages past 500
pub const MAX_PAGE: u32 = 500;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
    cache: Option<Cache>,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String, language: String, cache: Option<Cache>) -> Self {
        if cache.is_none() {
            tracing::info!("TMDB responses will not be cached");
        }

        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
            cache,
        }
    }

    fn validate_page(page: u32) -> AppResult<u32> {
        if (1..=MAX_PAGE).contains(&page) {
            Ok(page)
        } else {
            Err(AppError::InvalidInput(format!(
                "Page must be between 1 and {}",
                MAX_PAGE
            )))
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// GETs a TMDB endpoint and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let response = self
            .http_client
            .get(self.endpoint(path))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!(
                "Catalog has no resource at {}",
                path
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                path = %path,
                status = %status,
                body = %body,
                "TMDB request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "TMDB returned status {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(path = %path, error = %e, "Failed to deserialize TMDB response");
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })
    }

    async fn fetch_list(&self, path: &str, page: u32) -> AppResult<MoviePage> {
        let movies: MoviePage = self.get_json(path, &[("page", page.to_string())]).await?;

        tracing::info!(
            path = %path,
            page = page,
            results = movies.results.len(),
            provider = "tmdb",
            "Catalog list fetched"
        );

        Ok(movies)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn popular_movies(&self, page: u32) -> AppResult<MoviePage> {
        let page = Self::validate_page(page)?;

        cached!(
            self.cache.as_ref(),
            CacheKey::PopularMovies(page),
            LIST_CACHE_TTL,
            async move { self.fetch_list("/movie/popular", page).await }
        )
    }

    async fn top_rated_movies(&self, page: u32) -> AppResult<MoviePage> {
        let page = Self::validate_page(page)?;

        cached!(
            self.cache.as_ref(),
            CacheKey::TopRatedMovies(page),
            LIST_CACHE_TTL,
            async move { self.fetch_list("/movie/top_rated", page).await }
        )
    }

    async fn search_movies(&self, query: &str, page: u32) -> AppResult<MoviePage> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }
        let page = Self::validate_page(page)?;

        cached!(
            self.cache.as_ref(),
            CacheKey::MovieSearch {
                query: query.to_string(),
                page,
            },
            SEARCH_CACHE_TTL,
            async move {
                let movies: MoviePage = self
                    .get_json(
                        "/search/movie",
                        &[
                            ("query", query.to_string()),
                            ("page", page.to_string()),
                            ("include_adult", "false".to_string()),
                        ],
                    )
                    .await?;

                tracing::info!(
                    query = %query,
                    results = movies.results.len(),
                    provider = "tmdb",
                    "Movie search completed"
                );

                Ok::<_, AppError>(movies)
            }
        )
    }

    async fn movie_details(&self, movie_id: MovieId) -> AppResult<MovieDetails> {
        if movie_id <= 0 {
            return Err(AppError::InvalidInput(format!(
                "Invalid movie id {}",
                movie_id
            )));
        }

        cached!(
            self.cache.as_ref(),
            CacheKey::MovieDetails(movie_id),
            DETAILS_CACHE_TTL,
            async move {
                let details: TmdbMovieDetails = self
                    .get_json(
                        &format!("/movie/{}", movie_id),
                        &[("append_to_response", "credits".to_string())],
                    )
                    .await?;

                tracing::info!(movie_id = movie_id, provider = "tmdb", "Movie details fetched");

                Ok::<_, AppError>(MovieDetails::from(details))
            }
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
