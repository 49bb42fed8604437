use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::MovieId,
    services::providers::PosterProvider,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// TMDB metadata provider
///
/// Fetches movie details by TMDB id and extracts the poster path. Results,
/// including known-absent posters, are cached in memory for the process
/// lifetime; the courtesy delay applies only to actual network calls.
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_base_url: String,
    request_delay: Duration,
    poster_cache: RwLock<HashMap<MovieId, Option<String>>>,
}

/// Subset of the TMDB movie details response
#[derive(Debug, Deserialize)]
struct MovieDetails {
    #[serde(default)]
    poster_path: Option<String>,
}

impl TmdbProvider {
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http_client,
            api_key: config.tmdb_api_key.clone(),
            api_url: config.tmdb_api_url.trim_end_matches('/').to_string(),
            image_base_url: config.tmdb_image_base_url.trim_end_matches('/').to_string(),
            request_delay: Duration::from_millis(config.poster_request_delay_ms),
            poster_cache: RwLock::new(HashMap::new()),
        })
    }

    /// Full image URL for a TMDB poster path (paths start with '/')
    fn compose_poster_url(&self, poster_path: &str) -> String {
        format!("{}{}", self.image_base_url, poster_path)
    }

    async fn call_api(&self, movie_id: MovieId) -> AppResult<Option<String>> {
        // Courtesy delay to stay clear of the API rate limit
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }

        let url = format!("{}/movie/{}", self.api_url, movie_id);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", "en-US")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let details: MovieDetails = response.json().await?;

        Ok(details.poster_path.map(|path| self.compose_poster_url(&path)))
    }
}

#[async_trait::async_trait]
impl PosterProvider for TmdbProvider {
    async fn fetch_poster(&self, movie_id: MovieId) -> AppResult<Option<String>> {
        if let Some(cached) = self.poster_cache.read().await.get(&movie_id) {
            tracing::debug!(movie_id, "Poster cache hit");
            return Ok(cached.clone());
        }

        let poster_url = self.call_api(movie_id).await?;

        tracing::debug!(
            movie_id,
            resolved = poster_url.is_some(),
            provider = "tmdb",
            "Poster fetched"
        );

        // Errors are not cached so a transient failure can recover later
        self.poster_cache
            .write()
            .await
            .insert(movie_id, poster_url.clone());

        Ok(poster_url)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
