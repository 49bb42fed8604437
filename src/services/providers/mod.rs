//! Poster metadata provider abstraction
//!
//! Pluggable seam for the external movie-metadata source. A provider resolves
//! the poster image URL for an external movie id.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::AppResult;
use crate::models::MovieId;

pub mod tmdb;

/// Trait for poster metadata providers
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PosterProvider: Send + Sync {
    /// Resolve the poster URL for a movie
    ///
    /// Errors cover transport failures and non-success API responses; an id
    /// the provider knows but has no poster for is `Ok(None)`.
    async fn fetch_poster(&self, movie_id: MovieId) -> AppResult<Option<String>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
