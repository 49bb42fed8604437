use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::models::{CatalogEntry, MovieId, Poster, RecommendationSet};
use crate::services::recommender::DEFAULT_COUNT;

use super::AppState;

// Request/Response types

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub movie_id: MovieId,
    pub title: String,
}

impl From<&CatalogEntry> for MovieResponse {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            movie_id: entry.movie_id,
            title: entry.title.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub title: String,
    pub count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendedMovieResponse {
    pub movie_id: MovieId,
    pub title: String,
    pub score: f32,
    pub poster_url: String,
    pub poster_resolved: bool,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub source_title: String,
    pub recommendations: Vec<RecommendedMovieResponse>,
    pub unresolved_posters: usize,
    pub generated_at: DateTime<Utc>,
}

impl RecommendationResponse {
    /// Substitutes the placeholder URL for unresolved posters
    ///
    /// The service layer reports resolution explicitly; what to show for an
    /// unresolved poster is a presentation decision made here.
    fn from_set(set: RecommendationSet, placeholder_url: &str) -> Self {
        let recommendations = set
            .recommendations
            .into_iter()
            .map(|r| {
                let (poster_url, poster_resolved) = match r.poster {
                    Poster::Resolved(url) => (url, true),
                    Poster::Unresolved => (placeholder_url.to_string(), false),
                };

                RecommendedMovieResponse {
                    movie_id: r.movie_id,
                    title: r.title,
                    score: r.score,
                    poster_url,
                    poster_resolved,
                }
            })
            .collect();

        Self {
            source_title: set.source_title,
            recommendations,
            unresolved_posters: set.unresolved_posters,
            generated_at: set.generated_at,
        }
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// List the catalog titles available for selection
pub async fn get_movies(State(state): State<AppState>) -> Json<Vec<MovieResponse>> {
    let movies: Vec<MovieResponse> = state
        .inner
        .catalog
        .entries()
        .iter()
        .map(MovieResponse::from)
        .collect();

    Json(movies)
}

/// Compute recommendations for a selected title
pub async fn get_recommendations(
    State(state): State<AppState>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    let count = params.count.unwrap_or(DEFAULT_COUNT);

    let set = state.inner.recommender.recommend(&params.title, count).await?;

    Ok(Json(RecommendationResponse::from_set(
        set,
        &state.inner.poster_placeholder_url,
    )))
}
