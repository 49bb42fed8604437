use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::MovieId;

/// Outcome of poster resolution for a single recommendation
///
/// Resolution is best-effort: a failed or absent poster becomes `Unresolved`
/// instead of aborting the lookup, and the presentation layer decides what to
/// show in its place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "status", content = "url")]
pub enum Poster {
    Resolved(String),
    Unresolved,
}

impl Poster {
    pub fn url(&self) -> Option<&str> {
        match self {
            Poster::Resolved(url) => Some(url),
            Poster::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Poster::Resolved(_))
    }
}

/// A single recommended movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub movie_id: MovieId,
    pub title: String,
    /// Similarity score between this movie and the selected title
    pub score: f32,
    pub poster: Poster,
}

/// Full result of one recommendation lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationSet {
    /// The title the recommendations were computed for
    pub source_title: String,
    /// Recommendations ranked by non-increasing similarity score
    pub recommendations: Vec<Recommendation>,
    /// How many posters could not be resolved
    pub unresolved_posters: usize,
    pub generated_at: DateTime<Utc>,
}
