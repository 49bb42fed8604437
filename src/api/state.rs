use std::sync::Arc;

use crate::models::Catalog;
use crate::services::RecommendationService;

/// Shared application state
///
/// Everything here is loaded once at startup and read-only for the process
/// lifetime, so the state is a plain `Arc` with no interior locking.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<AppStateInner>,
}

pub struct AppStateInner {
    pub catalog: Arc<Catalog>,
    pub recommender: RecommendationService,
    /// Fallback image URL substituted for unresolved posters
    pub poster_placeholder_url: String,
}

impl AppState {
    pub fn new(
        catalog: Arc<Catalog>,
        recommender: RecommendationService,
        poster_placeholder_url: String,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                catalog,
                recommender,
                poster_placeholder_url,
            }),
        }
    }
}
