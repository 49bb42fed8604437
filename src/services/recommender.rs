use std::sync::Arc;

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{Catalog, Poster, Recommendation, RecommendationSet, SimilarityMatrix},
    services::providers::PosterProvider,
};

/// Default number of recommendations per lookup
pub const DEFAULT_COUNT: usize = 5;

/// Ranks every other catalog entry against the entry at `index`
///
/// Returns `(index, score)` pairs sorted by descending score, ties broken by
/// lower index first, with the selected index itself excluded. The row length
/// is guarded against the catalog size; a short row means a corrupt artifact.
pub fn rank_similar(
    matrix: &SimilarityMatrix,
    index: usize,
    catalog_size: usize,
    count: usize,
) -> AppResult<Vec<(usize, f32)>> {
    let row = matrix.row(index).ok_or_else(|| {
        AppError::Internal(format!("similarity matrix has no row for index {}", index))
    })?;

    if row.len() < catalog_size {
        return Err(AppError::DataFormat(format!(
            "similarity row {} has {} scores, expected {}",
            index,
            row.len(),
            catalog_size
        )));
    }

    let mut scored: Vec<(usize, f32)> = row
        .iter()
        .copied()
        .enumerate()
        .filter(|&(candidate, _)| candidate != index)
        .collect();

    // Stable sort keeps ties in ascending index order
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(count);

    Ok(scored)
}

/// Recommendation lookup service
///
/// Owns the read-only catalog and similarity matrix and resolves posters
/// through the configured provider, one request at a time.
pub struct RecommendationService {
    catalog: Arc<Catalog>,
    matrix: Arc<SimilarityMatrix>,
    provider: Arc<dyn PosterProvider>,
}

impl RecommendationService {
    pub fn new(
        catalog: Arc<Catalog>,
        matrix: Arc<SimilarityMatrix>,
        provider: Arc<dyn PosterProvider>,
    ) -> Self {
        Self {
            catalog,
            matrix,
            provider,
        }
    }

    /// Computes up to `count` recommendations for an exact catalog title
    ///
    /// Poster resolution is best-effort: a failed or absent poster becomes an
    /// unresolved marker and is counted in the result, never fatal.
    pub async fn recommend(&self, title: &str, count: usize) -> AppResult<RecommendationSet> {
        if title.trim().is_empty() {
            return Err(AppError::InvalidInput("Title cannot be empty".to_string()));
        }

        if count == 0 {
            return Err(AppError::InvalidInput(
                "Count must be at least 1".to_string(),
            ));
        }

        let index = self
            .catalog
            .position_of(title)
            .ok_or_else(|| AppError::NotFound(format!("Title '{}' is not in the catalog", title)))?;

        let ranked = rank_similar(&self.matrix, index, self.catalog.len(), count)?;

        let mut recommendations = Vec::with_capacity(ranked.len());
        let mut unresolved_posters = 0;

        // Posters are resolved one request at a time; the provider spaces out
        // the actual network calls.
        for (candidate, score) in ranked {
            let entry = self.catalog.entry(candidate).ok_or_else(|| {
                AppError::Internal(format!("catalog has no entry at index {}", candidate))
            })?;

            let poster = match self.provider.fetch_poster(entry.movie_id).await {
                Ok(Some(url)) => Poster::Resolved(url),
                Ok(None) => {
                    tracing::debug!(
                        movie_id = entry.movie_id,
                        title = %entry.title,
                        "No poster on record"
                    );
                    unresolved_posters += 1;
                    Poster::Unresolved
                }
                Err(e) => {
                    tracing::warn!(
                        movie_id = entry.movie_id,
                        title = %entry.title,
                        provider = self.provider.name(),
                        error = %e,
                        "Poster fetch failed"
                    );
                    unresolved_posters += 1;
                    Poster::Unresolved
                }
            };

            recommendations.push(Recommendation {
                movie_id: entry.movie_id,
                title: entry.title.clone(),
                score,
                poster,
            });
        }

        if unresolved_posters > 0 {
            tracing::info!(
                unresolved = unresolved_posters,
                total = recommendations.len(),
                source_title = %title,
                "Some posters could not be resolved"
            );
        }

        Ok(RecommendationSet {
            source_title: title.to_string(),
            recommendations,
            unresolved_posters,
            generated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CatalogEntry;
    use crate::services::providers::MockPosterProvider;

    fn catalog(titles: &[(u64, &str)]) -> Arc<Catalog> {
        Arc::new(Catalog::new(
            titles
                .iter()
                .map(|&(movie_id, title)| CatalogEntry {
                    movie_id,
                    title: title.to_string(),
                })
                .collect(),
        ))
    }

    fn abc_fixture() -> (Arc<Catalog>, Arc<SimilarityMatrix>) {
        let catalog = catalog(&[(1, "A"), (2, "B"), (3, "C")]);
        let matrix = Arc::new(
            SimilarityMatrix::from_rows(vec![
                vec![1.0, 0.9, 0.1],
                vec![0.9, 1.0, 0.2],
                vec![0.1, 0.2, 1.0],
            ])
            .unwrap(),
        );
        (catalog, matrix)
    }

    fn resolving_provider() -> MockPosterProvider {
        let mut provider = MockPosterProvider::new();
        provider
            .expect_fetch_poster()
            .returning(|movie_id| Ok(Some(format!("https://posters.test/{}.jpg", movie_id))));
        provider.expect_name().return_const("mock");
        provider
    }

    #[tokio::test]
    async fn test_top_two_for_a_returns_b_then_c() {
        let (catalog, matrix) = abc_fixture();
        let service = RecommendationService::new(catalog, matrix, Arc::new(resolving_provider()));

        let result = service.recommend("A", 2).await.unwrap();

        let titles: Vec<&str> = result
            .recommendations
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(titles, vec!["B", "C"]);
    }

    #[tokio::test]
    async fn test_selected_title_never_recommended() {
        let (catalog, matrix) = abc_fixture();
        let service = RecommendationService::new(catalog, matrix, Arc::new(resolving_provider()));

        for title in ["A", "B", "C"] {
            let result = service.recommend(title, 2).await.unwrap();
            assert!(
                result.recommendations.iter().all(|r| r.title != title),
                "{} recommended itself",
                title
            );
        }
    }

    #[tokio::test]
    async fn test_scores_are_non_increasing() {
        let catalog = catalog(&[(1, "A"), (2, "B"), (3, "C"), (4, "D"), (5, "E"), (6, "F")]);
        let matrix = Arc::new(
            SimilarityMatrix::from_rows(vec![
                vec![1.0, 0.3, 0.8, 0.1, 0.8, 0.5],
                vec![0.3, 1.0, 0.2, 0.9, 0.4, 0.6],
                vec![0.8, 0.2, 1.0, 0.3, 0.7, 0.1],
                vec![0.1, 0.9, 0.3, 1.0, 0.2, 0.4],
                vec![0.8, 0.4, 0.7, 0.2, 1.0, 0.3],
                vec![0.5, 0.6, 0.1, 0.4, 0.3, 1.0],
            ])
            .unwrap(),
        );
        let service = RecommendationService::new(catalog, matrix, Arc::new(resolving_provider()));

        let result = service.recommend("A", 5).await.unwrap();

        assert_eq!(result.recommendations.len(), 5);
        for pair in result.recommendations.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[tokio::test]
    async fn test_tied_scores_keep_ascending_index_order() {
        let (catalog, _) = abc_fixture();
        let matrix = Arc::new(
            SimilarityMatrix::from_rows(vec![
                vec![1.0, 0.5, 0.5],
                vec![0.5, 1.0, 0.5],
                vec![0.5, 0.5, 1.0],
            ])
            .unwrap(),
        );
        let service = RecommendationService::new(catalog, matrix, Arc::new(resolving_provider()));

        let result = service.recommend("A", 2).await.unwrap();

        let titles: Vec<&str> = result
            .recommendations
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(titles, vec!["B", "C"]);
    }

    #[tokio::test]
    async fn test_single_poster_failure_does_not_abort_lookup() {
        let (catalog, matrix) = abc_fixture();

        let mut provider = MockPosterProvider::new();
        provider.expect_fetch_poster().returning(|movie_id| {
            if movie_id == 2 {
                Err(AppError::ExternalApi("boom".to_string()))
            } else {
                Ok(Some(format!("https://posters.test/{}.jpg", movie_id)))
            }
        });
        provider.expect_name().return_const("mock");

        let service = RecommendationService::new(catalog, matrix, Arc::new(provider));

        let result = service.recommend("A", 2).await.unwrap();

        assert_eq!(result.recommendations.len(), 2);
        assert_eq!(result.unresolved_posters, 1);
        assert_eq!(result.recommendations[0].poster, Poster::Unresolved);
        assert!(result.recommendations[1].poster.is_resolved());
    }

    #[tokio::test]
    async fn test_absent_poster_counts_as_unresolved() {
        let (catalog, matrix) = abc_fixture();

        let mut provider = MockPosterProvider::new();
        provider.expect_fetch_poster().returning(|_| Ok(None));
        provider.expect_name().return_const("mock");

        let service = RecommendationService::new(catalog, matrix, Arc::new(provider));

        let result = service.recommend("C", 2).await.unwrap();

        assert_eq!(result.recommendations.len(), 2);
        assert_eq!(result.unresolved_posters, 2);
    }

    #[tokio::test]
    async fn test_unknown_title_is_not_found() {
        let (catalog, matrix) = abc_fixture();
        let service = RecommendationService::new(catalog, matrix, Arc::new(resolving_provider()));

        let err = service.recommend("Z", 5).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_empty_title_is_invalid_input() {
        let (catalog, matrix) = abc_fixture();
        let service = RecommendationService::new(catalog, matrix, Arc::new(resolving_provider()));

        let err = service.recommend("  ", 5).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_zero_count_is_invalid_input() {
        let (catalog, matrix) = abc_fixture();
        let service = RecommendationService::new(catalog, matrix, Arc::new(resolving_provider()));

        let err = service.recommend("A", 0).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_count_clamped_to_catalog_size() {
        let (catalog, matrix) = abc_fixture();
        let service = RecommendationService::new(catalog, matrix, Arc::new(resolving_provider()));

        let result = service.recommend("A", 50).await.unwrap();
        assert_eq!(result.recommendations.len(), 2);
    }

    #[test]
    fn test_rank_similar_guards_short_row() {
        // 2x2 matrix paired with a 3-entry catalog: the row is too short
        let matrix =
            SimilarityMatrix::from_rows(vec![vec![1.0, 0.5], vec![0.5, 1.0]]).unwrap();

        let err = rank_similar(&matrix, 0, 3, 5).unwrap_err();
        assert!(matches!(err, AppError::DataFormat(_)));
    }

    #[test]
    fn test_rank_similar_missing_row_is_internal_error() {
        let matrix = SimilarityMatrix::from_rows(vec![vec![1.0]]).unwrap();

        let err = rank_similar(&matrix, 5, 1, 5).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
