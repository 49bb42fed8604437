use std::path::Path;

use crate::error::{AppError, AppResult};
use crate::models::{Catalog, SimilarityMatrix};

/// Parses the catalog artifact: a JSON array of `{movie_id, title}` objects
pub fn parse_catalog(raw: &str) -> AppResult<Catalog> {
    let catalog: Catalog = serde_json::from_str(raw)
        .map_err(|e| AppError::DataFormat(format!("invalid catalog artifact: {}", e)))?;

    if catalog.is_empty() {
        return Err(AppError::DataFormat(
            "catalog artifact contains no movies".to_string(),
        ));
    }

    Ok(catalog)
}

/// Parses the similarity artifact: a JSON array of score rows
pub fn parse_similarity(raw: &str) -> AppResult<SimilarityMatrix> {
    let rows: Vec<Vec<f32>> = serde_json::from_str(raw)
        .map_err(|e| AppError::DataFormat(format!("invalid similarity artifact: {}", e)))?;

    SimilarityMatrix::from_rows(rows)
}

/// Loads and parses the catalog artifact from disk
pub async fn load_catalog(path: &Path) -> AppResult<Catalog> {
    tracing::info!(path = %path.display(), "Loading catalog artifact");

    let raw = tokio::fs::read_to_string(path).await?;
    let catalog = parse_catalog(&raw)?;

    tracing::info!(movies = catalog.len(), "Catalog loaded");

    Ok(catalog)
}

/// Loads and parses the similarity artifact from disk
pub async fn load_similarity(path: &Path) -> AppResult<SimilarityMatrix> {
    tracing::info!(path = %path.display(), "Loading similarity artifact");

    let raw = tokio::fs::read_to_string(path).await?;
    let matrix = parse_similarity(&raw)?;

    tracing::info!(rows = matrix.len(), "Similarity matrix loaded");

    Ok(matrix)
}

/// Checks that the similarity matrix covers the whole catalog
///
/// The two artifacts are built together by the offline pipeline; a size
/// mismatch means one of them is stale or truncated.
pub fn validate_consistency(catalog: &Catalog, matrix: &SimilarityMatrix) -> AppResult<()> {
    if matrix.len() != catalog.len() {
        return Err(AppError::DataFormat(format!(
            "similarity matrix has {} rows but the catalog has {} movies",
            matrix.len(),
            catalog.len()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CatalogEntry;

    #[test]
    fn test_parse_catalog_valid() {
        let raw = r#"[{"movie_id": 19995, "title": "Avatar"}]"#;
        let catalog = parse_catalog(raw).unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.entry(0),
            Some(&CatalogEntry {
                movie_id: 19995,
                title: "Avatar".to_string()
            })
        );
    }

    #[test]
    fn test_parse_catalog_rejects_empty_array() {
        let err = parse_catalog("[]").unwrap_err();
        assert!(err.to_string().contains("no movies"));
    }

    #[test]
    fn test_parse_catalog_rejects_malformed_json() {
        let err = parse_catalog(r#"[{"movie_id": "not-a-number"}]"#).unwrap_err();
        assert!(matches!(err, AppError::DataFormat(_)));
    }

    #[test]
    fn test_parse_similarity_valid() {
        let raw = "[[1.0, 0.9], [0.9, 1.0]]";
        let matrix = parse_similarity(raw).unwrap();

        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix.row(1), Some([0.9, 1.0].as_slice()));
    }

    #[test]
    fn test_parse_similarity_rejects_ragged_rows() {
        let err = parse_similarity("[[1.0, 0.9], [0.9]]").unwrap_err();
        assert!(err.to_string().contains("not square"));
    }

    #[test]
    fn test_validate_consistency_matching_sizes() {
        let catalog = parse_catalog(
            r#"[{"movie_id": 1, "title": "A"}, {"movie_id": 2, "title": "B"}]"#,
        )
        .unwrap();
        let matrix = parse_similarity("[[1.0, 0.5], [0.5, 1.0]]").unwrap();

        assert!(validate_consistency(&catalog, &matrix).is_ok());
    }

    #[test]
    fn test_validate_consistency_size_mismatch() {
        let catalog = parse_catalog(r#"[{"movie_id": 1, "title": "A"}]"#).unwrap();
        let matrix = parse_similarity("[[1.0, 0.5], [0.5, 1.0]]").unwrap();

        let err = validate_consistency(&catalog, &matrix).unwrap_err();
        assert!(err.to_string().contains("2 rows"));
        assert!(err.to_string().contains("1 movies"));
    }
}
