use crate::error::{AppError, AppResult};

/// Precomputed pairwise similarity scores between catalog entries
///
/// `row(i)[j]` is the similarity between catalog entries `i` and `j`.
/// Symmetric by convention, not enforced.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    rows: Vec<Vec<f32>>,
}

impl SimilarityMatrix {
    /// Builds a matrix from raw rows, validating shape and scores
    ///
    /// Every row must have as many columns as there are rows, and every
    /// score must be finite. A violation means the artifact is corrupt.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> AppResult<Self> {
        let size = rows.len();

        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(AppError::DataFormat(format!(
                    "similarity matrix is not square: row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    size
                )));
            }

            if let Some(j) = row.iter().position(|score| !score.is_finite()) {
                return Err(AppError::DataFormat(format!(
                    "similarity matrix contains a non-finite score at [{}][{}]",
                    i, j
                )));
            }
        }

        Ok(Self { rows })
    }

    /// Number of rows (= number of catalog entries the matrix was built for)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Similarity scores between entry `index` and every catalog entry
    pub fn row(&self, index: usize) -> Option<&[f32]> {
        self.rows.get(index).map(|row| row.as_slice())
    }
}
