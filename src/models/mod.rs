pub mod catalog;
pub mod recommendation;
pub mod similarity;

pub use catalog::{Catalog, CatalogEntry, MovieId};
pub use recommendation::{Poster, Recommendation, RecommendationSet};
pub use similarity::SimilarityMatrix;
