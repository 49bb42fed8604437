pub mod download;
pub mod loader;

pub use download::ensure_artifact;
pub use loader::{load_catalog, load_similarity, validate_consistency};
