use serde::{Deserialize, Serialize};

/// External identifier for a movie, as used by the metadata API
pub type MovieId = u64;

/// One entry in the movie catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    pub movie_id: MovieId,
    pub title: String,
}

/// Ordered list of known movies
///
/// The position of an entry doubles as its row/column index into the
/// similarity matrix. Loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the entry at a given index position
    pub fn entry(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    /// Index of the first entry whose title matches exactly
    ///
    /// Titles are assumed unique; when they are not, the first match wins.
    pub fn position_of(&self, title: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.title == title)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}
