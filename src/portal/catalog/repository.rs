use super::domain::{CatalogEntry, EntryId, EntryKind};

/// Storage filter for catalog listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogQuery {
    pub kind: Option<EntryKind>,
    pub active_only: bool,
}

impl CatalogQuery {
    pub fn active(kind: EntryKind) -> Self {
        Self {
            kind: Some(kind),
            active_only: true,
        }
    }

    pub fn everything() -> Self {
        Self::default()
    }
}

/// Storage abstraction so the catalog service can be exercised in isolation.
pub trait CatalogRepository: Send + Sync {
    fn insert(&self, entry: CatalogEntry) -> Result<CatalogEntry, CatalogError>;
    fn update(&self, entry: CatalogEntry) -> Result<(), CatalogError>;
    fn fetch(&self, id: &EntryId) -> Result<Option<CatalogEntry>, CatalogError>;
    fn list(&self, query: CatalogQuery) -> Result<Vec<CatalogEntry>, CatalogError>;
}

/// Error enumeration for catalog storage failures.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("entry already exists")]
    Conflict,
    #[error("entry not found")]
    NotFound,
    #[error("catalog store unavailable: {0}")]
    Unavailable(String),
}
