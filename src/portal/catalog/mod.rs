//! Scheme and scholarship catalog: domain records, the eligibility matching
//! engine, storage traits, and the public HTTP surface.

pub mod domain;
pub mod eligibility;
pub mod ingest;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    CatalogEntry, Category, CitizenProfile, Disability, EducationLevel, EligibilityRules,
    EntryDraft, EntryId, EntryKind, Gender, IncomeBand, MaritalStatus, Occupation,
};
pub use eligibility::{filter_and_rank, filter_eligible, matches, MatchRanker};
pub use ingest::{drafts_from_path, drafts_from_reader, CatalogImportError};
pub use repository::{CatalogError, CatalogQuery, CatalogRepository};
pub use router::catalog_router;
pub use service::{CatalogService, CatalogServiceError};
