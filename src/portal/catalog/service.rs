use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{CatalogEntry, CitizenProfile, EntryDraft, EntryId, EntryKind};
use super::eligibility::{self, MatchRanker};
use super::repository::{CatalogError, CatalogQuery, CatalogRepository};
use crate::portal::admin::AdminId;

static ENTRY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_entry_id() -> EntryId {
    let id = ENTRY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    EntryId(format!("ent-{id:06}"))
}

/// Service wrapping the catalog store with listing, matching, and the
/// admin-facing entry lifecycle. The optional ranker re-orders matched
/// results without touching filter semantics.
pub struct CatalogService<R> {
    repository: Arc<R>,
    ranker: Option<Arc<dyn MatchRanker>>,
}

impl<R> CatalogService<R>
where
    R: CatalogRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            ranker: None,
        }
    }

    pub fn with_ranker(repository: Arc<R>, ranker: Arc<dyn MatchRanker>) -> Self {
        Self {
            repository,
            ranker: Some(ranker),
        }
    }

    /// Active entries of one kind, newest first.
    pub fn listing(&self, kind: EntryKind) -> Result<Vec<CatalogEntry>, CatalogServiceError> {
        let mut entries = self.repository.list(CatalogQuery::active(kind))?;
        sort_newest_first(&mut entries);
        Ok(entries)
    }

    /// The active listing filtered down to entries whose eligibility rules
    /// admit `profile`, preserving the listing order.
    pub fn matched_listing(
        &self,
        kind: EntryKind,
        profile: &CitizenProfile,
    ) -> Result<Vec<CatalogEntry>, CatalogServiceError> {
        let entries = self.listing(kind)?;
        let ranker = self.ranker.as_deref();
        Ok(eligibility::filter_and_rank(entries, profile, ranker))
    }

    /// Every entry regardless of kind or active flag, newest first.
    pub fn all_entries(&self) -> Result<Vec<CatalogEntry>, CatalogServiceError> {
        let mut entries = self.repository.list(CatalogQuery::everything())?;
        sort_newest_first(&mut entries);
        Ok(entries)
    }

    pub fn add_entry(
        &self,
        draft: EntryDraft,
        added_by: Option<AdminId>,
    ) -> Result<CatalogEntry, CatalogServiceError> {
        validate_draft(&draft)?;

        let entry = CatalogEntry {
            id: next_entry_id(),
            kind: draft.kind,
            title: draft.title,
            description: draft.description,
            benefits: draft.benefits,
            application_process: draft.application_process,
            documents: draft.documents,
            video_link: draft.video_link,
            application_link: draft.application_link,
            last_date: draft.last_date,
            is_active: draft.is_active,
            eligibility: draft.eligibility,
            created_at: Utc::now(),
            added_by,
        };

        let stored = self.repository.insert(entry)?;
        info!(entry = %stored.id.0, kind = %stored.kind, "catalog entry added");
        Ok(stored)
    }

    /// Replace an entry's content while keeping its identity, creation
    /// stamp, and provenance.
    pub fn update_entry(
        &self,
        id: &EntryId,
        draft: EntryDraft,
    ) -> Result<CatalogEntry, CatalogServiceError> {
        validate_draft(&draft)?;

        let existing = self.repository.fetch(id)?.ok_or(CatalogError::NotFound)?;
        let updated = CatalogEntry {
            id: existing.id.clone(),
            kind: draft.kind,
            title: draft.title,
            description: draft.description,
            benefits: draft.benefits,
            application_process: draft.application_process,
            documents: draft.documents,
            video_link: draft.video_link,
            application_link: draft.application_link,
            last_date: draft.last_date,
            is_active: draft.is_active,
            eligibility: draft.eligibility,
            created_at: existing.created_at,
            added_by: existing.added_by,
        };

        self.repository.update(updated.clone())?;
        Ok(updated)
    }

    /// Soft delete: the entry disappears from public listings but stays in
    /// the store for the admin view.
    pub fn deactivate_entry(&self, id: &EntryId) -> Result<(), CatalogServiceError> {
        let mut entry = self.repository.fetch(id)?.ok_or(CatalogError::NotFound)?;
        entry.is_active = false;
        self.repository.update(entry)?;
        info!(entry = %id.0, "catalog entry deactivated");
        Ok(())
    }
}

fn sort_newest_first(entries: &mut [CatalogEntry]) {
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

fn validate_draft(draft: &EntryDraft) -> Result<(), CatalogServiceError> {
    if draft.title.trim().is_empty() {
        return Err(CatalogServiceError::MissingField("title"));
    }
    if draft.description.trim().is_empty() {
        return Err(CatalogServiceError::MissingField("description"));
    }
    for (field, link) in [
        ("video_link", &draft.video_link),
        ("application_link", &draft.application_link),
    ] {
        if let Some(link) = link {
            if !(link.starts_with("http://") || link.starts_with("https://")) {
                return Err(CatalogServiceError::InvalidLink(field));
            }
        }
    }
    Ok(())
}

/// Error raised by the catalog service.
#[derive(Debug, thiserror::Error)]
pub enum CatalogServiceError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{0} must be an http(s) URL")]
    InvalidLink(&'static str),
    #[error(transparent)]
    Repository(#[from] CatalogError),
}
