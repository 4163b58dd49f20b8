use std::sync::Arc;

use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::portal::accounts::service::AccountService;
use crate::portal::catalog::domain::{
    CatalogEntry, Category, CitizenProfile, EligibilityRules, EntryDraft, EntryId, EntryKind,
};
use crate::portal::catalog::repository::CatalogRepository;
use crate::portal::catalog::service::CatalogService;
use crate::portal::infra::{
    DigestPasswordHasher, InMemoryAccountRepository, InMemoryCatalogRepository,
    InMemoryTokenAuthority, RecordingOtpMailer, SequenceCodeSource,
};

/// Catalog entry with explicit identity and creation stamp so ordering
/// assertions stay deterministic.
pub(super) fn entry(id: &str, kind: EntryKind, minute: u32, rules: EligibilityRules) -> CatalogEntry {
    CatalogEntry {
        id: EntryId(id.to_string()),
        kind,
        title: format!("{id} title"),
        description: format!("{id} description"),
        benefits: None,
        application_process: None,
        documents: Vec::new(),
        video_link: None,
        application_link: None,
        last_date: None,
        is_active: true,
        eligibility: rules,
        created_at: Utc
            .with_ymd_and_hms(2025, 6, 1, 12, minute, 0)
            .single()
            .expect("valid timestamp"),
        added_by: None,
    }
}

pub(super) fn draft(title: &str, kind: EntryKind, rules: EligibilityRules) -> EntryDraft {
    EntryDraft {
        kind,
        title: title.to_string(),
        description: format!("{title} description"),
        benefits: None,
        application_process: None,
        documents: Vec::new(),
        video_link: None,
        application_link: None,
        last_date: None,
        is_active: true,
        eligibility: rules,
    }
}

pub(super) fn category_rules(categories: &[Category]) -> EligibilityRules {
    EligibilityRules {
        category: categories.to_vec(),
        ..EligibilityRules::default()
    }
}

pub(super) fn profile_with_category(category: Category) -> CitizenProfile {
    CitizenProfile {
        category: Some(category),
        ..CitizenProfile::default()
    }
}

pub(super) fn build_catalog_service() -> (
    Arc<CatalogService<InMemoryCatalogRepository>>,
    Arc<InMemoryCatalogRepository>,
) {
    let repository = Arc::new(InMemoryCatalogRepository::default());
    let service = Arc::new(CatalogService::new(repository.clone()));
    (service, repository)
}

pub(super) fn seed(repository: &InMemoryCatalogRepository, entries: Vec<CatalogEntry>) {
    for entry in entries {
        repository.insert(entry).expect("seed entry inserts");
    }
}

/// Account service wired with recording adapters, for routes that resolve
/// the caller's stored profile.
pub(super) fn build_account_service() -> (
    Arc<AccountService<InMemoryAccountRepository, RecordingOtpMailer>>,
    Arc<RecordingOtpMailer>,
) {
    let repository = Arc::new(InMemoryAccountRepository::default());
    let mailer = Arc::new(RecordingOtpMailer::default());
    let service = Arc::new(AccountService::new(
        repository,
        mailer.clone(),
        Arc::new(SequenceCodeSource::default()),
        Arc::new(DigestPasswordHasher),
        Arc::new(InMemoryTokenAuthority::default()),
    ));
    (service, mailer)
}

/// Drive the signup flow and return a bearer token for a citizen whose
/// stored profile is `profile`.
pub(super) fn citizen_token(
    service: &AccountService<InMemoryAccountRepository, RecordingOtpMailer>,
    mailer: &RecordingOtpMailer,
    email: &str,
    profile: CitizenProfile,
) -> String {
    service.send_otp(email).expect("otp dispatches");
    let code = mailer.last_code_for(email).expect("code recorded");
    let view = service.verify_otp(email, &code).expect("otp verifies");
    service
        .update_profile(&view.id, profile)
        .expect("profile stores");
    let session = service
        .set_password(email, "passw0rd")
        .expect("signup completes");
    session.token
}

pub(super) async fn read_json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("body is json")
}
