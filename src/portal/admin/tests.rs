use std::sync::Arc;

use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::router::admin_router;
use super::service::{AdminError, AdminService};
use crate::portal::accounts::service::AccountService;
use crate::portal::catalog::service::CatalogService;
use crate::portal::infra::{
    DigestPasswordHasher, InMemoryAccountRepository, InMemoryAdminRepository,
    InMemoryCatalogRepository, InMemoryTokenAuthority, RecordingOtpMailer, SequenceCodeSource,
};
use crate::portal::security::{PortalRole, TokenAuthority, TokenSubject};

struct Fixture {
    admins: Arc<AdminService<InMemoryAdminRepository>>,
    catalog: Arc<CatalogService<InMemoryCatalogRepository>>,
    accounts: Arc<AccountService<InMemoryAccountRepository, RecordingOtpMailer>>,
    tokens: Arc<InMemoryTokenAuthority>,
}

fn fixture() -> Fixture {
    let hasher = Arc::new(DigestPasswordHasher);
    let tokens = Arc::new(InMemoryTokenAuthority::default());

    let admins = Arc::new(AdminService::new(
        Arc::new(InMemoryAdminRepository::default()),
        hasher.clone(),
        tokens.clone(),
    ));
    let catalog = Arc::new(CatalogService::new(Arc::new(
        InMemoryCatalogRepository::default(),
    )));
    let accounts = Arc::new(AccountService::new(
        Arc::new(InMemoryAccountRepository::default()),
        Arc::new(RecordingOtpMailer::default()),
        Arc::new(SequenceCodeSource::default()),
        hasher,
        tokens.clone(),
    ));

    Fixture {
        admins,
        catalog,
        accounts,
        tokens,
    }
}

fn admin_token(fx: &Fixture) -> String {
    fx.admins
        .create("ops@portal.in", "s3cret", "Ops Admin")
        .expect("admin creates");
    fx.admins
        .login("ops@portal.in", "s3cret")
        .expect("admin logs in")
        .token
}

fn scheme_draft(title: &str) -> Value {
    json!({
        "kind": "scheme",
        "title": title,
        "description": format!("{title} description"),
        "eligibility": { "category": ["sc", "st"], "age_min": 18 }
    })
}

async fn read_json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("body is json")
}

fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<axum::body::Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(
                serde_json::to_vec(&body).expect("body serializes"),
            ))
            .expect("request builds"),
        None => builder
            .body(axum::body::Body::empty())
            .expect("request builds"),
    }
}

#[test]
fn create_then_login_round_trip() {
    let fx = fixture();
    let view = fx
        .admins
        .create("ops@portal.in", "s3cret", "Ops Admin")
        .expect("admin creates");
    assert_eq!(view.email, "ops@portal.in");

    let session = fx
        .admins
        .login("OPS@portal.in", "s3cret")
        .expect("email comparison is case-insensitive");
    assert!(!session.token.is_empty());

    assert!(matches!(
        fx.admins.login("ops@portal.in", "wrong"),
        Err(AdminError::InvalidCredentials)
    ));
}

#[test]
fn duplicate_admin_emails_are_rejected() {
    let fx = fixture();
    fx.admins
        .create("ops@portal.in", "s3cret", "Ops Admin")
        .expect("first creates");
    assert!(matches!(
        fx.admins.create("ops@portal.in", "other", "Second"),
        Err(AdminError::AlreadyExists)
    ));
}

#[test]
fn blank_fields_are_rejected_at_creation() {
    let fx = fixture();
    assert!(matches!(
        fx.admins.create("", "pw", "Name"),
        Err(AdminError::MissingFields)
    ));
    assert!(matches!(
        fx.admins.create("a@b.in", "", "Name"),
        Err(AdminError::MissingFields)
    ));
}

#[test]
fn citizen_tokens_do_not_authenticate_as_admins() {
    let fx = fixture();
    let citizen_token = fx.tokens.issue(TokenSubject {
        subject_id: "usr-000001".to_string(),
        role: PortalRole::Citizen,
    });

    let mut headers = axum::http::HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        format!("Bearer {citizen_token}").parse().expect("header"),
    );
    assert!(matches!(
        fx.admins.authenticate(&headers),
        Err(AdminError::Token(_))
    ));
}

#[tokio::test]
async fn catalog_management_requires_an_admin_token() {
    let fx = fixture();
    let router = admin_router(fx.admins.clone(), fx.catalog.clone(), fx.accounts.clone());

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/admin/catalog",
            None,
            Some(scheme_draft("Unauthorized")),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_can_add_update_and_deactivate_entries() {
    let fx = fixture();
    let token = admin_token(&fx);
    let router = admin_router(fx.admins.clone(), fx.catalog.clone(), fx.accounts.clone());

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/admin/catalog",
            Some(&token),
            Some(scheme_draft("Tribal Welfare Grant")),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    let entry_id = payload["entry"]["id"].as_str().expect("id string").to_string();
    assert!(payload["entry"]["added_by"].as_str().is_some());

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/v1/admin/catalog/{entry_id}"),
            Some(&token),
            Some(scheme_draft("Tribal Welfare Grant v2")),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["entry"]["title"], "Tribal Welfare Grant v2");

    let response = router
        .clone()
        .oneshot(json_request(
            "DELETE",
            &format!("/api/v1/admin/catalog/{entry_id}"),
            Some(&token),
            None,
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    // gone from the public listing, still visible to the back office
    let public = fx
        .catalog
        .listing(crate::portal::catalog::EntryKind::Scheme)
        .expect("listing succeeds");
    assert!(public.iter().all(|entry| entry.id.0 != entry_id));

    let response = router
        .oneshot(json_request(
            "GET",
            "/api/v1/admin/catalog",
            Some(&token),
            None,
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["total"], 1);
    assert_eq!(payload["items"][0]["is_active"], false);
}

#[tokio::test]
async fn invalid_drafts_are_unprocessable() {
    let fx = fixture();
    let token = admin_token(&fx);
    let router = admin_router(fx.admins.clone(), fx.catalog.clone(), fx.accounts.clone());

    let mut draft = scheme_draft("Linked");
    draft["video_link"] = json!("javascript:alert(1)");

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/admin/catalog",
            Some(&token),
            Some(draft),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn user_directory_is_admin_only() {
    let fx = fixture();
    let token = admin_token(&fx);
    let router = admin_router(fx.admins.clone(), fx.catalog.clone(), fx.accounts.clone());

    let response = router
        .clone()
        .oneshot(json_request("GET", "/api/v1/admin/users", None, None))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = router
        .oneshot(json_request("GET", "/api/v1/admin/users", Some(&token), None))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["total"], 0);
}

#[tokio::test]
async fn admin_login_route_issues_sessions() {
    let fx = fixture();
    fx.admins
        .create("ops@portal.in", "s3cret", "Ops Admin")
        .expect("admin creates");
    let router = admin_router(fx.admins.clone(), fx.catalog.clone(), fx.accounts.clone());

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/admin/login",
            None,
            Some(json!({ "email": "ops@portal.in", "password": "s3cret" })),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert!(payload["token"].as_str().is_some());
    assert_eq!(payload["admin"]["role"], "admin");

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/admin/login",
            None,
            Some(json!({ "email": "ops@portal.in", "password": "nope" })),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
