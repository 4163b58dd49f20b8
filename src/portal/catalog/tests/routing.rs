use super::common::*;
use crate::portal::catalog::domain::{Category, CitizenProfile, EligibilityRules, EntryKind};
use crate::portal::catalog::router::catalog_router;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

#[tokio::test]
async fn listing_route_returns_envelope_with_total() {
    let (catalog, repository) = build_catalog_service();
    let (accounts, _) = build_account_service();
    seed(
        &repository,
        vec![
            entry("ent-a", EntryKind::Scheme, 0, EligibilityRules::default()),
            entry("ent-b", EntryKind::Scheme, 1, EligibilityRules::default()),
        ],
    );
    let router = catalog_router(catalog, accounts);

    let response = router
        .oneshot(
            Request::get("/api/v1/catalog/schemes")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["total"], 2);
    assert_eq!(payload["items"].as_array().expect("items array").len(), 2);
}

#[tokio::test]
async fn unknown_kind_is_a_not_found() {
    let (catalog, _) = build_catalog_service();
    let (accounts, _) = build_account_service();
    let router = catalog_router(catalog, accounts);

    let response = router
        .oneshot(
            Request::get("/api/v1/catalog/grants")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn matched_route_requires_a_bearer_token() {
    let (catalog, _) = build_catalog_service();
    let (accounts, _) = build_account_service();
    let router = catalog_router(catalog, accounts);

    let response = router
        .oneshot(
            Request::get("/api/v1/catalog/schemes/matched")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn matched_route_filters_with_the_stored_profile() {
    let (catalog, repository) = build_catalog_service();
    let (accounts, mailer) = build_account_service();
    seed(
        &repository,
        vec![
            entry(
                "ent-open",
                EntryKind::Scholarship,
                0,
                EligibilityRules::default(),
            ),
            entry(
                "ent-ews",
                EntryKind::Scholarship,
                1,
                category_rules(&[Category::Ews]),
            ),
            entry(
                "ent-sc",
                EntryKind::Scholarship,
                2,
                category_rules(&[Category::Sc]),
            ),
        ],
    );

    let token = citizen_token(
        &accounts,
        &mailer,
        "asha@example.in",
        CitizenProfile {
            category: Some(Category::Sc),
            ..CitizenProfile::default()
        },
    );
    let router = catalog_router(catalog, accounts);

    let response = router
        .oneshot(
            Request::get("/api/v1/catalog/scholarships/matched")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["total"], 2);
    let ids: Vec<&str> = payload["items"]
        .as_array()
        .expect("items array")
        .iter()
        .map(|item| item["id"].as_str().expect("id string"))
        .collect();
    assert_eq!(ids, vec!["ent-sc", "ent-open"]);
}

#[tokio::test]
async fn matched_route_with_empty_profile_returns_open_entries_only() {
    let (catalog, repository) = build_catalog_service();
    let (accounts, mailer) = build_account_service();
    seed(
        &repository,
        vec![
            entry("ent-open", EntryKind::Scheme, 0, EligibilityRules::default()),
            entry(
                "ent-aged",
                EntryKind::Scheme,
                1,
                EligibilityRules {
                    age_min: Some(18),
                    ..EligibilityRules::default()
                },
            ),
        ],
    );

    let token = citizen_token(
        &accounts,
        &mailer,
        "blank@example.in",
        CitizenProfile::default(),
    );
    let router = catalog_router(catalog, accounts);

    let response = router
        .oneshot(
            Request::get("/api/v1/catalog/schemes/matched")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["total"], 1);
    assert_eq!(payload["items"][0]["id"], "ent-open");
}
