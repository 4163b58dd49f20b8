use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use super::domain::EntryKind;
use super::repository::CatalogRepository;
use super::service::CatalogService;
use crate::portal::accounts::repository::{AccountRepository, OtpMailer};
use crate::portal::accounts::service::{AccountError, AccountService};

/// Shared state for the public catalog routes. The matched listing needs
/// the account service to resolve the caller's stored profile.
pub struct CatalogRoutes<R, U, M> {
    catalog: Arc<CatalogService<R>>,
    accounts: Arc<AccountService<U, M>>,
}

impl<R, U, M> Clone for CatalogRoutes<R, U, M> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            accounts: Arc::clone(&self.accounts),
        }
    }
}

/// Router builder exposing the public catalog listings.
pub fn catalog_router<R, U, M>(
    catalog: Arc<CatalogService<R>>,
    accounts: Arc<AccountService<U, M>>,
) -> Router
where
    R: CatalogRepository + 'static,
    U: AccountRepository + 'static,
    M: OtpMailer + 'static,
{
    Router::new()
        .route("/api/v1/catalog/:kind", get(listing_handler::<R, U, M>))
        .route(
            "/api/v1/catalog/:kind/matched",
            get(matched_handler::<R, U, M>),
        )
        .with_state(CatalogRoutes { catalog, accounts })
}

fn parse_kind(raw: &str) -> Result<EntryKind, Response> {
    raw.parse::<EntryKind>().map_err(|message| {
        (StatusCode::NOT_FOUND, axum::Json(json!({ "error": message }))).into_response()
    })
}

pub(crate) async fn listing_handler<R, U, M>(
    State(routes): State<CatalogRoutes<R, U, M>>,
    Path(kind): Path<String>,
) -> Response
where
    R: CatalogRepository + 'static,
    U: AccountRepository + 'static,
    M: OtpMailer + 'static,
{
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(response) => return response,
    };

    match routes.catalog.listing(kind) {
        Ok(items) => {
            let total = items.len();
            (
                StatusCode::OK,
                axum::Json(json!({ "items": items, "total": total })),
            )
                .into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn matched_handler<R, U, M>(
    State(routes): State<CatalogRoutes<R, U, M>>,
    Path(kind): Path<String>,
    headers: HeaderMap,
) -> Response
where
    R: CatalogRepository + 'static,
    U: AccountRepository + 'static,
    M: OtpMailer + 'static,
{
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(response) => return response,
    };

    let account = match routes.accounts.authenticate(&headers) {
        Ok(account) => account,
        Err(error @ (AccountError::Token(_) | AccountError::UnknownAccount)) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response();
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response();
        }
    };

    match routes.catalog.matched_listing(kind, &account.profile) {
        Ok(items) => {
            let total = items.len();
            (
                StatusCode::OK,
                axum::Json(json!({ "items": items, "total": total })),
            )
                .into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
