use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::service::{AdminError, AdminService};
use crate::portal::accounts::repository::{AccountRepository, OtpMailer};
use crate::portal::accounts::service::AccountService;
use crate::portal::admin::repository::AdminRepository;
use crate::portal::catalog::repository::CatalogRepository;
use crate::portal::catalog::service::{CatalogService, CatalogServiceError};
use crate::portal::catalog::{CatalogError, EntryDraft, EntryId};

/// Shared state for the back-office routes: the admin directory plus the
/// catalog and account services it manages.
pub struct AdminRoutes<A, C, U, M> {
    admins: Arc<AdminService<A>>,
    catalog: Arc<CatalogService<C>>,
    accounts: Arc<AccountService<U, M>>,
}

impl<A, C, U, M> Clone for AdminRoutes<A, C, U, M> {
    fn clone(&self) -> Self {
        Self {
            admins: Arc::clone(&self.admins),
            catalog: Arc::clone(&self.catalog),
            accounts: Arc::clone(&self.accounts),
        }
    }
}

/// Router builder exposing the admin back-office.
pub fn admin_router<A, C, U, M>(
    admins: Arc<AdminService<A>>,
    catalog: Arc<CatalogService<C>>,
    accounts: Arc<AccountService<U, M>>,
) -> Router
where
    A: AdminRepository + 'static,
    C: CatalogRepository + 'static,
    U: AccountRepository + 'static,
    M: OtpMailer + 'static,
{
    Router::new()
        .route("/api/v1/admin/login", post(login_handler::<A, C, U, M>))
        .route(
            "/api/v1/admin/accounts",
            post(create_admin_handler::<A, C, U, M>),
        )
        .route(
            "/api/v1/admin/catalog",
            get(list_catalog_handler::<A, C, U, M>).post(add_entry_handler::<A, C, U, M>),
        )
        .route(
            "/api/v1/admin/catalog/:id",
            put(update_entry_handler::<A, C, U, M>).delete(deactivate_entry_handler::<A, C, U, M>),
        )
        .route("/api/v1/admin/users", get(list_users_handler::<A, C, U, M>))
        .with_state(AdminRoutes {
            admins,
            catalog,
            accounts,
        })
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdminLoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateAdminRequest {
    email: String,
    password: String,
    name: String,
}

fn admin_error_response(error: AdminError) -> Response {
    let status = match &error {
        AdminError::MissingFields => StatusCode::BAD_REQUEST,
        AdminError::AlreadyExists => StatusCode::CONFLICT,
        AdminError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AdminError::UnknownAdmin | AdminError::Token(_) => StatusCode::FORBIDDEN,
        AdminError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, axum::Json(json!({ "error": error.to_string() }))).into_response()
}

fn catalog_error_response(error: CatalogServiceError) -> Response {
    let status = match &error {
        CatalogServiceError::MissingField(_) | CatalogServiceError::InvalidLink(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        CatalogServiceError::Repository(CatalogError::NotFound) => StatusCode::NOT_FOUND,
        CatalogServiceError::Repository(CatalogError::Conflict) => StatusCode::CONFLICT,
        CatalogServiceError::Repository(CatalogError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, axum::Json(json!({ "error": error.to_string() }))).into_response()
}

pub(crate) async fn login_handler<A, C, U, M>(
    State(routes): State<AdminRoutes<A, C, U, M>>,
    axum::Json(request): axum::Json<AdminLoginRequest>,
) -> Response
where
    A: AdminRepository + 'static,
    C: CatalogRepository + 'static,
    U: AccountRepository + 'static,
    M: OtpMailer + 'static,
{
    match routes.admins.login(&request.email, &request.password) {
        Ok(session) => (StatusCode::OK, axum::Json(session)).into_response(),
        Err(error) => admin_error_response(error),
    }
}

pub(crate) async fn create_admin_handler<A, C, U, M>(
    State(routes): State<AdminRoutes<A, C, U, M>>,
    axum::Json(request): axum::Json<CreateAdminRequest>,
) -> Response
where
    A: AdminRepository + 'static,
    C: CatalogRepository + 'static,
    U: AccountRepository + 'static,
    M: OtpMailer + 'static,
{
    match routes
        .admins
        .create(&request.email, &request.password, &request.name)
    {
        Ok(view) => (StatusCode::CREATED, axum::Json(json!({ "admin": view }))).into_response(),
        Err(error) => admin_error_response(error),
    }
}

pub(crate) async fn add_entry_handler<A, C, U, M>(
    State(routes): State<AdminRoutes<A, C, U, M>>,
    headers: HeaderMap,
    axum::Json(draft): axum::Json<EntryDraft>,
) -> Response
where
    A: AdminRepository + 'static,
    C: CatalogRepository + 'static,
    U: AccountRepository + 'static,
    M: OtpMailer + 'static,
{
    let admin = match routes.admins.authenticate(&headers) {
        Ok(admin) => admin,
        Err(error) => return admin_error_response(error),
    };

    match routes.catalog.add_entry(draft, Some(admin.id)) {
        Ok(entry) => (StatusCode::CREATED, axum::Json(json!({ "entry": entry }))).into_response(),
        Err(error) => catalog_error_response(error),
    }
}

pub(crate) async fn update_entry_handler<A, C, U, M>(
    State(routes): State<AdminRoutes<A, C, U, M>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    axum::Json(draft): axum::Json<EntryDraft>,
) -> Response
where
    A: AdminRepository + 'static,
    C: CatalogRepository + 'static,
    U: AccountRepository + 'static,
    M: OtpMailer + 'static,
{
    if let Err(error) = routes.admins.authenticate(&headers) {
        return admin_error_response(error);
    }

    match routes.catalog.update_entry(&EntryId(id), draft) {
        Ok(entry) => (StatusCode::OK, axum::Json(json!({ "entry": entry }))).into_response(),
        Err(error) => catalog_error_response(error),
    }
}

pub(crate) async fn deactivate_entry_handler<A, C, U, M>(
    State(routes): State<AdminRoutes<A, C, U, M>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response
where
    A: AdminRepository + 'static,
    C: CatalogRepository + 'static,
    U: AccountRepository + 'static,
    M: OtpMailer + 'static,
{
    if let Err(error) = routes.admins.authenticate(&headers) {
        return admin_error_response(error);
    }

    match routes.catalog.deactivate_entry(&EntryId(id)) {
        Ok(()) => (
            StatusCode::OK,
            axum::Json(json!({ "message": "entry deactivated" })),
        )
            .into_response(),
        Err(error) => catalog_error_response(error),
    }
}

pub(crate) async fn list_catalog_handler<A, C, U, M>(
    State(routes): State<AdminRoutes<A, C, U, M>>,
    headers: HeaderMap,
) -> Response
where
    A: AdminRepository + 'static,
    C: CatalogRepository + 'static,
    U: AccountRepository + 'static,
    M: OtpMailer + 'static,
{
    if let Err(error) = routes.admins.authenticate(&headers) {
        return admin_error_response(error);
    }

    match routes.catalog.all_entries() {
        Ok(items) => {
            let total = items.len();
            (
                StatusCode::OK,
                axum::Json(json!({ "items": items, "total": total })),
            )
                .into_response()
        }
        Err(error) => catalog_error_response(error),
    }
}

pub(crate) async fn list_users_handler<A, C, U, M>(
    State(routes): State<AdminRoutes<A, C, U, M>>,
    headers: HeaderMap,
) -> Response
where
    A: AdminRepository + 'static,
    C: CatalogRepository + 'static,
    U: AccountRepository + 'static,
    M: OtpMailer + 'static,
{
    if let Err(error) = routes.admins.authenticate(&headers) {
        return admin_error_response(error);
    }

    match routes.accounts.directory() {
        Ok(users) => {
            let total = users.len();
            (
                StatusCode::OK,
                axum::Json(json!({ "users": users, "total": total })),
            )
                .into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
