use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::repository::{AccountRepository, OtpMailer};
use super::service::{AccountError, AccountService};
use crate::portal::catalog::CitizenProfile;

/// Router builder exposing OTP signup, login, and profile endpoints.
pub fn account_router<R, M>(service: Arc<AccountService<R, M>>) -> Router
where
    R: AccountRepository + 'static,
    M: OtpMailer + 'static,
{
    Router::new()
        .route("/api/v1/accounts/otp", post(send_otp_handler::<R, M>))
        .route(
            "/api/v1/accounts/otp/verify",
            post(verify_otp_handler::<R, M>),
        )
        .route(
            "/api/v1/accounts/password",
            post(set_password_handler::<R, M>),
        )
        .route("/api/v1/accounts/login", post(login_handler::<R, M>))
        .route(
            "/api/v1/accounts/profile",
            get(profile_handler::<R, M>).put(update_profile_handler::<R, M>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SendOtpRequest {
    email: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VerifyOtpRequest {
    email: String,
    code: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CredentialsRequest {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateProfileRequest {
    profile: CitizenProfile,
}

fn error_response(status: StatusCode, error: &AccountError) -> Response {
    (status, axum::Json(json!({ "error": error.to_string() }))).into_response()
}

fn status_for(error: &AccountError) -> StatusCode {
    match error {
        AccountError::InvalidEmail
        | AccountError::ChallengeMissing
        | AccountError::ChallengeExpired
        | AccountError::TooManyAttempts
        | AccountError::CodeMismatch
        | AccountError::MissingPassword
        | AccountError::NotVerified => StatusCode::BAD_REQUEST,
        AccountError::InvalidCredentials | AccountError::Token(_) => StatusCode::UNAUTHORIZED,
        AccountError::UnknownAccount => StatusCode::NOT_FOUND,
        AccountError::Repository(_) | AccountError::Mail(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) async fn send_otp_handler<R, M>(
    State(service): State<Arc<AccountService<R, M>>>,
    axum::Json(request): axum::Json<SendOtpRequest>,
) -> Response
where
    R: AccountRepository + 'static,
    M: OtpMailer + 'static,
{
    match service.send_otp(&request.email) {
        Ok(()) => (
            StatusCode::OK,
            axum::Json(json!({ "message": "code sent", "email": request.email })),
        )
            .into_response(),
        Err(error) => error_response(status_for(&error), &error),
    }
}

pub(crate) async fn verify_otp_handler<R, M>(
    State(service): State<Arc<AccountService<R, M>>>,
    axum::Json(request): axum::Json<VerifyOtpRequest>,
) -> Response
where
    R: AccountRepository + 'static,
    M: OtpMailer + 'static,
{
    match service.verify_otp(&request.email, &request.code) {
        Ok(view) => (StatusCode::OK, axum::Json(json!({ "account": view }))).into_response(),
        Err(error) => error_response(status_for(&error), &error),
    }
}

pub(crate) async fn set_password_handler<R, M>(
    State(service): State<Arc<AccountService<R, M>>>,
    axum::Json(request): axum::Json<CredentialsRequest>,
) -> Response
where
    R: AccountRepository + 'static,
    M: OtpMailer + 'static,
{
    match service.set_password(&request.email, &request.password) {
        Ok(session) => (StatusCode::OK, axum::Json(session)).into_response(),
        Err(error) => error_response(status_for(&error), &error),
    }
}

pub(crate) async fn login_handler<R, M>(
    State(service): State<Arc<AccountService<R, M>>>,
    axum::Json(request): axum::Json<CredentialsRequest>,
) -> Response
where
    R: AccountRepository + 'static,
    M: OtpMailer + 'static,
{
    match service.login(&request.email, &request.password) {
        Ok(session) => (StatusCode::OK, axum::Json(session)).into_response(),
        // the login route masks "not verified" as a credentials failure
        Err(AccountError::NotVerified) => error_response(
            StatusCode::UNAUTHORIZED,
            &AccountError::InvalidCredentials,
        ),
        Err(error) => error_response(status_for(&error), &error),
    }
}

pub(crate) async fn profile_handler<R, M>(
    State(service): State<Arc<AccountService<R, M>>>,
    headers: HeaderMap,
) -> Response
where
    R: AccountRepository + 'static,
    M: OtpMailer + 'static,
{
    match service.authenticate(&headers) {
        Ok(account) => (
            StatusCode::OK,
            axum::Json(json!({ "account": account.public_view() })),
        )
            .into_response(),
        Err(error @ (AccountError::Token(_) | AccountError::UnknownAccount)) => {
            error_response(StatusCode::UNAUTHORIZED, &error)
        }
        Err(error) => error_response(status_for(&error), &error),
    }
}

pub(crate) async fn update_profile_handler<R, M>(
    State(service): State<Arc<AccountService<R, M>>>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<UpdateProfileRequest>,
) -> Response
where
    R: AccountRepository + 'static,
    M: OtpMailer + 'static,
{
    let account = match service.authenticate(&headers) {
        Ok(account) => account,
        Err(error @ (AccountError::Token(_) | AccountError::UnknownAccount)) => {
            return error_response(StatusCode::UNAUTHORIZED, &error)
        }
        Err(error) => return error_response(status_for(&error), &error),
    };

    match service.update_profile(&account.id, request.profile) {
        Ok(view) => (StatusCode::OK, axum::Json(json!({ "account": view }))).into_response(),
        Err(error) => error_response(status_for(&error), &error),
    }
}
