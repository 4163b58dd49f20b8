use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

/// Role carried inside a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortalRole {
    Citizen,
    Admin,
}

impl PortalRole {
    pub const fn label(self) -> &'static str {
        match self {
            PortalRole::Citizen => "citizen",
            PortalRole::Admin => "admin",
        }
    }
}

/// Claims resolved from a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSubject {
    pub subject_id: String,
    pub role: PortalRole,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("no token provided")]
    Missing,
    #[error("invalid token")]
    Invalid,
    #[error("{0} access required")]
    WrongRole(&'static str),
}

/// Token issuing and verification boundary. Signing (JWT or otherwise) is an
/// external collaborator's concern; the portal only needs issue/verify.
pub trait TokenAuthority: Send + Sync {
    fn issue(&self, subject: TokenSubject) -> String;
    fn verify(&self, token: &str) -> Result<TokenSubject, TokenError>;
}

/// Password hashing boundary (bcrypt or similar in deployments).
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> String;
    fn verify(&self, password: &str, hashed: &str) -> bool;
}

/// Pull the bearer token out of an `Authorization` header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Verify a bearer token from request headers and require a specific role.
pub fn require_role(
    authority: &dyn TokenAuthority,
    headers: &HeaderMap,
    role: PortalRole,
) -> Result<TokenSubject, TokenError> {
    let token = bearer_token(headers).ok_or(TokenError::Missing)?;
    let subject = authority.verify(token)?;
    if subject.role != role {
        return Err(TokenError::WrongRole(role.label()));
    }
    Ok(subject)
}
