use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::HeaderMap;
use chrono::Utc;
use tracing::info;

use super::domain::{AdminAccount, AdminId, AdminRole, AdminSession, AdminView};
use super::repository::{AdminRepository, AdminStoreError};
use crate::portal::security::{
    require_role, PasswordHasher, PortalRole, TokenAuthority, TokenError, TokenSubject,
};

static ADMIN_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_admin_id() -> AdminId {
    let id = ADMIN_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AdminId(format!("adm-{id:06}"))
}

/// Service behind the back-office: admin login, bootstrap creation, and
/// bearer-token guarding for the management routes.
pub struct AdminService<R> {
    repository: Arc<R>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenAuthority>,
}

impl<R> AdminService<R>
where
    R: AdminRepository + 'static,
{
    pub fn new(
        repository: Arc<R>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenAuthority>,
    ) -> Self {
        Self {
            repository,
            hasher,
            tokens,
        }
    }

    /// Password login for active administrators. Inactive or unknown
    /// admins get the same answer as a wrong password.
    pub fn login(&self, email: &str, password: &str) -> Result<AdminSession, AdminError> {
        let email = email.trim().to_ascii_lowercase();

        let mut admin = self
            .repository
            .fetch_by_email(&email)?
            .filter(|admin| admin.is_active)
            .ok_or(AdminError::InvalidCredentials)?;

        if !self.hasher.verify(password, &admin.password_hash) {
            return Err(AdminError::InvalidCredentials);
        }

        admin.last_login = Some(Utc::now());
        self.repository.update(admin.clone())?;

        let token = self.tokens.issue(TokenSubject {
            subject_id: admin.id.0.clone(),
            role: PortalRole::Admin,
        });

        info!(%email, admin = %admin.id.0, "admin login succeeded");
        Ok(AdminSession {
            token,
            admin: admin.public_view(),
        })
    }

    /// Bootstrap operation for standing up a back-office account; rejects
    /// duplicate emails.
    pub fn create(&self, email: &str, password: &str, name: &str) -> Result<AdminView, AdminError> {
        let email = email.trim().to_ascii_lowercase();
        if email.is_empty() || password.is_empty() || name.trim().is_empty() {
            return Err(AdminError::MissingFields);
        }

        if self.repository.fetch_by_email(&email)?.is_some() {
            return Err(AdminError::AlreadyExists);
        }

        let admin = self.repository.insert(AdminAccount {
            id: next_admin_id(),
            email,
            name: name.trim().to_string(),
            password_hash: self.hasher.hash(password),
            role: AdminRole::Admin,
            is_active: true,
            last_login: None,
            created_at: Utc::now(),
        })?;

        info!(admin = %admin.id.0, "admin account created");
        Ok(admin.public_view())
    }

    /// Resolve an admin bearer token from request headers to an active
    /// admin account.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<AdminAccount, AdminError> {
        let subject = require_role(self.tokens.as_ref(), headers, PortalRole::Admin)?;
        let id = AdminId(subject.subject_id);
        self.repository
            .fetch(&id)?
            .filter(|admin| admin.is_active)
            .ok_or(AdminError::UnknownAdmin)
    }
}

/// Error raised by the admin service.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("all fields are required")]
    MissingFields,
    #[error("admin already exists")]
    AlreadyExists,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid admin token")]
    UnknownAdmin,
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Repository(#[from] AdminStoreError),
}
