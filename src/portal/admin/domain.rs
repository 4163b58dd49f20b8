use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for back-office administrators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdminId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdminRole {
    Admin,
    SuperAdmin,
}

impl AdminRole {
    pub const fn label(self) -> &'static str {
        match self {
            AdminRole::Admin => "admin",
            AdminRole::SuperAdmin => "super-admin",
        }
    }
}

/// A back-office administrator account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminAccount {
    pub id: AdminId,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: AdminRole,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AdminAccount {
    pub fn public_view(&self) -> AdminView {
        AdminView {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }
}

/// Sanitized admin representation for API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminView {
    pub id: AdminId,
    pub email: String,
    pub name: String,
    pub role: AdminRole,
}

/// Token plus admin view returned by the back-office login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminSession {
    pub token: String,
    pub admin: AdminView,
}
