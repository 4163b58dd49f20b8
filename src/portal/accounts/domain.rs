use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::portal::catalog::CitizenProfile;

/// Identifier wrapper for citizen accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub String);

/// A citizen account as stored by the directory. The password hash is
/// absent until signup completes; OTP verification alone creates the
/// account in a verified, passwordless state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: AccountId,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    pub is_verified: bool,
    #[serde(default)]
    pub profile: CitizenProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    /// The representation safe to hand back over HTTP: no credential data.
    pub fn public_view(&self) -> AccountView {
        AccountView {
            id: self.id.clone(),
            email: self.email.clone(),
            is_verified: self.is_verified,
            profile: self.profile.clone(),
            last_login: self.last_login,
            created_at: self.created_at,
        }
    }
}

/// Sanitized account representation for API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountView {
    pub id: AccountId,
    pub email: String,
    pub is_verified: bool,
    pub profile: CitizenProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// One outstanding login/signup code for an email address. Requesting a new
/// code replaces the previous challenge wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtpChallenge {
    pub email: String,
    pub code: String,
    pub attempts: u8,
    pub expires_at: DateTime<Utc>,
}

/// Token plus account view returned by signup completion and login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub account: AccountView,
}
