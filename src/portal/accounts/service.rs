use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use tracing::info;

use super::domain::{AccountId, AccountView, AuthSession, OtpChallenge, UserAccount};
use super::repository::{
    AccountRepository, AccountStoreError, MailError, OtpCodeSource, OtpMailer,
};
use crate::portal::catalog::CitizenProfile;
use crate::portal::security::{
    require_role, PasswordHasher, PortalRole, TokenAuthority, TokenError, TokenSubject,
};

const OTP_TTL_MINUTES: i64 = 10;
const MAX_OTP_ATTEMPTS: u8 = 3;

static ACCOUNT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_account_id() -> AccountId {
    let id = ACCOUNT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AccountId(format!("usr-{id:06}"))
}

/// Service composing the account directory, the OTP mailer, and the
/// security collaborators behind the signup/login flow.
pub struct AccountService<R, M> {
    repository: Arc<R>,
    mailer: Arc<M>,
    codes: Arc<dyn OtpCodeSource>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenAuthority>,
}

impl<R, M> AccountService<R, M>
where
    R: AccountRepository + 'static,
    M: OtpMailer + 'static,
{
    pub fn new(
        repository: Arc<R>,
        mailer: Arc<M>,
        codes: Arc<dyn OtpCodeSource>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenAuthority>,
    ) -> Self {
        Self {
            repository,
            mailer,
            codes,
            hasher,
            tokens,
        }
    }

    /// Mint a fresh code for `email`, replacing any outstanding challenge,
    /// and hand it to the mailer. The code expires after ten minutes.
    pub fn send_otp(&self, email: &str) -> Result<(), AccountError> {
        let email = normalize_email(email)?;
        let code = self.codes.next_code();

        self.repository.store_challenge(OtpChallenge {
            email: email.clone(),
            code: code.clone(),
            attempts: 0,
            expires_at: Utc::now() + Duration::minutes(OTP_TTL_MINUTES),
        })?;
        self.mailer.deliver(&email, &code)?;

        info!(%email, "otp dispatched");
        Ok(())
    }

    /// Check a submitted code. Three wrong submissions burn the challenge;
    /// success consumes it and leaves the account verified (creating a
    /// passwordless account on first signup).
    pub fn verify_otp(&self, email: &str, code: &str) -> Result<AccountView, AccountError> {
        let email = normalize_email(email)?;
        let mut challenge = self
            .repository
            .challenge_for(&email)?
            .ok_or(AccountError::ChallengeMissing)?;

        if Utc::now() > challenge.expires_at {
            self.repository.delete_challenge(&email)?;
            return Err(AccountError::ChallengeExpired);
        }
        if challenge.attempts >= MAX_OTP_ATTEMPTS {
            self.repository.delete_challenge(&email)?;
            return Err(AccountError::TooManyAttempts);
        }

        challenge.attempts += 1;
        self.repository.update_challenge(challenge.clone())?;

        if challenge.code != code {
            return Err(AccountError::CodeMismatch);
        }

        self.repository.delete_challenge(&email)?;

        let account = match self.repository.fetch_by_email(&email)? {
            Some(mut account) => {
                account.is_verified = true;
                account.last_login = Some(Utc::now());
                self.repository.update(account.clone())?;
                account
            }
            None => self.repository.insert(UserAccount {
                id: next_account_id(),
                email: email.clone(),
                password_hash: None,
                is_verified: true,
                profile: CitizenProfile::default(),
                last_login: Some(Utc::now()),
                created_at: Utc::now(),
            })?,
        };

        info!(%email, account = %account.id.0, "otp verified");
        Ok(account.public_view())
    }

    /// Complete signup for a verified account by storing a password hash
    /// and opening a session.
    pub fn set_password(&self, email: &str, password: &str) -> Result<AuthSession, AccountError> {
        if password.is_empty() {
            return Err(AccountError::MissingPassword);
        }
        let email = normalize_email(email)?;

        let mut account = self
            .repository
            .fetch_by_email(&email)?
            .filter(|account| account.is_verified)
            .ok_or(AccountError::NotVerified)?;

        account.password_hash = Some(self.hasher.hash(password));
        self.repository.update(account.clone())?;

        Ok(self.open_session(account))
    }

    /// Password login for verified accounts that completed signup.
    pub fn login(&self, email: &str, password: &str) -> Result<AuthSession, AccountError> {
        let email = normalize_email(email)?;

        let mut account = self
            .repository
            .fetch_by_email(&email)?
            .filter(|account| account.is_verified)
            .ok_or(AccountError::NotVerified)?;

        let Some(hash) = account.password_hash.clone() else {
            return Err(AccountError::MissingPassword);
        };
        if !self.hasher.verify(password, &hash) {
            return Err(AccountError::InvalidCredentials);
        }

        account.last_login = Some(Utc::now());
        self.repository.update(account.clone())?;

        info!(%email, account = %account.id.0, "login succeeded");
        Ok(self.open_session(account))
    }

    pub fn profile(&self, id: &AccountId) -> Result<AccountView, AccountError> {
        let account = self
            .repository
            .fetch(id)?
            .ok_or(AccountError::UnknownAccount)?;
        Ok(account.public_view())
    }

    /// Merge-update the stored profile: provided fields overwrite, omitted
    /// fields are retained.
    pub fn update_profile(
        &self,
        id: &AccountId,
        patch: CitizenProfile,
    ) -> Result<AccountView, AccountError> {
        let mut account = self
            .repository
            .fetch(id)?
            .ok_or(AccountError::UnknownAccount)?;

        account.profile = account.profile.merged_with(patch);
        self.repository.update(account.clone())?;

        info!(account = %account.id.0, "profile updated");
        Ok(account.public_view())
    }

    /// Every account, newest first, for the admin directory listing.
    pub fn directory(&self) -> Result<Vec<AccountView>, AccountError> {
        let mut accounts = self.repository.all()?;
        accounts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(accounts.iter().map(UserAccount::public_view).collect())
    }

    /// Resolve a citizen bearer token from request headers to the stored
    /// account.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<UserAccount, AccountError> {
        let subject = require_role(self.tokens.as_ref(), headers, PortalRole::Citizen)?;
        let id = AccountId(subject.subject_id);
        self.repository
            .fetch(&id)?
            .filter(|account| account.is_verified)
            .ok_or(AccountError::UnknownAccount)
    }

    fn open_session(&self, account: UserAccount) -> AuthSession {
        let token = self.tokens.issue(TokenSubject {
            subject_id: account.id.0.clone(),
            role: PortalRole::Citizen,
        });
        AuthSession {
            token,
            account: account.public_view(),
        }
    }
}

fn normalize_email(raw: &str) -> Result<String, AccountError> {
    let email = raw.trim().to_ascii_lowercase();
    let Some((local, domain)) = email.split_once('@') else {
        return Err(AccountError::InvalidEmail);
    };
    let domain_ok = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.is_empty();
    if local.is_empty() || !domain_ok || email.contains(char::is_whitespace) {
        return Err(AccountError::InvalidEmail);
    }
    Ok(email)
}

/// Error raised by the account service.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("invalid email format")]
    InvalidEmail,
    #[error("no code found; request a new one")]
    ChallengeMissing,
    #[error("code has expired; request a new one")]
    ChallengeExpired,
    #[error("too many attempts; request a new code")]
    TooManyAttempts,
    #[error("incorrect code")]
    CodeMismatch,
    #[error("account not found or not verified")]
    NotVerified,
    #[error("account has no password set; complete signup first")]
    MissingPassword,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("account not found")]
    UnknownAccount,
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Repository(#[from] AccountStoreError),
    #[error(transparent)]
    Mail(#[from] MailError),
}
