use super::domain::{AccountId, OtpChallenge, UserAccount};

/// Storage abstraction over the account directory and its outstanding OTP
/// challenges, so the service can be exercised in isolation.
pub trait AccountRepository: Send + Sync {
    fn insert(&self, account: UserAccount) -> Result<UserAccount, AccountStoreError>;
    fn update(&self, account: UserAccount) -> Result<(), AccountStoreError>;
    fn fetch(&self, id: &AccountId) -> Result<Option<UserAccount>, AccountStoreError>;
    fn fetch_by_email(&self, email: &str) -> Result<Option<UserAccount>, AccountStoreError>;
    fn all(&self) -> Result<Vec<UserAccount>, AccountStoreError>;

    /// Store a challenge, replacing any existing one for the same email.
    fn store_challenge(&self, challenge: OtpChallenge) -> Result<(), AccountStoreError>;
    fn challenge_for(&self, email: &str) -> Result<Option<OtpChallenge>, AccountStoreError>;
    fn update_challenge(&self, challenge: OtpChallenge) -> Result<(), AccountStoreError>;
    fn delete_challenge(&self, email: &str) -> Result<(), AccountStoreError>;
}

/// Error enumeration for account storage failures.
#[derive(Debug, thiserror::Error)]
pub enum AccountStoreError {
    #[error("account already exists")]
    Conflict,
    #[error("account not found")]
    NotFound,
    #[error("account store unavailable: {0}")]
    Unavailable(String),
}

/// Outbound delivery hook for one-time codes (SMTP adapter in deployments).
/// Message formatting is the implementor's concern.
pub trait OtpMailer: Send + Sync {
    fn deliver(&self, email: &str, code: &str) -> Result<(), MailError>;
}

/// Code delivery error.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail transport unavailable: {0}")]
    Transport(String),
}

/// Source of fresh one-time codes. Deployments back this with a CSPRNG; the
/// in-process adapter mints deterministic codes for tests and demos.
pub trait OtpCodeSource: Send + Sync {
    fn next_code(&self) -> String;
}
