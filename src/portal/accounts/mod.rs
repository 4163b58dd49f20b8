//! Citizen accounts: OTP-based signup, password login, and profile storage.
//! Hashing, token signing, mail transport, and randomness stay behind
//! traits; this module owns only the flow.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{AccountId, AccountView, AuthSession, OtpChallenge, UserAccount};
pub use repository::{AccountRepository, AccountStoreError, MailError, OtpCodeSource, OtpMailer};
pub use router::account_router;
pub use service::{AccountError, AccountService};
