//! In-process adapters for the repository and security traits. They back
//! the dev server, the CLI demos, and the test suites; deployments swap in
//! database, SMTP, JWT, and bcrypt implementations at the same seams.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::portal::accounts::domain::{AccountId, OtpChallenge, UserAccount};
use crate::portal::accounts::repository::{
    AccountRepository, AccountStoreError, MailError, OtpCodeSource, OtpMailer,
};
use crate::portal::admin::domain::{AdminAccount, AdminId};
use crate::portal::admin::repository::{AdminRepository, AdminStoreError};
use crate::portal::catalog::domain::{CatalogEntry, EntryId};
use crate::portal::catalog::repository::{CatalogError, CatalogQuery, CatalogRepository};
use crate::portal::security::{PasswordHasher, TokenAuthority, TokenError, TokenSubject};

/// Catalog store keeping entries in insertion order.
#[derive(Default)]
pub struct InMemoryCatalogRepository {
    entries: Mutex<Vec<CatalogEntry>>,
}

impl CatalogRepository for InMemoryCatalogRepository {
    fn insert(&self, entry: CatalogEntry) -> Result<CatalogEntry, CatalogError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CatalogError::Unavailable("catalog lock poisoned".to_string()))?;
        if entries.iter().any(|existing| existing.id == entry.id) {
            return Err(CatalogError::Conflict);
        }
        entries.push(entry.clone());
        Ok(entry)
    }

    fn update(&self, entry: CatalogEntry) -> Result<(), CatalogError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CatalogError::Unavailable("catalog lock poisoned".to_string()))?;
        match entries.iter_mut().find(|existing| existing.id == entry.id) {
            Some(existing) => {
                *existing = entry;
                Ok(())
            }
            None => Err(CatalogError::NotFound),
        }
    }

    fn fetch(&self, id: &EntryId) -> Result<Option<CatalogEntry>, CatalogError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| CatalogError::Unavailable("catalog lock poisoned".to_string()))?;
        Ok(entries.iter().find(|entry| &entry.id == id).cloned())
    }

    fn list(&self, query: CatalogQuery) -> Result<Vec<CatalogEntry>, CatalogError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| CatalogError::Unavailable("catalog lock poisoned".to_string()))?;
        Ok(entries
            .iter()
            .filter(|entry| query.kind.map_or(true, |kind| entry.kind == kind))
            .filter(|entry| !query.active_only || entry.is_active)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct AccountState {
    accounts: Vec<UserAccount>,
    challenges: HashMap<String, OtpChallenge>,
}

/// Account directory plus OTP challenge store.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    state: Mutex<AccountState>,
}

impl InMemoryAccountRepository {
    fn locked(&self) -> Result<std::sync::MutexGuard<'_, AccountState>, AccountStoreError> {
        self.state
            .lock()
            .map_err(|_| AccountStoreError::Unavailable("account lock poisoned".to_string()))
    }
}

impl AccountRepository for InMemoryAccountRepository {
    fn insert(&self, account: UserAccount) -> Result<UserAccount, AccountStoreError> {
        let mut state = self.locked()?;
        if state
            .accounts
            .iter()
            .any(|existing| existing.id == account.id || existing.email == account.email)
        {
            return Err(AccountStoreError::Conflict);
        }
        state.accounts.push(account.clone());
        Ok(account)
    }

    fn update(&self, account: UserAccount) -> Result<(), AccountStoreError> {
        let mut state = self.locked()?;
        match state
            .accounts
            .iter_mut()
            .find(|existing| existing.id == account.id)
        {
            Some(existing) => {
                *existing = account;
                Ok(())
            }
            None => Err(AccountStoreError::NotFound),
        }
    }

    fn fetch(&self, id: &AccountId) -> Result<Option<UserAccount>, AccountStoreError> {
        let state = self.locked()?;
        Ok(state.accounts.iter().find(|account| &account.id == id).cloned())
    }

    fn fetch_by_email(&self, email: &str) -> Result<Option<UserAccount>, AccountStoreError> {
        let state = self.locked()?;
        Ok(state
            .accounts
            .iter()
            .find(|account| account.email == email)
            .cloned())
    }

    fn all(&self) -> Result<Vec<UserAccount>, AccountStoreError> {
        let state = self.locked()?;
        Ok(state.accounts.clone())
    }

    fn store_challenge(&self, challenge: OtpChallenge) -> Result<(), AccountStoreError> {
        let mut state = self.locked()?;
        state.challenges.insert(challenge.email.clone(), challenge);
        Ok(())
    }

    fn challenge_for(&self, email: &str) -> Result<Option<OtpChallenge>, AccountStoreError> {
        let state = self.locked()?;
        Ok(state.challenges.get(email).cloned())
    }

    fn update_challenge(&self, challenge: OtpChallenge) -> Result<(), AccountStoreError> {
        let mut state = self.locked()?;
        match state.challenges.get_mut(&challenge.email) {
            Some(existing) => {
                *existing = challenge;
                Ok(())
            }
            None => Err(AccountStoreError::NotFound),
        }
    }

    fn delete_challenge(&self, email: &str) -> Result<(), AccountStoreError> {
        let mut state = self.locked()?;
        state.challenges.remove(email);
        Ok(())
    }
}

/// Administrator directory.
#[derive(Default)]
pub struct InMemoryAdminRepository {
    admins: Mutex<Vec<AdminAccount>>,
}

impl AdminRepository for InMemoryAdminRepository {
    fn insert(&self, admin: AdminAccount) -> Result<AdminAccount, AdminStoreError> {
        let mut admins = self
            .admins
            .lock()
            .map_err(|_| AdminStoreError::Unavailable("admin lock poisoned".to_string()))?;
        if admins
            .iter()
            .any(|existing| existing.id == admin.id || existing.email == admin.email)
        {
            return Err(AdminStoreError::Conflict);
        }
        admins.push(admin.clone());
        Ok(admin)
    }

    fn update(&self, admin: AdminAccount) -> Result<(), AdminStoreError> {
        let mut admins = self
            .admins
            .lock()
            .map_err(|_| AdminStoreError::Unavailable("admin lock poisoned".to_string()))?;
        match admins.iter_mut().find(|existing| existing.id == admin.id) {
            Some(existing) => {
                *existing = admin;
                Ok(())
            }
            None => Err(AdminStoreError::NotFound),
        }
    }

    fn fetch(&self, id: &AdminId) -> Result<Option<AdminAccount>, AdminStoreError> {
        let admins = self
            .admins
            .lock()
            .map_err(|_| AdminStoreError::Unavailable("admin lock poisoned".to_string()))?;
        Ok(admins.iter().find(|admin| &admin.id == id).cloned())
    }

    fn fetch_by_email(&self, email: &str) -> Result<Option<AdminAccount>, AdminStoreError> {
        let admins = self
            .admins
            .lock()
            .map_err(|_| AdminStoreError::Unavailable("admin lock poisoned".to_string()))?;
        Ok(admins.iter().find(|admin| admin.email == email).cloned())
    }
}

/// Mailer that records deliveries instead of sending them, so demos and
/// tests can read the code back.
#[derive(Default)]
pub struct RecordingOtpMailer {
    deliveries: Mutex<Vec<(String, String)>>,
}

impl RecordingOtpMailer {
    /// Pairs of (email, code) in delivery order.
    pub fn deliveries(&self) -> Vec<(String, String)> {
        self.deliveries
            .lock()
            .map(|deliveries| deliveries.clone())
            .unwrap_or_default()
    }

    /// The most recent code delivered to `email`, if any.
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.deliveries()
            .into_iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, code)| code)
    }
}

impl OtpMailer for RecordingOtpMailer {
    fn deliver(&self, email: &str, code: &str) -> Result<(), MailError> {
        let mut deliveries = self
            .deliveries
            .lock()
            .map_err(|_| MailError::Transport("mailer lock poisoned".to_string()))?;
        deliveries.push((email.to_string(), code.to_string()));
        Ok(())
    }
}

/// Deterministic six-digit code sequence. A CSPRNG-backed source replaces
/// this outside of demos and tests.
#[derive(Default)]
pub struct SequenceCodeSource {
    sequence: AtomicU64,
}

impl OtpCodeSource for SequenceCodeSource {
    fn next_code(&self) -> String {
        let step = self.sequence.fetch_add(1, Ordering::Relaxed);
        // spread consecutive codes across the 6-digit space
        let code = 100_000 + (step.wrapping_mul(104_729) + 12_345) % 900_000;
        format!("{code:06}")
    }
}

/// Opaque-token authority backed by a map of issued tokens. Stands in for
/// a JWT signer; verification is a lookup.
#[derive(Default)]
pub struct InMemoryTokenAuthority {
    issued: Mutex<HashMap<String, TokenSubject>>,
    sequence: AtomicU64,
}

impl TokenAuthority for InMemoryTokenAuthority {
    fn issue(&self, subject: TokenSubject) -> String {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        let token = format!("tok-{id:08}");
        if let Ok(mut issued) = self.issued.lock() {
            issued.insert(token.clone(), subject);
        }
        token
    }

    fn verify(&self, token: &str) -> Result<TokenSubject, TokenError> {
        self.issued
            .lock()
            .map_err(|_| TokenError::Invalid)?
            .get(token)
            .cloned()
            .ok_or(TokenError::Invalid)
    }
}

/// Deterministic digest stand-in for an external password hasher.
#[derive(Default)]
pub struct DigestPasswordHasher;

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

impl PasswordHasher for DigestPasswordHasher {
    fn hash(&self, password: &str) -> String {
        format!("fnv1a${:016x}", fnv1a(password.as_bytes()))
    }

    fn verify(&self, password: &str, hashed: &str) -> bool {
        self.hash(password) == hashed
    }
}
