use super::domain::{AdminAccount, AdminId};

/// Storage abstraction over the administrator directory.
pub trait AdminRepository: Send + Sync {
    fn insert(&self, admin: AdminAccount) -> Result<AdminAccount, AdminStoreError>;
    fn update(&self, admin: AdminAccount) -> Result<(), AdminStoreError>;
    fn fetch(&self, id: &AdminId) -> Result<Option<AdminAccount>, AdminStoreError>;
    fn fetch_by_email(&self, email: &str) -> Result<Option<AdminAccount>, AdminStoreError>;
}

/// Error enumeration for admin storage failures.
#[derive(Debug, thiserror::Error)]
pub enum AdminStoreError {
    #[error("admin already exists")]
    Conflict,
    #[error("admin not found")]
    NotFound,
    #[error("admin store unavailable: {0}")]
    Unavailable(String),
}
