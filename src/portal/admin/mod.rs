//! Admin back-office: administrator directory, catalog management, and the
//! user listing behind role-guarded routes.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{AdminAccount, AdminId, AdminRole, AdminSession, AdminView};
pub use repository::{AdminRepository, AdminStoreError};
pub use router::admin_router;
pub use service::{AdminError, AdminService};
