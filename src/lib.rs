//! Library crate for the Sarkari Sathi portal: catalog matching, citizen
//! accounts, and the admin back-office behind the HTTP service.

pub mod config;
pub mod error;
pub mod portal;
pub mod telemetry;
