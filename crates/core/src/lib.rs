//! Foliosnap Core - Domain entities, services, and traits.
//!
//! This crate contains the snapshot & reconciliation engine: it aggregates a
//! user's holdings across platform accounts into a daily per-user ledger and
//! derives day-over-day and cumulative profit from the total-value series.
//! It is database-agnostic and defines repository traits that are implemented
//! by the `storage-sqlite` crate.

pub mod accounts;
pub mod adapters;
pub mod constants;
pub mod credentials;
pub mod errors;
pub mod snapshot;
pub mod users;
pub mod utils;

// Re-export common types
pub use snapshot::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
