//! SQLite storage implementation for Foliosnap.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in
//! `foliosnap-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for users, platform accounts and the ledger
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies
//! exist. `foliosnap-core` is database-agnostic and works with traits.
//!
//! All writes funnel through a single writer actor that owns one connection
//! and runs each job inside an immediate transaction. Reads go straight to
//! the pool.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod accounts;
pub mod snapshot;
pub mod users;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from foliosnap-core for convenience
pub use foliosnap_core::errors::{DatabaseError, Error, Result};
