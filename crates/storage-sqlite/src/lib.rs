//! SQLite storage implementation for Tickerwatch.
//!
//! This crate provides the durable [`KeyValueStore`] using Diesel ORM with
//! SQLite. It contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The key-value repository used for the watchlist and the cache
//!
//! # Architecture
//!
//! This crate is the only place in the workspace where Diesel dependencies exist.
//!
//! ```text
//!      core (domain)
//!            │
//!            ▼
//!  storage-sqlite (this crate)
//!            │
//!            ▼
//!        SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod kv;

// Re-export database utilities
pub use db::{create_pool, get_connection, init, run_migrations, DbConnection, DbPool};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use kv::{KeyValueStore, SqliteKeyValueStore};

// Re-export from tickerwatch-core for convenience
pub use tickerwatch_core::errors::{DatabaseError, Error, Result};
