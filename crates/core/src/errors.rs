//! Core error types for Tickerwatch.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use thiserror::Error;

use tickerwatch_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the dashboard services.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    /// Provider and scheduler failures keep their own message so it can be
    /// shown next to the ticker as-is.
    #[error(transparent)]
    MarketData(#[from] MarketDataError),

    #[error("Failed to encode or decode stored data: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0} is already in your watchlist")]
    DuplicateSymbol(String),
}

impl Error {
    /// True when the provider confirmed the symbol does not exist.
    pub fn is_invalid_symbol(&self) -> bool {
        matches!(self, Error::MarketData(err) if err.is_invalid_symbol())
    }
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for user input.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Ticker symbol is required")]
    EmptySymbol,

    #[error("Invalid ticker symbol '{0}': use 1-5 letters")]
    InvalidSymbol(String),
}
