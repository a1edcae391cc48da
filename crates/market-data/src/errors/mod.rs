//! Error types for the market data crate.
//!
//! [`MarketDataError`] separates the two failures callers react to
//! differently: an upstream confirmation that a symbol does not exist
//! ([`MarketDataError::InvalidSymbol`]) and everything that went wrong on the
//! way to an answer ([`MarketDataError::Network`] and friends).

use thiserror::Error;

/// Errors that can occur during market data operations.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The provider confirmed the symbol is unknown.
    /// This is a terminal error - retrying won't help.
    #[error("Invalid or unknown stock symbol: {0}")]
    InvalidSymbol(String),

    /// Transport or HTTP failure while talking to the provider.
    #[error("Failed to fetch {symbol}: {message}")]
    Network {
        /// The symbol being requested
        symbol: String,
        /// Status text or transport error description
        message: String,
    },

    /// The provider answered but has no candles for the requested range.
    #[error("No data for {0}")]
    NoData(String),

    /// The provider response could not be decoded.
    #[error("Failed to parse {what}: {message}")]
    Parse {
        /// Which payload failed to decode
        what: String,
        /// Decoder error message
        message: String,
    },

    /// The rate limiter dropped the task before it produced a result.
    #[error("Request scheduler stopped before the task completed")]
    SchedulerClosed,

    /// The scheduled task panicked while running.
    #[error("Scheduled request panicked")]
    TaskPanicked,
}

impl MarketDataError {
    /// True when the upstream confirmed the symbol does not exist.
    pub fn is_invalid_symbol(&self) -> bool {
        matches!(self, Self::InvalidSymbol(_))
    }

    pub(crate) fn network(symbol: &str, message: impl Into<String>) -> Self {
        Self::Network {
            symbol: symbol.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn parse(what: &str, err: impl std::fmt::Display) -> Self {
        Self::Parse {
            what: what.to_string(),
            message: err.to_string(),
        }
    }
}
