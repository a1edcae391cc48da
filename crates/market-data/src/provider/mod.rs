//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataProvider` trait that all providers implement
//! - Provider rate limit descriptions
//! - The Finnhub provider
//! - Synthetic history used when a provider has no candles to offer

mod rate_limit;
mod traits;

pub mod finnhub;
pub mod synthetic;

// Re-exports
pub use rate_limit::{RateLimit, DEFAULT_MIN_DELAY};
pub use traits::MarketDataProvider;
