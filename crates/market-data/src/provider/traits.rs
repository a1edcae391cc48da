//! Market data provider trait definitions.
//!
//! This module defines the core `MarketDataProvider` trait that all
//! market data providers must implement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::MarketDataError;
use crate::models::{PricePoint, Quote};

use super::rate_limit::RateLimit;

/// Trait for market data providers.
///
/// Implementations perform exactly one upstream request per call. Caching and
/// request spacing live above this trait, so providers stay stateless apart
/// from their HTTP client and credentials.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use tickerwatch_market_data::provider::{MarketDataProvider, RateLimit};
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl MarketDataProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     fn rate_limit(&self) -> RateLimit {
///         RateLimit::default()
///     }
///
///     // ... implement quote methods
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs.
    fn id(&self) -> &'static str;

    /// Rate limiting configuration that callers should honour.
    fn rate_limit(&self) -> RateLimit;

    /// Fetch the latest quote for a symbol.
    ///
    /// # Returns
    ///
    /// The latest quote on success. `MarketDataError::InvalidSymbol` when the
    /// provider signals that the symbol does not exist, and
    /// `MarketDataError::Network` for transport or HTTP failures.
    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError>;

    /// Fetch historical candles for a symbol.
    ///
    /// # Arguments
    ///
    /// * `symbol` - The ticker symbol
    /// * `resolution` - Provider candle resolution (e.g., "D")
    /// * `start` - Start of the range (inclusive)
    /// * `end` - End of the range (inclusive)
    ///
    /// # Returns
    ///
    /// Candles ordered by timestamp ascending, or `MarketDataError::NoData`
    /// when the provider has nothing for the range.
    async fn get_historical_quotes(
        &self,
        symbol: &str,
        resolution: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>, MarketDataError>;
}
