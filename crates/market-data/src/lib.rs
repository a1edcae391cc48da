//! Tickerwatch Market Data Crate
//!
//! Provider access for the Tickerwatch dashboard: the Finnhub client, the
//! synthetic history generator used when candles are unavailable, and the
//! serial rate limiter every outbound request goes through.
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |  Core services   | --> |   RateLimiter    |  (one FIFO queue, min spacing)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |    Provider      |  (Finnhub)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          | Quote / Candles  |  (market data)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Quote`] - Latest price snapshot, or a failed placeholder for a ticker
//! - [`PricePoint`] / [`HistorySeries`] - Daily OHLCV history
//! - [`ChartState`] - What a price chart should render
//! - [`MarketDataError`] - Error type shared by every provider

pub mod errors;
pub mod models;
pub mod provider;
pub mod rate_limiter;

pub use errors::MarketDataError;

pub use models::{ChartPeriod, ChartState, HistorySeries, HistorySource, PricePoint, Quote};

pub use provider::finnhub::FinnhubProvider;
pub use provider::{MarketDataProvider, RateLimit, DEFAULT_MIN_DELAY};

pub use rate_limiter::{RateLimiter, ScheduledTask};
