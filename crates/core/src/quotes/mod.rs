//! Quote fetching.
//!
//! - [`observer`] - Incremental update hooks for batch fetches
//! - [`service`] - Cache-first single fetch and the multi-symbol aggregator
//!
//! ```text
//! QuoteService → RateLimiter → MarketDataProvider (Finnhub)
//!      ↓
//! QuoteCache → KeyValueStore
//! ```

pub mod observer;
pub mod service;


pub use observer::QuoteObserver;
pub use service::{QuoteService, QuoteServiceTrait};
