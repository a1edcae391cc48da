use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, warn};

use tickerwatch_market_data::{MarketDataProvider, Quote, RateLimiter};

use super::observer::QuoteObserver;
use crate::cache::QuoteCache;
use crate::errors::Result;

/// Quote operations used by the dashboard.
#[async_trait]
pub trait QuoteServiceTrait: Send + Sync {
    /// Latest quote for one symbol.
    ///
    /// Served from the cache while an entry is fresh, otherwise fetched through
    /// the rate limiter and written back to the cache.
    async fn fetch_one(&self, symbol: &str) -> Result<Quote>;

    /// One quote per input symbol, in input order. Never fails.
    ///
    /// A symbol whose fetch fails falls back to a still-valid cache entry and
    /// then to an error sentinel carrying the failure message. `observer` sees
    /// every result as soon as it resolves.
    async fn fetch_many(
        &self,
        symbols: &[String],
        observer: Option<&dyn QuoteObserver>,
    ) -> Vec<Quote>;
}

pub struct QuoteService {
    provider: Arc<dyn MarketDataProvider>,
    limiter: RateLimiter,
    cache: QuoteCache,
}

impl QuoteService {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        limiter: RateLimiter,
        cache: QuoteCache,
    ) -> Self {
        Self {
            provider,
            limiter,
            cache,
        }
    }

    /// Cached quote, with read failures treated as a miss.
    fn cached_quote(&self, symbol: &str) -> Option<Quote> {
        match self.cache.get::<Quote>(symbol) {
            Ok(cached) => cached,
            Err(e) => {
                warn!("Failed to read cached quote for {}: {}", symbol, e);
                None
            }
        }
    }

    async fn resolve(&self, symbol: &str) -> Quote {
        match self.fetch_one(symbol).await {
            Ok(quote) => quote,
            Err(err) => {
                if let Some(cached) = self.cached_quote(symbol) {
                    warn!("Using cached quote for {} after error: {}", symbol, err);
                    return cached;
                }
                warn!("No quote for {}: {}", symbol, err);
                Quote::failed(symbol, err.to_string())
            }
        }
    }
}

#[async_trait]
impl QuoteServiceTrait for QuoteService {
    async fn fetch_one(&self, symbol: &str) -> Result<Quote> {
        if let Some(cached) = self.cached_quote(symbol) {
            debug!("Cache hit for {}", symbol);
            return Ok(cached);
        }

        let provider = Arc::clone(&self.provider);
        let requested = symbol.to_string();
        let quote = self
            .limiter
            .schedule(move || async move { provider.get_latest_quote(&requested).await })
            .await?;

        if let Err(e) = self.cache.put(symbol, &quote) {
            warn!("Failed to cache quote for {}: {}", symbol, e);
        }
        Ok(quote)
    }

    async fn fetch_many(
        &self,
        symbols: &[String],
        observer: Option<&dyn QuoteObserver>,
    ) -> Vec<Quote> {
        debug!("Fetching {} quotes", symbols.len());

        let fetches = symbols.iter().map(|symbol| async move {
            let quote = self.resolve(symbol).await;
            if let Some(observer) = observer {
                observer.on_update(&quote);
            }
            quote
        });

        join_all(fetches).await
    }
}
