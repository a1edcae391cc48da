//! Price history for sparkline charts.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use log::{debug, warn};

use tickerwatch_market_data::provider::synthetic;
use tickerwatch_market_data::{
    ChartPeriod, ChartState, HistorySeries, HistorySource, MarketDataProvider, RateLimiter,
};

use crate::cache::QuoteCache;
use crate::errors::Result;

/// Cache key for a symbol's history over a period.
pub fn history_cache_key(symbol: &str, period: ChartPeriod) -> String {
    format!("{}:history:{}", symbol.to_uppercase(), period.days())
}

#[async_trait]
pub trait HistoryServiceTrait: Send + Sync {
    /// Daily history for `symbol` over `period`.
    async fn fetch_history(&self, symbol: &str, period: ChartPeriod) -> Result<HistorySeries>;

    /// History mapped to the state a chart panel renders.
    async fn chart(&self, symbol: &str, period: ChartPeriod) -> ChartState {
        match self.fetch_history(symbol, period).await {
            Ok(series) => ChartState::Ready(series),
            Err(e) => ChartState::Failed(e.to_string()),
        }
    }
}

/// Cache-first history lookup with an optional synthetic fallback.
///
/// Provider requests share the quote rate limiter. Only provider data is
/// cached; when the fallback is enabled, a failed or empty response yields a
/// [`HistorySource::Synthetic`] series instead of an error.
pub struct HistoryService {
    provider: Arc<dyn MarketDataProvider>,
    limiter: RateLimiter,
    cache: QuoteCache,
    synthetic_fallback: bool,
}

impl HistoryService {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        limiter: RateLimiter,
        cache: QuoteCache,
    ) -> Self {
        Self {
            provider,
            limiter,
            cache,
            synthetic_fallback: true,
        }
    }

    pub fn with_synthetic_fallback(mut self, enabled: bool) -> Self {
        self.synthetic_fallback = enabled;
        self
    }

    fn synthetic_series(symbol: &str, period: ChartPeriod) -> HistorySeries {
        let mut rng = rand::thread_rng();
        synthetic::generate(symbol, period.days(), Utc::now(), &mut rng)
    }
}

#[async_trait]
impl HistoryServiceTrait for HistoryService {
    async fn fetch_history(&self, symbol: &str, period: ChartPeriod) -> Result<HistorySeries> {
        let key = history_cache_key(symbol, period);
        match self.cache.get::<HistorySeries>(&key) {
            Ok(Some(series)) => {
                debug!("Cache hit for {}", key);
                return Ok(series);
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to read cached history {}: {}", key, e),
        }

        let end = Utc::now();
        let start = end - Duration::days(period.days());
        let provider = Arc::clone(&self.provider);
        let requested = symbol.to_string();
        let result = self
            .limiter
            .schedule(move || async move {
                provider
                    .get_historical_quotes(&requested, period.resolution(), start, end)
                    .await
            })
            .await;

        match result {
            Ok(points) => {
                let series = HistorySeries {
                    symbol: symbol.to_string(),
                    points,
                    source: HistorySource::Provider,
                };
                if let Err(e) = self.cache.put(&key, &series) {
                    warn!("Failed to cache history {}: {}", key, e);
                }
                Ok(series)
            }
            Err(err) if self.synthetic_fallback => {
                warn!(
                    "Using synthetic history for {} ({} days): {}",
                    symbol,
                    period.days(),
                    err
                );
                Ok(Self::synthetic_series(symbol, period))
            }
            Err(err) => Err(err.into()),
        }
    }
}
