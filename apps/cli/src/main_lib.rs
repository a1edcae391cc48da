use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use tickerwatch_core::{
    DashboardService, HistoryService, KeyValueStore, MemoryStore, QuoteCache, QuoteService,
    Watchlist,
};
use tickerwatch_market_data::{FinnhubProvider, MarketDataProvider, RateLimiter};
use tickerwatch_storage_sqlite::SqliteKeyValueStore;

use crate::config::{Config, LogFormat};

pub fn init_tracing(log_format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

pub fn build_dashboard(config: &Config, ephemeral: bool) -> anyhow::Result<DashboardService> {
    let store: Arc<dyn KeyValueStore> = if ephemeral {
        tracing::info!("Using in-memory storage");
        Arc::new(MemoryStore::new())
    } else {
        let store = SqliteKeyValueStore::open(&config.db_path)
            .with_context(|| format!("Failed to open database at {}", config.db_path))?;
        tracing::info!("Database path in use: {}", config.db_path);
        Arc::new(store)
    };

    let provider: Arc<dyn MarketDataProvider> = Arc::new(FinnhubProvider::with_base_url(
        config.api_key.clone(),
        config.base_url.clone(),
    ));
    // One limiter for every request the dashboard makes.
    let limiter = request_limiter(provider.as_ref(), config.min_request_delay);
    let cache = QuoteCache::new(Arc::clone(&store));

    let quotes = QuoteService::new(Arc::clone(&provider), limiter.clone(), cache.clone());
    let history = HistoryService::new(provider, limiter, cache)
        .with_synthetic_fallback(config.synthetic_history);

    Ok(DashboardService::new(
        Watchlist::new(store),
        Arc::new(quotes),
        Arc::new(history),
    ))
}

/// Build the shared limiter from the provider's advertised limit, unless the
/// configuration pins the spacing.
fn request_limiter(provider: &dyn MarketDataProvider, min_delay: Option<Duration>) -> RateLimiter {
    let limit = provider.rate_limit();
    let limiter = match min_delay {
        Some(delay) => RateLimiter::new(delay),
        None => RateLimiter::from_rate_limit(&limit),
    };
    tracing::info!(
        "{} allows {} requests/min, spacing requests by {}ms",
        provider.id(),
        limit.requests_per_minute,
        limiter.min_delay().as_millis()
    );
    limiter
}
