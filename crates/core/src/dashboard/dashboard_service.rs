//! Dashboard orchestration: watchlist edits, refreshes and charts.

use std::sync::Arc;

use log::{debug, info, warn};

use tickerwatch_market_data::{ChartPeriod, ChartState, Quote};

use crate::errors::{Error, Result};
use crate::history::HistoryServiceTrait;
use crate::quotes::{QuoteObserver, QuoteServiceTrait};
use crate::watchlist::{normalize_symbol, Watchlist};

pub struct DashboardService {
    watchlist: Watchlist,
    quotes: Arc<dyn QuoteServiceTrait>,
    history: Arc<dyn HistoryServiceTrait>,
}

impl DashboardService {
    pub fn new(
        watchlist: Watchlist,
        quotes: Arc<dyn QuoteServiceTrait>,
        history: Arc<dyn HistoryServiceTrait>,
    ) -> Self {
        Self {
            watchlist,
            quotes,
            history,
        }
    }

    pub fn watchlist(&self) -> &Watchlist {
        &self.watchlist
    }

    /// Quotes for every watched symbol, in watchlist order.
    pub async fn refresh(&self, observer: Option<&dyn QuoteObserver>) -> Result<Vec<Quote>> {
        let symbols = self.watchlist.symbols()?;
        if symbols.is_empty() {
            debug!("Watchlist is empty, nothing to refresh");
            return Ok(Vec::new());
        }
        Ok(self.quotes.fetch_many(&symbols, observer).await)
    }

    /// Validate, track and fetch a new ticker.
    ///
    /// The watchlist is only changed if the first quote resolves; otherwise
    /// the symbol is taken out again and the error returned.
    pub async fn add_ticker(&self, input: &str) -> Result<Quote> {
        let symbol = normalize_symbol(input)?;
        if !self.watchlist.add(&symbol)? {
            return Err(Error::DuplicateSymbol(symbol));
        }

        match self.quotes.fetch_one(&symbol).await {
            Ok(quote) => {
                info!("Added {} to watchlist", symbol);
                Ok(quote)
            }
            Err(err) => {
                warn!("Could not add {}: {}", symbol, err);
                if let Err(rollback) = self.watchlist.remove(&symbol) {
                    warn!("Failed to roll back watchlist for {}: {}", symbol, rollback);
                }
                Err(err)
            }
        }
    }

    pub fn remove_ticker(&self, symbol: &str) -> Result<bool> {
        let removed = self.watchlist.remove(symbol)?;
        if removed {
            info!("Removed {} from watchlist", symbol.trim().to_uppercase());
        }
        Ok(removed)
    }

    pub async fn chart(&self, symbol: &str, period: ChartPeriod) -> ChartState {
        self.history.chart(symbol, period).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::QuoteCache;
    use crate::errors::ValidationError;
    use crate::history::HistoryService;
    use crate::kv::MemoryStore;
    use crate::quotes::QuoteService;
    use crate::test_utils::{MockProvider, MockQuote};
    use rust_decimal_macros::dec;
    use std::time::Duration;
    use tickerwatch_market_data::RateLimiter;

    fn dashboard(provider: &MockProvider) -> DashboardService {
        let store = Arc::new(MemoryStore::new());
        let cache = QuoteCache::new(store.clone());
        let limiter = RateLimiter::new(Duration::ZERO);
        let quotes = QuoteService::new(Arc::new(provider.clone()), limiter.clone(), cache.clone());
        let history = HistoryService::new(Arc::new(provider.clone()), limiter, cache);
        DashboardService::new(Watchlist::new(store), Arc::new(quotes), Arc::new(history))
    }

    fn quote(symbol: &str) -> Quote {
        Quote::new(symbol, dec!(42.00), dec!(-0.50), dec!(-1.18))
    }

    #[tokio::test]
    async fn test_refresh_empty_watchlist_makes_no_requests() {
        let provider = MockProvider::new();
        let dashboard = dashboard(&provider);
        dashboard.watchlist().replace(&[]).unwrap();

        let quotes = dashboard.refresh(None).await.unwrap();
        assert!(quotes.is_empty());
        assert!(provider.quote_calls().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_follows_watchlist_order() {
        let provider = MockProvider::new();
        for symbol in ["AAPL", "GOOGL", "MSFT", "AMZN", "TSLA"] {
            provider.set_quote(symbol, MockQuote::Ok(quote(symbol)));
        }
        let dashboard = dashboard(&provider);

        let quotes = dashboard.refresh(None).await.unwrap();
        let symbols: Vec<&str> = quotes.iter().map(|q| q.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "GOOGL", "MSFT", "AMZN", "TSLA"]);
    }

    #[tokio::test]
    async fn test_add_ticker_normalizes_and_tracks() {
        let provider = MockProvider::new();
        provider.set_quote("NVDA", MockQuote::Ok(quote("NVDA")));
        let dashboard = dashboard(&provider);

        let added = dashboard.add_ticker("  nvda ").await.unwrap();
        assert_eq!(added.symbol, "NVDA");
        assert!(dashboard.watchlist().contains("NVDA").unwrap());
        assert_eq!(provider.quote_calls(), vec!["NVDA"]);
    }

    #[tokio::test]
    async fn test_add_duplicate_is_rejected_without_request() {
        let provider = MockProvider::new();
        let dashboard = dashboard(&provider);

        let err = dashboard.add_ticker("aapl").await.unwrap_err();
        assert!(matches!(err, Error::DuplicateSymbol(ref s) if s == "AAPL"));
        assert_eq!(dashboard.watchlist().symbols().unwrap().len(), 5);
        assert!(provider.quote_calls().is_empty());
    }

    #[tokio::test]
    async fn test_add_malformed_input_is_rejected() {
        let provider = MockProvider::new();
        let dashboard = dashboard(&provider);

        let err = dashboard.add_ticker("brk.b").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidSymbol(_))
        ));
        assert!(provider.quote_calls().is_empty());
    }

    #[tokio::test]
    async fn test_add_unknown_symbol_rolls_back() {
        let provider = MockProvider::new();
        provider.set_quote("ZZZZ", MockQuote::Unknown);
        let dashboard = dashboard(&provider);

        let err = dashboard.add_ticker("zzzz").await.unwrap_err();
        assert!(err.is_invalid_symbol());
        assert!(!dashboard.watchlist().contains("ZZZZ").unwrap());
        assert_eq!(dashboard.watchlist().symbols().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_add_during_outage_rolls_back() {
        let provider = MockProvider::new();
        provider.set_quote("NVDA", MockQuote::Down("Internal Server Error".into()));
        let dashboard = dashboard(&provider);

        assert!(dashboard.add_ticker("NVDA").await.is_err());
        assert!(!dashboard.watchlist().contains("NVDA").unwrap());
    }

    #[tokio::test]
    async fn test_remove_ticker() {
        let provider = MockProvider::new();
        let dashboard = dashboard(&provider);

        assert!(dashboard.remove_ticker("tsla").unwrap());
        assert!(!dashboard.remove_ticker("TSLA").unwrap());
        assert_eq!(dashboard.watchlist().symbols().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_chart_uses_synthetic_history_when_provider_has_none() {
        let provider = MockProvider::new();
        let dashboard = dashboard(&provider);

        match dashboard.chart("AAPL", ChartPeriod::Month).await {
            ChartState::Ready(series) => {
                assert!(series.is_synthetic());
                assert_eq!(series.points.len(), 31);
            }
            other => panic!("expected ready chart, got {:?}", other),
        }
    }
}
