//! Hand-written provider mock shared by the service tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use tickerwatch_market_data::{
    MarketDataError, MarketDataProvider, PricePoint, Quote, RateLimit,
};

use crate::cache::QuoteCache;

/// Scripted answer for a quote request.
#[derive(Clone)]
pub(crate) enum MockQuote {
    Ok(Quote),
    /// Upstream answered with the zero/zero sentinel.
    Unknown,
    /// Transport or HTTP failure with this status text.
    Down(String),
    /// A concurrent refresh lands in the cache while this request fails.
    CachedThenDown(QuoteCache, Quote),
}

/// Scripted answer for a candle request. Unscripted symbols get `NoData`.
#[derive(Clone)]
pub(crate) enum MockCandles {
    Ok(Vec<PricePoint>),
    Down(String),
}

#[derive(Clone, Default)]
pub(crate) struct MockProvider {
    quotes: Arc<Mutex<HashMap<String, MockQuote>>>,
    candles: Arc<Mutex<HashMap<String, MockCandles>>>,
    quote_calls: Arc<Mutex<Vec<String>>>,
    candle_calls: Arc<Mutex<Vec<(String, String, DateTime<Utc>, DateTime<Utc>)>>>,
}

impl MockProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_quote(&self, symbol: &str, response: MockQuote) {
        self.quotes
            .lock()
            .unwrap()
            .insert(symbol.to_string(), response);
    }

    pub(crate) fn set_candles(&self, symbol: &str, response: MockCandles) {
        self.candles
            .lock()
            .unwrap()
            .insert(symbol.to_string(), response);
    }

    pub(crate) fn quote_calls(&self) -> Vec<String> {
        self.quote_calls.lock().unwrap().clone()
    }

    pub(crate) fn candle_calls(&self) -> Vec<(String, String, DateTime<Utc>, DateTime<Utc>)> {
        self.candle_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    fn id(&self) -> &'static str {
        "MOCK"
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit::default()
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        self.quote_calls.lock().unwrap().push(symbol.to_string());
        let response = self.quotes.lock().unwrap().get(symbol).cloned();

        match response {
            Some(MockQuote::Ok(quote)) => Ok(quote),
            Some(MockQuote::Down(status)) => Err(MarketDataError::Network {
                symbol: symbol.to_string(),
                message: status,
            }),
            Some(MockQuote::CachedThenDown(cache, quote)) => {
                cache.put(symbol, &quote).unwrap();
                Err(MarketDataError::Network {
                    symbol: symbol.to_string(),
                    message: "Service Unavailable".to_string(),
                })
            }
            Some(MockQuote::Unknown) | None => {
                Err(MarketDataError::InvalidSymbol(symbol.to_string()))
            }
        }
    }

    async fn get_historical_quotes(
        &self,
        symbol: &str,
        resolution: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>, MarketDataError> {
        self.candle_calls.lock().unwrap().push((
            symbol.to_string(),
            resolution.to_string(),
            start,
            end,
        ));
        let response = self.candles.lock().unwrap().get(symbol).cloned();

        match response {
            Some(MockCandles::Ok(points)) => Ok(points),
            Some(MockCandles::Down(status)) => Err(MarketDataError::Network {
                symbol: symbol.to_string(),
                message: status,
            }),
            None => Err(MarketDataError::NoData(symbol.to_string())),
        }
    }
}
