//! Finnhub market data provider implementation.
//!
//! This module provides market data from Finnhub API:
//! - Latest quotes via the /quote endpoint
//! - Daily candles via the /stock/candle endpoint
//!
//! The API key is sent as a `token` query parameter. Some keys are only
//! accepted in the `X-Finnhub-Token` header, so a 403 on the query-parameter
//! form is retried once with the header form.
//!
//! Finnhub free tier is limited to 60 API calls per minute.
//! API documentation: https://finnhub.io/docs/api

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::MarketDataError;
use crate::models::{PricePoint, Quote};
use crate::provider::{MarketDataProvider, RateLimit, DEFAULT_MIN_DELAY};

pub const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";
const PROVIDER_ID: &str = "FINNHUB";
const TOKEN_HEADER: &str = "X-Finnhub-Token";

// ============================================================================
// API Response Structures
// ============================================================================

/// Response from /quote endpoint
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    /// Current price
    c: Option<f64>,
    /// Change
    d: Option<f64>,
    /// Percent change
    dp: Option<f64>,
    /// Previous close price
    pc: Option<f64>,
    // Note: h, l, o, t exist but are not shown on the watchlist
}

/// Response from /stock/candle endpoint
#[derive(Debug, Deserialize)]
struct CandleResponse {
    /// Status: "ok" or "no_data"
    s: String,
    /// Close prices
    #[serde(default)]
    c: Vec<f64>,
    /// High prices
    #[serde(default)]
    h: Vec<f64>,
    /// Low prices
    #[serde(default)]
    l: Vec<f64>,
    /// Open prices
    #[serde(default)]
    o: Vec<f64>,
    /// Volume
    #[serde(default)]
    v: Vec<f64>,
    /// Timestamps (Unix)
    #[serde(default)]
    t: Vec<i64>,
}

/// How the API key travels with a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TokenMode {
    Query,
    Header,
}

// ============================================================================
// FinnhubProvider
// ============================================================================

/// Finnhub market data provider.
pub struct FinnhubProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FinnhubProvider {
    /// Create a new Finnhub provider with the given API key.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Create a provider that talks to a different API root (proxies, sandboxes).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn build_request(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        mode: TokenMode,
    ) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, endpoint);
        let request = self.client.get(&url).query(params);

        match mode {
            TokenMode::Query => request.query(&[("token", self.api_key.as_str())]),
            TokenMode::Header => request.header(TOKEN_HEADER, &self.api_key),
        }
    }

    async fn send(
        &self,
        symbol: &str,
        endpoint: &str,
        params: &[(&str, &str)],
        mode: TokenMode,
    ) -> Result<Response, MarketDataError> {
        self.build_request(endpoint, params, mode)
            .send()
            .await
            .map_err(|e| MarketDataError::network(symbol, format!("Request failed: {}", e)))
    }

    /// Make a GET request to the Finnhub API and return the body.
    async fn fetch(
        &self,
        symbol: &str,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<String, MarketDataError> {
        debug!("{} request: {} for {}", self.id(), endpoint, symbol);

        let mut response = self.send(symbol, endpoint, params, TokenMode::Query).await?;

        if response.status() == StatusCode::FORBIDDEN {
            debug!(
                "Finnhub rejected query token for {}, retrying with {} header",
                endpoint, TOKEN_HEADER
            );
            response = self.send(symbol, endpoint, params, TokenMode::Header).await?;
        }

        let status = response.status();
        if !status.is_success() {
            // Status text only ("Bad Gateway"), as shown on error rows.
            let reason = status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.as_str().to_string());
            return Err(MarketDataError::network(symbol, reason));
        }

        response.text().await.map_err(|e| {
            MarketDataError::network(symbol, format!("Failed to read response: {}", e))
        })
    }
}

// ============================================================================
// MarketDataProvider Implementation
// ============================================================================

#[async_trait]
impl MarketDataProvider for FinnhubProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit {
            requests_per_minute: 60, // Free tier limit
            min_delay: DEFAULT_MIN_DELAY,
        }
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let text = self.fetch(symbol, "/quote", &[("symbol", symbol)]).await?;
        parse_quote(symbol, &text)
    }

    async fn get_historical_quotes(
        &self,
        symbol: &str,
        resolution: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>, MarketDataError> {
        let from_ts = start.timestamp().to_string();
        let to_ts = end.timestamp().to_string();
        let params = [
            ("symbol", symbol),
            ("resolution", resolution),
            ("from", from_ts.as_str()),
            ("to", to_ts.as_str()),
        ];

        let text = self.fetch(symbol, "/stock/candle", &params).await?;
        let points = parse_candles(symbol, &text)?;

        debug!(
            "Finnhub: fetched {} candles for {} ({} to {})",
            points.len(),
            symbol,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        );

        Ok(points)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn to_decimal(value: f64, field: &str) -> Result<Decimal, MarketDataError> {
    Decimal::try_from(value).map_err(|e| MarketDataError::parse(field, e))
}

/// Decode a /quote body.
///
/// Finnhub answers unknown symbols with a zeroed payload instead of an error;
/// `c == 0 && pc == 0` is the only signal that the symbol does not exist.
/// Both fields must be present and zero. A missing price is a parse error.
fn parse_quote(symbol: &str, text: &str) -> Result<Quote, MarketDataError> {
    let response: QuoteResponse =
        serde_json::from_str(text).map_err(|e| MarketDataError::parse("quote response", e))?;

    if response.c == Some(0.0) && response.pc == Some(0.0) {
        return Err(MarketDataError::InvalidSymbol(symbol.to_string()));
    }

    let current = response
        .c
        .ok_or_else(|| MarketDataError::parse("quote response", "missing current price"))?;

    Ok(Quote::new(
        symbol,
        to_decimal(current, "price")?,
        to_decimal(response.d.unwrap_or(0.0), "change")?,
        to_decimal(response.dp.unwrap_or(0.0), "change percent")?,
    ))
}

/// Decode a /stock/candle body into ascending price points.
fn parse_candles(symbol: &str, text: &str) -> Result<Vec<PricePoint>, MarketDataError> {
    let response: CandleResponse =
        serde_json::from_str(text).map_err(|e| MarketDataError::parse("candle response", e))?;

    if response.s == "no_data" || response.c.is_empty() {
        return Err(MarketDataError::NoData(symbol.to_string()));
    }

    if response.s != "ok" {
        return Err(MarketDataError::parse(
            "candle response",
            format!("unexpected status {}", response.s),
        ));
    }

    let len = response.t.len();
    if response.c.len() != len
        || response.o.len() != len
        || response.h.len() != len
        || response.l.len() != len
    {
        return Err(MarketDataError::parse(
            "candle response",
            "mismatched array lengths",
        ));
    }

    let mut points = Vec::with_capacity(len);

    for i in 0..len {
        let timestamp = match Utc.timestamp_opt(response.t[i], 0).single() {
            Some(ts) => ts,
            None => {
                warn!("Invalid timestamp at index {}: {}", i, response.t[i]);
                continue;
            }
        };

        let volume = response.v.get(i).copied().unwrap_or(0.0);

        points.push(PricePoint {
            timestamp,
            open: to_decimal(response.o[i], "open")?,
            high: to_decimal(response.h[i], "high")?,
            low: to_decimal(response.l[i], "low")?,
            close: to_decimal(response.c[i], "close")?,
            volume: to_decimal(volume, "volume")?,
        });
    }

    points.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    Ok(points)
}

// ============================================================================
// Tests
// ============================================================================
