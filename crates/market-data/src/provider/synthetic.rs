//! Synthetic price history.
//!
//! Used by the history service when the provider has no candles for a ticker
//! (free-tier keys, closed markets, outages) so the chart still has a shape.
//! Series produced here are tagged [`HistorySource::Synthetic`].

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rust_decimal::Decimal;

use crate::models::{HistorySeries, HistorySource, PricePoint};

/// Anchor price for the random walk.
pub fn base_price(symbol: &str) -> i64 {
    match symbol {
        "AAPL" => 180,
        "GOOGL" => 140,
        "MSFT" => 380,
        "AMZN" => 170,
        "TSLA" => 250,
        _ => 100,
    }
}

/// Generate `days + 1` daily points ending at `now`.
///
/// Each close is the base price plus a slightly upward-biased random step and a
/// slow sine wave, rounded to cents. Highs and lows sit 2% either side.
pub fn generate<R: Rng>(
    symbol: &str,
    days: i64,
    now: DateTime<Utc>,
    rng: &mut R,
) -> HistorySeries {
    let base = base_price(symbol) as f64;
    let high_factor = Decimal::new(102, 2);
    let low_factor = Decimal::new(98, 2);

    let points = (0..=days.max(0))
        .rev()
        .map(|i| {
            let random_change = (rng.gen::<f64>() - 0.48) * 5.0;
            let price = base + random_change + (i as f64 / 3.0).sin() * 3.0;
            let close = Decimal::new((price * 100.0).round() as i64, 2);

            PricePoint {
                timestamp: now - Duration::days(i),
                open: close,
                high: close * high_factor,
                low: close * low_factor,
                close,
                volume: Decimal::from(rng.gen_range(0..10_000_000u64)),
            }
        })
        .collect();

    HistorySeries {
        symbol: symbol.to_string(),
        points,
        source: HistorySource::Synthetic,
    }
}
