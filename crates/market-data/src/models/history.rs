use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One daily candle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

/// Where a history series came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistorySource {
    /// Candles returned by the provider
    Provider,
    /// Generated locally because the provider had nothing usable
    Synthetic,
}

/// Price history for a ticker, ordered by timestamp ascending.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistorySeries {
    pub symbol: String,
    pub points: Vec<PricePoint>,
    pub source: HistorySource,
}

impl HistorySeries {
    pub fn closes(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.points.iter().map(|p| p.close)
    }

    pub fn is_synthetic(&self) -> bool {
        self.source == HistorySource::Synthetic
    }
}

/// Lookback window for sparkline charts. Both use daily candles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ChartPeriod {
    #[default]
    Week,
    Month,
}

impl ChartPeriod {
    pub fn days(self) -> i64 {
        match self {
            ChartPeriod::Week => 7,
            ChartPeriod::Month => 30,
        }
    }

    /// Candle resolution passed to the provider.
    pub fn resolution(self) -> &'static str {
        "D"
    }
}

/// State of a chart panel.
#[derive(Clone, Debug, PartialEq)]
pub enum ChartState {
    Loading,
    Failed(String),
    Ready(HistorySeries),
}

impl ChartState {
    pub fn is_ready(&self) -> bool {
        matches!(self, ChartState::Ready(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_chart_period_days() {
        assert_eq!(ChartPeriod::Week.days(), 7);
        assert_eq!(ChartPeriod::Month.days(), 30);
        assert_eq!(ChartPeriod::default(), ChartPeriod::Week);
    }

    #[test]
    fn test_series_closes() {
        let point = |close| PricePoint {
            timestamp: Utc::now(),
            open: close,
            high: close,
            low: close,
            close,
            volume: dec!(0),
        };
        let series = HistorySeries {
            symbol: "AAPL".to_string(),
            points: vec![point(dec!(1)), point(dec!(2))],
            source: HistorySource::Provider,
        };

        assert_eq!(series.closes().collect::<Vec<_>>(), vec![dec!(1), dec!(2)]);
        assert!(!series.is_synthetic());
        assert!(ChartState::Ready(series).is_ready());
        assert!(!ChartState::Loading.is_ready());
    }
}
