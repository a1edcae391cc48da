use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Price snapshot for a single ticker.
///
/// A quote is either a live snapshot or an error sentinel: `error` is set,
/// the numeric fields are zero and `error_message` explains the failure.
/// Build one with [`Quote::new`] or [`Quote::failed`] so the two shapes never mix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Ticker symbol (e.g., "AAPL")
    pub symbol: String,

    /// Current price
    pub price: Decimal,

    /// Absolute change since the previous close
    pub change: Decimal,

    /// Percent change since the previous close
    pub change_percent: Decimal,

    /// When the snapshot was taken locally
    pub updated_at: DateTime<Utc>,

    /// Set on error sentinels only
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,

    /// Human-readable failure, present iff `error` is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Quote {
    /// Create a live quote stamped with the current time.
    pub fn new(
        symbol: impl Into<String>,
        price: Decimal,
        change: Decimal,
        change_percent: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            change,
            change_percent,
            updated_at: Utc::now(),
            error: false,
            error_message: None,
        }
    }

    /// Create an error sentinel for a symbol that could not be resolved.
    pub fn failed(symbol: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            price: Decimal::ZERO,
            change: Decimal::ZERO,
            change_percent: Decimal::ZERO,
            updated_at: Utc::now(),
            error: true,
            error_message: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error
    }
}
