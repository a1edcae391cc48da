//! Market data models
//!
//! - `quote` - Price snapshot or error sentinel for one ticker (Quote)
//! - `history` - Candles, history series and chart state (PricePoint, HistorySeries, ChartState)

mod history;
mod quote;

pub use history::{ChartPeriod, ChartState, HistorySeries, HistorySource, PricePoint};
pub use quote::Quote;
