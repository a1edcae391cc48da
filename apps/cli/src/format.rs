//! Terminal formatting for quotes and charts.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use tickerwatch_market_data::Quote;

const SPARK_BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    #[default]
    Symbol,
    Price,
    Change,
    ChangePercent,
}

pub fn format_price(value: Decimal) -> String {
    format!("${:.2}", value.round_dp(2))
}

pub fn format_change(value: Decimal) -> String {
    let sign = if value.is_sign_negative() && !value.is_zero() { "" } else { "+" };
    format!("{}{:.2}", sign, value.round_dp(2))
}

pub fn format_percent(value: Decimal) -> String {
    format!("{}%", format_change(value))
}

/// "Just now", "5m ago", "2h ago", or the date for anything older than a day.
pub fn format_age(updated_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - updated_at).num_minutes();
    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 24 * 60 {
        format!("{}h ago", minutes / 60)
    } else {
        updated_at.format("%Y-%m-%d").to_string()
    }
}

/// Sort quotes in place. Failed quotes always go last.
pub fn sort_quotes(quotes: &mut [Quote], key: SortKey, descending: bool) {
    quotes.sort_by(|a, b| match (a.is_error(), b.is_error()) {
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        _ => {
            let ordering = match key {
                SortKey::Symbol => a.symbol.cmp(&b.symbol),
                SortKey::Price => a.price.cmp(&b.price),
                SortKey::Change => a.change.cmp(&b.change),
                SortKey::ChangePercent => a.change_percent.cmp(&b.change_percent),
            };
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        }
    });
}

pub fn quote_row(quote: &Quote, now: DateTime<Utc>) -> String {
    if quote.is_error() {
        return format!(
            "{:<6} {}",
            quote.symbol,
            quote.error_message.as_deref().unwrap_or("Unavailable")
        );
    }
    format!(
        "{:<6} {:>12} {:>10} {:>9} {:>12}",
        quote.symbol,
        format_price(quote.price),
        format_change(quote.change),
        format_percent(quote.change_percent),
        format_age(quote.updated_at, now),
    )
}

pub fn quote_table(quotes: &[Quote], now: DateTime<Utc>) -> String {
    let mut lines = vec![format!(
        "{:<6} {:>12} {:>10} {:>9} {:>12}",
        "SYMBOL", "PRICE", "CHANGE", "CHANGE%", "UPDATED"
    )];
    lines.extend(quotes.iter().map(|q| quote_row(q, now)));
    lines.join("\n")
}

/// One bar per value, scaled between the series minimum and maximum.
pub fn sparkline(values: &[Decimal]) -> String {
    let (Some(min), Some(max)) = (values.iter().min(), values.iter().max()) else {
        return String::new();
    };
    let range = *max - *min;
    let top = SPARK_BARS.len() - 1;

    values
        .iter()
        .map(|value| {
            if range.is_zero() {
                return SPARK_BARS[top / 2];
            }
            let scaled = ((*value - *min) / range * Decimal::from(top)).round();
            SPARK_BARS[scaled.to_usize().unwrap_or(0).min(top)]
        })
        .collect()
}
