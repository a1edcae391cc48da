use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::time::MissedTickBehavior;

use tickerwatch_core::{DashboardService, QuoteObserver};
use tickerwatch_market_data::{ChartPeriod, ChartState, Quote};

use crate::format::{format_price, quote_row, quote_table, sort_quotes, sparkline, SortKey};

pub fn list(dashboard: &DashboardService) -> anyhow::Result<()> {
    let symbols = dashboard
        .watchlist()
        .symbols()
        .context("Failed to read watchlist")?;
    if symbols.is_empty() {
        println!("Watchlist is empty. Add a ticker with `tickerwatch add <SYMBOL>`.");
    }
    for symbol in symbols {
        println!("{}", symbol);
    }
    Ok(())
}

pub async fn add(dashboard: &DashboardService, input: &str) -> anyhow::Result<()> {
    let quote = dashboard
        .add_ticker(input)
        .await
        .with_context(|| format!("Could not add {}", input.trim()))?;
    println!("Added {}", quote.symbol);
    println!("{}", quote_row(&quote, Utc::now()));
    Ok(())
}

pub fn remove(dashboard: &DashboardService, symbol: &str) -> anyhow::Result<()> {
    let symbol = symbol.trim().to_uppercase();
    if dashboard
        .remove_ticker(&symbol)
        .context("Failed to update watchlist")?
    {
        println!("Removed {}", symbol);
    } else {
        println!("{} is not in the watchlist", symbol);
    }
    Ok(())
}

pub async fn quotes(dashboard: &DashboardService, sort: SortKey, desc: bool) -> anyhow::Result<()> {
    let progress = |quote: &Quote| eprintln!("  {}", quote_row(quote, Utc::now()));
    let mut quotes = dashboard
        .refresh(Some(&progress as &dyn QuoteObserver))
        .await
        .context("Failed to refresh quotes")?;

    if quotes.is_empty() {
        println!("Watchlist is empty.");
        return Ok(());
    }

    sort_quotes(&mut quotes, sort, desc);
    println!("{}", quote_table(&quotes, Utc::now()));
    Ok(())
}

pub async fn watch(dashboard: &DashboardService, every: Duration) -> anyhow::Result<()> {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    tracing::info!("Refreshing every {}s, press Ctrl-C to stop", every.as_secs());
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {}
        }

        let quotes = tokio::select! {
            _ = &mut shutdown => break,
            quotes = dashboard.refresh(None) => quotes.context("Failed to refresh quotes")?,
        };

        let now = Utc::now();
        println!("Updated {}", now.format("%H:%M:%S"));
        if quotes.is_empty() {
            println!("Watchlist is empty.");
        } else {
            println!("{}", quote_table(&quotes, now));
        }
        println!();
    }

    tracing::info!("Stopped watching");
    Ok(())
}

pub async fn chart(
    dashboard: &DashboardService,
    symbol: &str,
    period: ChartPeriod,
) -> anyhow::Result<()> {
    let symbol = symbol.trim().to_uppercase();
    println!("{}", render_chart(&symbol, period, &ChartState::Loading));

    let state = dashboard.chart(&symbol, period).await;
    let rendered = render_chart(&symbol, period, &state);
    match state {
        ChartState::Failed(_) => anyhow::bail!(rendered),
        _ => println!("{}", rendered),
    }
    Ok(())
}

fn render_chart(symbol: &str, period: ChartPeriod, state: &ChartState) -> String {
    match state {
        ChartState::Loading => format!("Loading {} ({} days)...", symbol, period.days()),
        ChartState::Failed(message) => format!("Chart unavailable for {}: {}", symbol, message),
        ChartState::Ready(series) => {
            let closes: Vec<Decimal> = series.closes().collect();
            let (Some(min), Some(max), Some(last)) =
                (closes.iter().min(), closes.iter().max(), closes.last())
            else {
                return format!("No price history for {}", symbol);
            };

            let mut out = format!(
                "{} {}\nmin {}  max {}  last {}",
                symbol,
                sparkline(&closes),
                format_price(*min),
                format_price(*max),
                format_price(*last),
            );
            if series.is_synthetic() {
                out.push_str("\n(simulated data: the provider returned no history)");
            }
            out
        }
    }
}
