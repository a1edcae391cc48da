use clap::{Parser, Subcommand, ValueEnum};

use tickerwatch_market_data::ChartPeriod;

use crate::format::SortKey;

#[derive(Parser)]
#[command(name = "tickerwatch")]
#[command(about = "Watch stock quotes from Finnhub in the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Keep the watchlist and cache in memory instead of the database
    #[arg(long, global = true)]
    pub ephemeral: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the watchlist
    List,

    /// Add a ticker after checking it with the provider
    Add {
        /// Ticker symbol, 1-5 letters (e.g., NVDA)
        symbol: String,
    },

    /// Remove a ticker
    Remove { symbol: String },

    /// Fetch quotes for the whole watchlist once
    Quotes {
        #[arg(short, long, value_enum, default_value_t = SortKey::Symbol)]
        sort: SortKey,

        /// Sort in descending order
        #[arg(long)]
        desc: bool,
    },

    /// Refresh quotes periodically until interrupted
    Watch {
        /// Seconds between refreshes (defaults to TW_REFRESH_INTERVAL_SECS)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Draw a price sparkline
    Chart {
        symbol: String,

        #[arg(short, long, value_enum, default_value_t = PeriodArg::Week)]
        period: PeriodArg,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PeriodArg {
    Week,
    Month,
}

impl From<PeriodArg> for ChartPeriod {
    fn from(period: PeriodArg) -> Self {
        match period {
            PeriodArg::Week => ChartPeriod::Week,
            PeriodArg::Month => ChartPeriod::Month,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quotes_flags() {
        let cli = Cli::parse_from(["tickerwatch", "quotes", "--sort", "change-percent", "--desc"]);
        match cli.command {
            Commands::Quotes { sort, desc } => {
                assert_eq!(sort, SortKey::ChangePercent);
                assert!(desc);
            }
            _ => panic!("expected quotes command"),
        }
        assert!(!cli.ephemeral);
    }

    #[test]
    fn test_parse_chart_with_global_flag() {
        let cli = Cli::parse_from([
            "tickerwatch",
            "chart",
            "msft",
            "--period",
            "month",
            "--ephemeral",
        ]);
        match cli.command {
            Commands::Chart { symbol, period } => {
                assert_eq!(symbol, "msft");
                assert_eq!(ChartPeriod::from(period), ChartPeriod::Month);
            }
            _ => panic!("expected chart command"),
        }
        assert!(cli.ephemeral);
    }

    #[test]
    fn test_command_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
