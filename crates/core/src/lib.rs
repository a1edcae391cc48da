//! Tickerwatch Core - watchlist, cache and quote orchestration.
//!
//! This crate contains the dashboard logic on top of the market-data crate.
//! It is storage-agnostic and defines the [`KeyValueStore`] trait that the
//! `storage-sqlite` crate implements.

pub mod cache;
pub mod constants;
pub mod dashboard;
pub mod errors;
pub mod history;
pub mod kv;
pub mod quotes;
pub mod watchlist;

#[cfg(test)]
pub(crate) mod test_utils;

pub use cache::QuoteCache;
pub use dashboard::DashboardService;
pub use history::{HistoryService, HistoryServiceTrait};
pub use kv::{KeyValueStore, MemoryStore};
pub use quotes::{QuoteObserver, QuoteService, QuoteServiceTrait};
pub use watchlist::{normalize_symbol, Watchlist};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
