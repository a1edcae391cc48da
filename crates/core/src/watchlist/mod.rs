pub mod watchlist_service;

pub use watchlist_service::{normalize_symbol, Watchlist};
