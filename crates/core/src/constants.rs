/// Key holding the JSON-encoded watchlist
pub const WATCHLIST_KEY: &str = "stock-watchlist";

/// Prefix for every cache entry key
pub const CACHE_KEY_PREFIX: &str = "stock-cache-";

/// How long a cache entry stays valid, in milliseconds
pub const CACHE_DURATION_MS: i64 = 60_000;

/// Watchlist used until the user saves one of their own
pub const DEFAULT_WATCHLIST: [&str; 5] = ["AAPL", "GOOGL", "MSFT", "AMZN", "TSLA"];
