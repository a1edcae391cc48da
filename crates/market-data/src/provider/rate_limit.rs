//! Provider rate limit descriptions.

use std::time::Duration;

/// Minimum spacing between dispatches that keeps Finnhub's free tier
/// (60 calls per minute) from rejecting requests.
pub const DEFAULT_MIN_DELAY: Duration = Duration::from_millis(1_100);

/// Rate limiting configuration for a provider.
///
/// Controls how aggressively we can call a provider to avoid
/// hitting their rate limits and getting blocked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimit {
    /// Maximum requests allowed per minute.
    pub requests_per_minute: u32,

    /// Minimum delay between the start of consecutive requests.
    pub min_delay: Duration,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            requests_per_minute: 60,
            min_delay: DEFAULT_MIN_DELAY,
        }
    }
}
