//! Key-value storage trait shared by the cache and the watchlist.

use crate::errors::Result;

/// String-keyed, string-valued store.
///
/// Writes are last-write-wins. Implementations must be safe to share between
/// tasks; the in-memory store lives in this crate and the durable one in
/// `tickerwatch-storage-sqlite`.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or overwrite a value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
