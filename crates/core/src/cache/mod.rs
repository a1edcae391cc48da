//! Time-boxed cache on top of a [`KeyValueStore`].
//!
//! Entries are stored as `{"data": <payload>, "timestamp": <epoch ms>}` under
//! `stock-cache-<key>` and are valid for [`CACHE_DURATION_MS`]. Expiry is lazy:
//! the read that finds an entry too old (or unreadable) deletes it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::constants::{CACHE_DURATION_MS, CACHE_KEY_PREFIX};
use crate::errors::Result;
use crate::kv::KeyValueStore;

#[derive(Serialize, Deserialize)]
struct CacheEntry<T> {
    data: T,
    timestamp: i64,
}

/// Cache shared by the quote and history services.
#[derive(Clone)]
pub struct QuoteCache {
    store: Arc<dyn KeyValueStore>,
}

impl QuoteCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Storage key for a cache key.
    pub fn storage_key(key: &str) -> String {
        format!("{}{}", CACHE_KEY_PREFIX, key)
    }

    /// Payload for `key` if present and no older than the cache window.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.get_at(key, Utc::now())
    }

    /// Same as [`get`](Self::get), judged against `now`.
    pub fn get_at<T: DeserializeOwned>(&self, key: &str, now: DateTime<Utc>) -> Result<Option<T>> {
        let storage_key = Self::storage_key(key);
        let Some(raw) = self.store.get(&storage_key)? else {
            return Ok(None);
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Discarding unreadable cache entry {}: {}", storage_key, e);
                self.store.remove(&storage_key)?;
                return Ok(None);
            }
        };

        let age = now.timestamp_millis() - entry.timestamp;
        if age > CACHE_DURATION_MS {
            debug!("Cache entry {} expired ({} ms old)", storage_key, age);
            self.store.remove(&storage_key)?;
            return Ok(None);
        }

        Ok(Some(entry.data))
    }

    /// Store `data` under `key`, stamped with the current time.
    pub fn put<T: Serialize>(&self, key: &str, data: &T) -> Result<()> {
        self.put_at(key, data, Utc::now())
    }

    /// Store `data` under `key`, stamped with `now`.
    pub fn put_at<T: Serialize>(&self, key: &str, data: &T, now: DateTime<Utc>) -> Result<()> {
        let entry = CacheEntry {
            data,
            timestamp: now.timestamp_millis(),
        };
        let raw = serde_json::to_string(&entry)?;
        self.store.set(&Self::storage_key(key), &raw)
    }
}
