//! SQLite storage implementation for the key-value store.

mod model;
mod repository;

pub use model::KvEntryDB;
pub use repository::SqliteKeyValueStore;

// Re-export trait from core for convenience
pub use tickerwatch_core::kv::KeyValueStore;
