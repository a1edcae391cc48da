use diesel::prelude::*;
use std::sync::Arc;

use super::model::KvEntryDB;
use crate::db::{create_pool, get_connection, init, run_migrations, DbPool};
use crate::errors::IntoCore;
use crate::schema::kv_entries::dsl::*;
use tickerwatch_core::errors::Result;
use tickerwatch_core::kv::KeyValueStore;

/// Durable [`KeyValueStore`] backed by the `kv_entries` table.
pub struct SqliteKeyValueStore {
    pool: Arc<DbPool>,
}

impl SqliteKeyValueStore {
    pub fn new(pool: Arc<DbPool>) -> Self {
        SqliteKeyValueStore { pool }
    }

    /// Initialize the database at `db_path`, apply migrations and return a store.
    pub fn open(db_path: &str) -> Result<Self> {
        let db_path = init(db_path)?;
        let pool = create_pool(&db_path)?;
        run_migrations(&pool)?;
        Ok(Self::new(pool))
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = get_connection(&self.pool)?;
        kv_entries
            .filter(entry_key.eq(key))
            .select(entry_value)
            .first::<String>(&mut conn)
            .optional()
            .into_core()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        diesel::replace_into(kv_entries)
            .values(&KvEntryDB {
                entry_key: key.to_string(),
                entry_value: value.to_string(),
            })
            .execute(&mut conn)
            .into_core()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        diesel::delete(kv_entries.filter(entry_key.eq(key)))
            .execute(&mut conn)
            .into_core()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;
    use tickerwatch_core::QuoteCache;
    use tickerwatch_market_data::Quote;

    fn db_path(dir: &TempDir) -> String {
        dir.path()
            .join("nested")
            .join("tickerwatch.db")
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn test_set_get_overwrite_remove() {
        let dir = TempDir::new().unwrap();
        let store = SqliteKeyValueStore::open(&db_path(&dir)).unwrap();

        assert_eq!(store.get("stock-watchlist").unwrap(), None);

        store.set("stock-watchlist", r#"["AAPL"]"#).unwrap();
        store.set("stock-watchlist", r#"["AAPL","MSFT"]"#).unwrap();
        assert_eq!(
            store.get("stock-watchlist").unwrap().as_deref(),
            Some(r#"["AAPL","MSFT"]"#)
        );

        store.remove("stock-watchlist").unwrap();
        store.remove("stock-watchlist").unwrap();
        assert_eq!(store.get("stock-watchlist").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = db_path(&dir);

        {
            let store = SqliteKeyValueStore::open(&path).unwrap();
            store.set("stock-cache-AAPL", "{}").unwrap();
        }

        // Migrations are already applied; opening again must not fail.
        let reopened = SqliteKeyValueStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("stock-cache-AAPL").unwrap().as_deref(),
            Some("{}")
        );
    }

    #[test]
    fn test_quote_cache_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = SqliteKeyValueStore::open(&db_path(&dir)).unwrap();
        let cache = QuoteCache::new(Arc::new(store));

        let quote = Quote::new("MSFT", dec!(415.26), dec!(-2.10), dec!(-0.50));
        cache.put("MSFT", &quote).unwrap();

        let cached: Option<Quote> = cache.get("MSFT").unwrap();
        assert_eq!(cached, Some(quote));
    }
}
