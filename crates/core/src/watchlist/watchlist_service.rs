//! Persisted, ordered list of tracked tickers.

use std::sync::{Arc, Mutex};

use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;

use crate::constants::{DEFAULT_WATCHLIST, WATCHLIST_KEY};
use crate::errors::{Result, ValidationError};
use crate::kv::KeyValueStore;

lazy_static! {
    /// Ticker accepted from user input: 1 to 5 upper-case letters
    static ref SYMBOL_REGEX: Regex = Regex::new(r"^[A-Z]{1,5}$").expect("Invalid regex pattern");
}

/// Trim and upper-case user input, rejecting anything that is not a plain ticker.
pub fn normalize_symbol(input: &str) -> std::result::Result<String, ValidationError> {
    let symbol = input.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(ValidationError::EmptySymbol);
    }
    if !SYMBOL_REGEX.is_match(&symbol) {
        return Err(ValidationError::InvalidSymbol(symbol));
    }
    Ok(symbol)
}

/// Watchlist stored as one JSON array under [`WATCHLIST_KEY`].
///
/// Symbols keep insertion order and are unique ignoring case. Until a list has
/// been saved, [`DEFAULT_WATCHLIST`] is returned.
#[derive(Clone)]
pub struct Watchlist {
    store: Arc<dyn KeyValueStore>,
    // Serializes read-modify-write cycles within the process.
    write_lock: Arc<Mutex<()>>,
}

impl Watchlist {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn symbols(&self) -> Result<Vec<String>> {
        let Some(raw) = self.store.get(WATCHLIST_KEY)? else {
            return Ok(default_symbols());
        };

        match serde_json::from_str(&raw) {
            Ok(symbols) => Ok(symbols),
            Err(e) => {
                warn!("Stored watchlist is unreadable, using defaults: {}", e);
                Ok(default_symbols())
            }
        }
    }

    /// Overwrite the stored list.
    pub fn replace(&self, symbols: &[String]) -> Result<()> {
        let raw = serde_json::to_string(symbols)?;
        self.store.set(WATCHLIST_KEY, &raw)
    }

    /// Append `symbol` (upper-cased) unless it is already tracked.
    ///
    /// Returns whether the list changed.
    pub fn add(&self, symbol: &str) -> Result<bool> {
        let symbol = symbol.trim().to_uppercase();
        let _guard = self.lock();

        let mut symbols = self.symbols()?;
        if symbols.iter().any(|s| s.eq_ignore_ascii_case(&symbol)) {
            debug!("{} already in watchlist", symbol);
            return Ok(false);
        }
        symbols.push(symbol);
        self.replace(&symbols)?;
        Ok(true)
    }

    /// Drop `symbol`, matched ignoring case. Returns whether the list changed.
    pub fn remove(&self, symbol: &str) -> Result<bool> {
        let symbol = symbol.trim();
        let _guard = self.lock();

        let mut symbols = self.symbols()?;
        let before = symbols.len();
        symbols.retain(|s| !s.eq_ignore_ascii_case(symbol));
        if symbols.len() == before {
            return Ok(false);
        }
        self.replace(&symbols)?;
        Ok(true)
    }

    pub fn contains(&self, symbol: &str) -> Result<bool> {
        let symbol = symbol.trim();
        Ok(self
            .symbols()?
            .iter()
            .any(|s| s.eq_ignore_ascii_case(symbol)))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn default_symbols() -> Vec<String> {
    DEFAULT_WATCHLIST.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;

    fn watchlist() -> (Arc<MemoryStore>, Watchlist) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), Watchlist::new(store))
    }

    #[test]
    fn test_defaults_until_saved() {
        let (store, watchlist) = watchlist();
        assert_eq!(
            watchlist.symbols().unwrap(),
            vec!["AAPL", "GOOGL", "MSFT", "AMZN", "TSLA"]
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_empty_saved_list_is_not_replaced_by_defaults() {
        let (_, watchlist) = watchlist();
        watchlist.replace(&[]).unwrap();
        assert!(watchlist.symbols().unwrap().is_empty());
    }

    #[test]
    fn test_add_upper_cases_and_appends() {
        let (store, watchlist) = watchlist();
        assert!(watchlist.add("nvda").unwrap());

        let symbols = watchlist.symbols().unwrap();
        assert_eq!(symbols.last().map(String::as_str), Some("NVDA"));
        assert_eq!(symbols.len(), 6);
        assert_eq!(
            store.get(WATCHLIST_KEY).unwrap().as_deref(),
            Some(r#"["AAPL","GOOGL","MSFT","AMZN","TSLA","NVDA"]"#)
        );
    }

    #[test]
    fn test_add_duplicate_ignoring_case_leaves_list_unchanged() {
        let (_, watchlist) = watchlist();
        assert!(!watchlist.add("aapl").unwrap());
        assert_eq!(watchlist.symbols().unwrap().len(), 5);
    }

    #[test]
    fn test_remove_ignores_case() {
        let (_, watchlist) = watchlist();
        assert!(watchlist.remove("msft").unwrap());
        assert!(!watchlist.contains("MSFT").unwrap());
        assert!(!watchlist.remove("MSFT").unwrap());
        assert_eq!(
            watchlist.symbols().unwrap(),
            vec!["AAPL", "GOOGL", "AMZN", "TSLA"]
        );
    }

    #[test]
    fn test_unreadable_list_falls_back_to_defaults() {
        let (store, watchlist) = watchlist();
        store.set(WATCHLIST_KEY, "AAPL,MSFT").unwrap();
        assert_eq!(watchlist.symbols().unwrap().len(), 5);
    }

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol("  aapl ").unwrap(), "AAPL");
        assert_eq!(normalize_symbol("f").unwrap(), "F");
        assert_eq!(normalize_symbol("   "), Err(ValidationError::EmptySymbol));
        assert_eq!(
            normalize_symbol("brk.b"),
            Err(ValidationError::InvalidSymbol("BRK.B".to_string()))
        );
        assert_eq!(
            normalize_symbol("GOOGLE"),
            Err(ValidationError::InvalidSymbol("GOOGLE".to_string()))
        );
        assert!(normalize_symbol("AB1").is_err());
    }
}
