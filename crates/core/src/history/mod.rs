pub mod history_service;

pub use history_service::{history_cache_key, HistoryService, HistoryServiceTrait};
