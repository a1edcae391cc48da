pub mod kv_traits;
pub mod memory_store;

pub use kv_traits::KeyValueStore;
pub use memory_store::MemoryStore;
