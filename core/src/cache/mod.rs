pub mod memory;
pub mod store;

pub use memory::MemoryCache;
pub use store::CacheStore;
