pub mod error;
pub mod keys;
pub mod memory_store;
pub mod store;
pub mod tenant_cache;

pub use error::{CacheError, Result};
pub use keys::{PROTECTED_KEYS, TENANT_NAMESPACE, tenant_key, tenant_prefix};
pub use memory_store::MemoryStore;
pub use store::KeyValueStore;
pub use tenant_cache::{EvictOptions, TenantCacheStore};
