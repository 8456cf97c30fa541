use crate::keys::{PROTECTED_KEYS, tenant_prefix};
use crate::store::KeyValueStore;

use std::sync::Arc;

use log::{debug, info, warn};

/// Options narrowing an eviction to part of a tenant's namespace
#[derive(Debug, Clone, Default)]
pub struct EvictOptions {
    /// When non-empty, only keys whose remainder (after the tenant prefix)
    /// starts with one of these sub-prefixes are evicted.
    pub sub_prefixes: Vec<String>,
}

/// Cache store partitioned by tenant-id prefix.
///
/// Wraps one or more key/value backends (typically a durable and an
/// ephemeral one) and supports bulk eviction of exactly one tenant's keys.
/// Session-level and other global keys are never touched.
pub struct TenantCacheStore {
    stores: Vec<Arc<dyn KeyValueStore>>,
}

impl TenantCacheStore {
    pub fn new(stores: Vec<Arc<dyn KeyValueStore>>) -> Self {
        Self { stores }
    }

    /// Remove every cached key belonging to the given tenant.
    ///
    /// Matching is on the full delimited namespace prefix, so tenant "12"
    /// never matches keys of tenant "123". A failure reading or removing one
    /// key is logged and does not abort the scan of the remaining keys.
    /// Returns the number of keys removed across all backends.
    pub fn evict_tenant(&self, tenant_id: &str, options: &EvictOptions) -> usize {
        let prefix = tenant_prefix(tenant_id);
        let mut evicted = 0;

        for store in &self.stores {
            let keys = match store.keys() {
                Ok(keys) => keys,
                Err(e) => {
                    warn!(
                        "Skipping {} store, key enumeration failed: {}",
                        store.name(),
                        e
                    );
                    continue;
                }
            };

            for key in keys {
                if !Self::should_evict(&key, &prefix, options) {
                    continue;
                }

                match store.remove(&key) {
                    Ok(()) => {
                        debug!("Evicted {} from {} store", key, store.name());
                        evicted += 1;
                    }
                    Err(e) => {
                        warn!("Failed to remove {} from {} store: {}", key, store.name(), e);
                    }
                }
            }
        }

        info!("Evicted {evicted} cached key(s) for tenant {tenant_id}");
        evicted
    }

    fn should_evict(key: &str, prefix: &str, options: &EvictOptions) -> bool {
        // Protected keys are exempt before any prefix logic runs
        if PROTECTED_KEYS.contains(&key) {
            return false;
        }

        let Some(rest) = key.strip_prefix(prefix) else {
            return false;
        };

        if options.sub_prefixes.is_empty() {
            return true;
        }

        options
            .sub_prefixes
            .iter()
            .any(|sub| rest.starts_with(sub.as_str()))
    }
}
