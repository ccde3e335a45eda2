//! Per-item metadata cache with TTL expiration.
//!
//! Entries live in the host's key-value metadata store under a `_cache_`
//! prefix, wrapped with an absolute expiry timestamp. TTL is evaluated at
//! read time rather than by a background sweep: for a low-write-volume cache
//! a scheduler buys nothing, and an expired entry is purged the first time
//! anything looks at it.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::host::MetaStore;

/// Default entry lifetime. A day balances upstream quota consumption against
/// staleness; titles and durations rarely change.
#[must_use]
pub fn default_ttl() -> Duration {
    Duration::hours(24)
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    /// Unix seconds. An entry with `expires_at <= now` is logically absent.
    expires_at: i64,
    value: serde_json::Value,
}

/// TTL cache over the host metadata store, keyed by `(item_id, key)`.
#[derive(Clone)]
pub struct MetadataCache {
    meta: Arc<dyn MetaStore>,
}

impl MetadataCache {
    pub fn new(meta: Arc<dyn MetaStore>) -> Self {
        Self { meta }
    }

    fn meta_key(key: &str) -> String {
        format!("_cache_{key}")
    }

    /// Read a live entry, or `None` if the entry is missing or expired.
    ///
    /// Expired (or unreadable) entries are deleted as a side effect of the
    /// read, so a second `get` finds no residue.
    pub fn get(&self, item_id: u64, key: &str) -> Option<serde_json::Value> {
        let raw = self.meta.get_meta(item_id, &Self::meta_key(key))?;

        let entry: CacheEntry = match serde_json::from_value(raw) {
            Ok(entry) => entry,
            Err(err) => {
                debug!(item_id, key, %err, "dropping unreadable cache entry");
                self.delete(item_id, key);
                return None;
            }
        };

        if entry.expires_at <= Utc::now().timestamp() {
            debug!(item_id, key, "cache entry expired");
            self.delete(item_id, key);
            return None;
        }

        Some(entry.value)
    }

    /// Store `value` with the default 24-hour TTL, overwriting any existing
    /// entry unconditionally.
    pub fn set(&self, item_id: u64, key: &str, value: serde_json::Value) {
        self.set_with_ttl(item_id, key, value, default_ttl());
    }

    /// Store `value` with an explicit TTL.
    pub fn set_with_ttl(
        &self,
        item_id: u64,
        key: &str,
        value: serde_json::Value,
        ttl: Duration,
    ) {
        let entry = CacheEntry {
            expires_at: (Utc::now() + ttl).timestamp(),
            value,
        };
        let raw = serde_json::to_value(&entry)
            .expect("cache entry of JSON values always serializes");
        self.meta.set_meta(item_id, &Self::meta_key(key), raw);
    }

    /// Remove an entry. Removing an absent entry is not an error.
    pub fn delete(&self, item_id: u64, key: &str) {
        self.meta.delete_meta(item_id, &Self::meta_key(key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryMetaStore;
    use serde_json::json;

    fn cache_over(store: Arc<MemoryMetaStore>) -> MetadataCache {
        MetadataCache::new(store)
    }

    #[test]
    fn set_then_get_round_trips() {
        let cache = cache_over(Arc::new(MemoryMetaStore::new()));
        cache.set(7, "video_metadata", json!({"title": "t"}));
        assert_eq!(cache.get(7, "video_metadata"), Some(json!({"title": "t"})));
    }

    #[test]
    fn get_is_scoped_by_item() {
        let cache = cache_over(Arc::new(MemoryMetaStore::new()));
        cache.set(1, "k", json!(1));
        assert_eq!(cache.get(2, "k"), None);
    }

    #[test]
    fn expired_entry_is_a_miss_and_is_purged() {
        let store = Arc::new(MemoryMetaStore::new());
        let cache = cache_over(store.clone());

        // A non-positive TTL produces an already-expired entry.
        cache.set_with_ttl(3, "k", json!("v"), Duration::seconds(-1));
        assert_eq!(cache.get(3, "k"), None);

        // Purged on read, not merely ignored.
        assert_eq!(store.get_meta(3, "_cache_k"), None);
        assert_eq!(cache.get(3, "k"), None);
    }

    #[test]
    fn set_overwrites_unconditionally() {
        let cache = cache_over(Arc::new(MemoryMetaStore::new()));
        cache.set(4, "k", json!("old"));
        cache.set(4, "k", json!("new"));
        assert_eq!(cache.get(4, "k"), Some(json!("new")));
    }

    #[test]
    fn delete_is_idempotent() {
        let cache = cache_over(Arc::new(MemoryMetaStore::new()));
        cache.set(5, "k", json!("v"));
        cache.delete(5, "k");
        assert_eq!(cache.get(5, "k"), None);
        cache.delete(5, "k");
    }

    #[test]
    fn unreadable_entry_is_dropped() {
        let store = Arc::new(MemoryMetaStore::new());
        let cache = cache_over(store.clone());

        store.set_meta(6, "_cache_k", json!("not an entry"));
        assert_eq!(cache.get(6, "k"), None);
        assert_eq!(store.get_meta(6, "_cache_k"), None);
    }
}
