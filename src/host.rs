//! Host collaborator interfaces.
//!
//! The enrichment pipeline never talks to a CMS directly. It sees three
//! narrow seams: the content item being rendered (passed explicitly, never
//! read from ambient state), a key-value metadata store scoped to that item,
//! and an asset store that turns image bytes into locally addressable
//! assets. In-memory implementations ship for tests and the CLI.

use std::collections::HashMap;
use std::sync::Mutex;

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::error::MaterializeError;

/// A single content item as the host's rendering layer sees it.
///
/// Every operation in this crate takes the item (or its id/body) explicitly;
/// nothing reads a global "current item".
#[derive(Debug, Clone)]
pub struct ContentItem {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub permalink: String,
    pub published: DateTime<Utc>,
}

/// Per-item key-value metadata, the only durable state this crate writes.
///
/// Backs both the TTL cache and the permanent thumbnail-asset linkage.
pub trait MetaStore: Send + Sync {
    fn get_meta(&self, item_id: u64, key: &str) -> Option<serde_json::Value>;
    fn set_meta(&self, item_id: u64, key: &str, value: serde_json::Value);
    /// Deleting an absent entry is not an error.
    fn delete_meta(&self, item_id: u64, key: &str);
}

/// Image asset storage owned by the host.
pub trait AssetStore: Send + Sync {
    /// Store image bytes under a descriptive title, returning the new
    /// asset's id.
    fn register_image(&self, bytes: Bytes, title: &str) -> Result<String, MaterializeError>;

    /// Resolve an asset id to a locally addressable URL, or `None` if the
    /// host no longer knows the asset.
    fn resolve_image(&self, asset_id: &str) -> Option<String>;
}

/// In-memory [`MetaStore`] for tests and the CLI.
#[derive(Debug, Default)]
pub struct MemoryMetaStore {
    entries: Mutex<HashMap<(u64, String), serde_json::Value>>,
}

impl MemoryMetaStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetaStore for MemoryMetaStore {
    fn get_meta(&self, item_id: u64, key: &str) -> Option<serde_json::Value> {
        self.entries
            .lock()
            .expect("meta store lock poisoned")
            .get(&(item_id, key.to_string()))
            .cloned()
    }

    fn set_meta(&self, item_id: u64, key: &str, value: serde_json::Value) {
        self.entries
            .lock()
            .expect("meta store lock poisoned")
            .insert((item_id, key.to_string()), value);
    }

    fn delete_meta(&self, item_id: u64, key: &str) {
        self.entries
            .lock()
            .expect("meta store lock poisoned")
            .remove(&(item_id, key.to_string()));
    }
}

/// In-memory [`AssetStore`] for tests and the CLI.
///
/// Registered images get a `memory://assets/{uuid}` URL.
#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    images: Mutex<HashMap<String, StoredImage>>,
}

#[derive(Debug)]
struct StoredImage {
    #[allow(dead_code)]
    title: String,
    #[allow(dead_code)]
    bytes: Bytes,
}

impl MemoryAssetStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered assets; used by tests to observe idempotency.
    pub fn len(&self) -> usize {
        self.images.lock().expect("asset store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AssetStore for MemoryAssetStore {
    fn register_image(&self, bytes: Bytes, title: &str) -> Result<String, MaterializeError> {
        if bytes.is_empty() {
            return Err(MaterializeError::Registration("empty image body".into()));
        }
        let asset_id = uuid::Uuid::new_v4().to_string();
        self.images.lock().expect("asset store lock poisoned").insert(
            asset_id.clone(),
            StoredImage {
                title: title.to_string(),
                bytes,
            },
        );
        Ok(asset_id)
    }

    fn resolve_image(&self, asset_id: &str) -> Option<String> {
        self.images
            .lock()
            .expect("asset store lock poisoned")
            .get(asset_id)
            .map(|_| format!("memory://assets/{asset_id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_store_round_trips_and_deletes() {
        let store = MemoryMetaStore::new();
        assert_eq!(store.get_meta(1, "k"), None);

        store.set_meta(1, "k", serde_json::json!({"a": 1}));
        assert_eq!(store.get_meta(1, "k"), Some(serde_json::json!({"a": 1})));

        // Scoped by item id
        assert_eq!(store.get_meta(2, "k"), None);

        store.delete_meta(1, "k");
        assert_eq!(store.get_meta(1, "k"), None);
        // Idempotent delete
        store.delete_meta(1, "k");
    }

    #[test]
    fn asset_store_registers_and_resolves() {
        let store = MemoryAssetStore::new();
        let id = store
            .register_image(Bytes::from_static(b"jpeg bytes"), "YouTube thumbnail abc123")
            .unwrap();
        let url = store.resolve_image(&id).unwrap();
        assert_eq!(url, format!("memory://assets/{id}"));
        assert_eq!(store.resolve_image("nope"), None);
    }

    #[test]
    fn asset_store_rejects_empty_bytes() {
        let store = MemoryAssetStore::new();
        assert!(store.register_image(Bytes::new(), "empty").is_err());
        assert!(store.is_empty());
    }
}
