//! Thumbnail selection and at-most-once materialization.
//!
//! Given normalized metadata, pick the largest candidate image, download it,
//! register it with the host's asset store, and remember the result under a
//! permanent per-item linkage. Once an asset exists for an item it is never
//! re-downloaded, even if upstream metadata changes: image assets are
//! expensive to reproduce and safe to keep, so staleness is the accepted
//! trade for the at-most-one-download guarantee.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::host::{AssetStore, MetaStore};
use crate::http_client::HttpFetch;
use crate::provider::{QualityTier, ThumbnailCandidate, VideoMetadata};

/// Metadata key for the permanent asset linkage. Not a cache entry; never
/// expires.
pub const LINKAGE_KEY: &str = "thumbnail_asset";

/// Every video serves this frame even when the metadata payload lists no
/// thumbnails at all.
pub const FALLBACK_URL_TEMPLATE: &str = "https://i.ytimg.com/vi/{id}/0.jpg";
pub const FALLBACK_WIDTH: u32 = 480;
pub const FALLBACK_HEIGHT: u32 = 360;

/// A locally stored copy of a selected thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalThumbnailAsset {
    pub asset_id: String,
    pub source_url: String,
    pub width: u32,
    pub height: u32,
}

/// Pick the candidate with the largest pixel area; ties go to the earlier
/// candidate. `None` only for an empty slice.
#[must_use]
pub fn select_candidate(thumbnails: &[ThumbnailCandidate]) -> Option<&ThumbnailCandidate> {
    let mut best: Option<&ThumbnailCandidate> = None;
    for candidate in thumbnails {
        match best {
            Some(current) if candidate.area() <= current.area() => {}
            _ => best = Some(candidate),
        }
    }
    best
}

/// The guaranteed-to-exist default frame, used when metadata is thin.
#[must_use]
pub fn fallback_candidate(video_id: &str) -> ThumbnailCandidate {
    ThumbnailCandidate {
        url: FALLBACK_URL_TEMPLATE.replace("{id}", video_id),
        width: FALLBACK_WIDTH,
        height: FALLBACK_HEIGHT,
        tier: QualityTier::Default,
    }
}

/// Downloads and registers thumbnails, once per content item.
pub struct ThumbnailMaterializer {
    http: Arc<dyn HttpFetch>,
    meta: Arc<dyn MetaStore>,
    assets: Arc<dyn AssetStore>,
}

impl ThumbnailMaterializer {
    pub fn new(
        http: Arc<dyn HttpFetch>,
        meta: Arc<dyn MetaStore>,
        assets: Arc<dyn AssetStore>,
    ) -> Self {
        Self { http, meta, assets }
    }

    /// The already-materialized asset for an item, if any.
    pub fn existing(&self, item_id: u64) -> Option<LocalThumbnailAsset> {
        let raw = self.meta.get_meta(item_id, LINKAGE_KEY)?;
        serde_json::from_value(raw).ok()
    }

    /// Return the item's thumbnail asset, downloading and registering it if
    /// this is the first time.
    ///
    /// On any failure (transport, non-2xx, empty body, registration) nothing
    /// is recorded and `None` is returned, so the next render retries.
    pub async fn materialize(
        &self,
        item_id: u64,
        metadata: &VideoMetadata,
    ) -> Option<LocalThumbnailAsset> {
        if let Some(existing) = self.existing(item_id) {
            debug!(item_id, asset_id = %existing.asset_id, "thumbnail already materialized");
            return Some(existing);
        }

        let fallback;
        let selected = match select_candidate(&metadata.thumbnails) {
            Some(candidate) => candidate,
            None => {
                debug!(item_id, "no thumbnail candidates, using default frame");
                fallback = fallback_candidate(&metadata.video_id);
                &fallback
            }
        };

        let response = match self.http.get(&selected.url).await {
            Ok(response) => response,
            Err(err) => {
                warn!(item_id, url = %selected.url, %err, "thumbnail download failed");
                return None;
            }
        };
        if !response.is_success() || response.body.is_empty() {
            warn!(
                item_id,
                url = %selected.url,
                status = response.status,
                bytes = response.body.len(),
                "unusable thumbnail response"
            );
            return None;
        }

        let title = format!("YouTube thumbnail {}", metadata.video_id);
        let asset_id = match self.assets.register_image(response.body, &title) {
            Ok(asset_id) => asset_id,
            Err(err) => {
                warn!(item_id, %err, "could not register thumbnail asset; check storage permissions");
                return None;
            }
        };

        // Two concurrent first renders can both reach this point; keep the
        // first writer's linkage so the id stays stable.
        if let Some(existing) = self.existing(item_id) {
            debug!(item_id, "concurrent materialization won the race");
            return Some(existing);
        }

        let asset = LocalThumbnailAsset {
            asset_id,
            source_url: selected.url.clone(),
            width: selected.width,
            height: selected.height,
        };
        let raw = serde_json::to_value(&asset).expect("asset linkage always serializes");
        self.meta.set_meta(item_id, LINKAGE_KEY, raw);

        debug!(item_id, asset_id = %asset.asset_id, "thumbnail materialized");
        Some(asset)
    }
}
