//! Enrichment orchestrator.
//!
//! [`Enricher`] is the sole entry point the host's rendering layer consumes.
//! It answers three cache-backed, idempotent questions about a content item
//! (does it embed a video? what is its metadata? what is its local
//! thumbnail?) and exposes the render surface built on them. Nothing here
//! mutates the content item itself; all durable state lives in the host's
//! metadata and asset stores, keyed by item id.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::MetadataCache;
use crate::config::Config;
use crate::detect::detect;
use crate::error::ProviderError;
use crate::host::{AssetStore, ContentItem, MetaStore};
use crate::http_client::HttpFetch;
use crate::provider::{MetadataProvider, VideoMetadata};
use crate::tags::{self, OG_TYPE_VIDEO};
use crate::thumbnail::{LocalThumbnailAsset, ThumbnailMaterializer};

/// Metadata key under which the host records its own thumbnail choice.
/// [`Enricher::override_thumbnail_metadata`] defers to it.
pub const FEATURED_IMAGE_KEY: &str = "featured_image";

/// Result of the Open Graph surface.
///
/// `debug_comment` carries provider error detail when debug diagnostics are
/// enabled; the host is expected to wrap it in an HTML comment. Production
/// config leaves it `None`.
#[derive(Debug, Default)]
pub struct OpenGraphOutput {
    pub tags: Vec<(String, String)>,
    pub debug_comment: Option<String>,
}

/// Composes detection, the metadata provider, and the thumbnail
/// materializer behind the host-facing surface.
pub struct Enricher {
    assets: Arc<dyn AssetStore>,
    meta: Arc<dyn MetaStore>,
    provider: MetadataProvider,
    materializer: ThumbnailMaterializer,
    config: Config,
}

impl Enricher {
    pub fn new(
        config: Config,
        meta: Arc<dyn MetaStore>,
        assets: Arc<dyn AssetStore>,
        http: Arc<dyn HttpFetch>,
    ) -> Self {
        let cache = MetadataCache::new(meta.clone());
        let provider = MetadataProvider::new(http.clone(), cache, config.api_key.clone());
        let materializer = ThumbnailMaterializer::new(http, meta.clone(), assets.clone());
        Self {
            assets,
            meta,
            provider,
            materializer,
            config,
        }
    }

    /// Does the item's body embed a video?
    #[must_use]
    pub fn has_video(&self, item: &ContentItem) -> bool {
        detect(&item.body).is_some()
    }

    /// The `og:type` the host should use for this item, when a video is
    /// present.
    #[must_use]
    pub fn open_graph_type(&self, item: &ContentItem) -> Option<&'static str> {
        self.has_video(item).then_some(OG_TYPE_VIDEO)
    }

    async fn try_metadata(
        &self,
        item: &ContentItem,
    ) -> Result<Option<VideoMetadata>, ProviderError> {
        let Some(reference) = detect(&item.body) else {
            return Ok(None);
        };
        self.provider
            .fetch_cached(item.id, &reference.video_id)
            .await
            .map(Some)
    }

    fn log_provider_error(item_id: u64, err: &ProviderError) {
        match err {
            // Not an escalation: the link just doesn't resolve to a video.
            ProviderError::NotFound => debug!(item_id, "video not found upstream"),
            other => warn!(item_id, %other, "metadata fetch failed"),
        }
    }

    /// The item's normalized video metadata, or `None` when there is no
    /// video or the provider failed. Failures degrade silently; they are
    /// never cached, so the next render retries.
    pub async fn metadata(&self, item: &ContentItem) -> Option<VideoMetadata> {
        match self.try_metadata(item).await {
            Ok(metadata) => metadata,
            Err(err) => {
                Self::log_provider_error(item.id, &err);
                None
            }
        }
    }

    /// The item's local thumbnail asset, materializing it on first use.
    pub async fn thumbnail(&self, item: &ContentItem) -> Option<LocalThumbnailAsset> {
        let metadata = self.metadata(item).await?;
        self.materializer.materialize(item.id, &metadata).await
    }

    /// Locally addressable URL for a materialized asset, falling back to
    /// the original source URL if the host no longer resolves the id.
    fn image_url(&self, asset: &LocalThumbnailAsset) -> String {
        self.assets
            .resolve_image(&asset.asset_id)
            .unwrap_or_else(|| asset.source_url.clone())
    }

    /// The Open Graph tags for an item, or an empty set when enrichment
    /// yields nothing.
    pub async fn emit_open_graph_tags(&self, item: &ContentItem) -> OpenGraphOutput {
        let metadata = match self.try_metadata(item).await {
            Ok(Some(metadata)) => metadata,
            Ok(None) => return OpenGraphOutput::default(),
            Err(err) => {
                Self::log_provider_error(item.id, &err);
                return OpenGraphOutput {
                    tags: Vec::new(),
                    debug_comment: self.config.debug.then(|| err.to_string()),
                };
            }
        };

        let Some(asset) = self.materializer.materialize(item.id, &metadata).await else {
            return OpenGraphOutput {
                tags: Vec::new(),
                debug_comment: self
                    .config
                    .debug
                    .then(|| "could not store the remote thumbnail; check asset storage permissions".to_string()),
            };
        };

        let image_url = self.image_url(&asset);
        OpenGraphOutput {
            tags: tags::open_graph_pairs(&asset, &image_url, &metadata.video_id),
            debug_comment: None,
        }
    }

    /// The schema.org `VideoObject` document for an item, or `None` when
    /// there is no video metadata. The thumbnail block is included when an
    /// asset exists or can be materialized; its absence does not suppress
    /// the document.
    pub async fn emit_json_ld(&self, item: &ContentItem) -> Option<Value> {
        let metadata = self.metadata(item).await?;
        let asset = self.materializer.materialize(item.id, &metadata).await;
        let thumbnail = asset
            .as_ref()
            .map(|asset| (asset, self.image_url(asset)));

        Some(tags::json_ld_document(
            item,
            &metadata,
            thumbnail.as_ref().map(|(asset, url)| (*asset, url.as_str())),
        ))
    }

    /// Offer a thumbnail asset id for items where the host has no thumbnail
    /// of its own. Returns `None` (with no side effects) when the host
    /// already assigned one, when there is no video, or when materialization
    /// fails.
    pub async fn override_thumbnail_metadata(&self, item: &ContentItem) -> Option<String> {
        if self.meta.get_meta(item.id, FEATURED_IMAGE_KEY).is_some() {
            return None;
        }
        self.thumbnail(item).await.map(|asset| asset.asset_id)
    }
}
