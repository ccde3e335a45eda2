//! `tubemeta` - YouTube metadata enrichment for content pages
//!
//! Detects a YouTube link in an item's body text, fetches and normalizes the
//! video's metadata through the YouTube Data API, caches it per item with a
//! 24-hour TTL, downloads the best thumbnail exactly once, and hands the
//! host's rendering layer ready-made Open Graph tags and a schema.org
//! `VideoObject` document.
//!
//! # Features
//!
//! - **Link detection**: canonical and short-link forms, scheme and `www.`
//!   optional
//! - **Cache-first metadata**: one upstream call per item per day; failures
//!   are never cached, so the next render retries
//! - **At-most-once thumbnails**: the largest candidate is downloaded and
//!   registered once, then reused forever
//! - **Degrades to nothing**: every failure mode renders as an absent tag,
//!   never a broken page
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tubemeta::{Config, ContentItem, Enricher, MemoryAssetStore, MemoryMetaStore, UpstreamClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let enricher = Enricher::new(
//!         Config::new("your-api-key"),
//!         Arc::new(MemoryMetaStore::new()),
//!         Arc::new(MemoryAssetStore::new()),
//!         Arc::new(UpstreamClient::new()?),
//!     );
//!
//!     let item = ContentItem {
//!         id: 1,
//!         title: "My post".into(),
//!         body: "check this out https://youtu.be/dQw4w9WgXcQ".into(),
//!         permalink: "https://example.com/my-post".into(),
//!         published: chrono::Utc::now(),
//!     };
//!
//!     for (property, content) in enricher.emit_open_graph_tags(&item).await.tags {
//!         println!("<meta property=\"{property}\" content=\"{content}\">");
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod detect;
pub mod enrich;
pub mod error;
pub mod host;
pub mod http_client;
pub mod provider;
pub mod tags;
pub mod thumbnail;

pub use cache::{default_ttl, MetadataCache};
pub use config::Config;
pub use detect::{detect, VideoReference};
pub use enrich::{Enricher, OpenGraphOutput, FEATURED_IMAGE_KEY};
pub use error::{MaterializeError, ProviderError};
pub use host::{AssetStore, ContentItem, MemoryAssetStore, MemoryMetaStore, MetaStore};
pub use http_client::{HttpFetch, HttpResponse, UpstreamClient};
pub use provider::{
    MetadataProvider, Part, QualityTier, ThumbnailCandidate, VideoMetadata, METADATA_CACHE_KEY,
};
pub use tags::{description_or_title, watch_url, OG_TYPE_VIDEO};
pub use thumbnail::{
    fallback_candidate, select_candidate, LocalThumbnailAsset, ThumbnailMaterializer, LINKAGE_KEY,
};

/// Version of tubemeta
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
