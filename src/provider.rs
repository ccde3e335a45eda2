//! YouTube Data API v3 metadata fetching and normalization.
//!
//! [`MetadataProvider::fetch_cached`] is the entry point the rest of the
//! pipeline uses: it consults the per-item cache first and only hits the
//! network on a miss, caching successes for 24 hours. Direct calls to
//! [`MetadataProvider::fetch`] bypass the cache and exist for forced
//! refresh.
//!
//! Failures are never cached, so the next page view naturally retries.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::MetadataCache;
use crate::error::ProviderError;
use crate::http_client::HttpFetch;

/// Videos endpoint of the YouTube Data API v3.
pub const API_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/videos";

/// Cache key for normalized metadata, scoped per content item.
pub const METADATA_CACHE_KEY: &str = "video_metadata";

/// API response parts a fetch can request.
///
/// Callers that already have snippet data cached can ask for
/// `ContentDetails` alone and skip the redundant payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    Snippet,
    ContentDetails,
}

impl Part {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Part::Snippet => "snippet",
            Part::ContentDetails => "contentDetails",
        }
    }
}

/// Thumbnail quality tiers the API reports.
///
/// The API also serves a `medium` tier; it is dropped during normalization
/// because selection works on pixel area and the tier never wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Default,
    High,
    Standard,
    Maxres,
}

/// One candidate thumbnail image from the upstream payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailCandidate {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub tier: QualityTier,
}

impl ThumbnailCandidate {
    /// Pixel area, the selection criterion.
    #[must_use]
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Normalized video metadata.
///
/// `title` and `duration` are `None` when the corresponding part was not
/// requested or the provider returned nothing, which is distinct from an
/// empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub video_id: String,
    pub title: Option<String>,
    /// ISO-8601 duration, e.g. `PT5M30S`.
    pub duration: Option<String>,
    /// Flattened from the upstream tier map in a fixed encounter order:
    /// default, high, standard, maxres.
    pub thumbnails: Vec<ThumbnailCandidate>,
}

// ============================================================================
// YouTube Data API v3 Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiResponse {
    error: Option<ApiErrorBody>,
    #[serde(default)]
    items: Vec<ApiVideo>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ApiVideo {
    #[serde(default)]
    id: String,
    snippet: Option<ApiSnippet>,
    #[serde(rename = "contentDetails")]
    content_details: Option<ApiContentDetails>,
}

#[derive(Debug, Deserialize)]
struct ApiSnippet {
    title: Option<String>,
    #[serde(default)]
    thumbnails: ApiThumbnails,
}

/// The upstream thumbnail map, one named field per tier so the flattening
/// order is deterministic.
#[derive(Debug, Default, Deserialize)]
struct ApiThumbnails {
    default: Option<ApiThumb>,
    high: Option<ApiThumb>,
    standard: Option<ApiThumb>,
    maxres: Option<ApiThumb>,
}

#[derive(Debug, Deserialize)]
struct ApiThumb {
    url: String,
    width: u32,
    height: u32,
}

#[derive(Debug, Deserialize)]
struct ApiContentDetails {
    duration: Option<String>,
}

/// Fetches and normalizes video metadata, cache-first.
pub struct MetadataProvider {
    http: Arc<dyn HttpFetch>,
    cache: MetadataCache,
    api_key: String,
}

impl MetadataProvider {
    pub fn new(http: Arc<dyn HttpFetch>, cache: MetadataCache, api_key: impl Into<String>) -> Self {
        Self {
            http,
            cache,
            api_key: api_key.into(),
        }
    }

    fn request_url(&self, video_id: &str, parts: &[Part]) -> String {
        let part = parts
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "{API_ENDPOINT}?id={}&key={}&part={part}",
            urlencoding::encode(video_id),
            urlencoding::encode(&self.api_key),
        )
    }

    /// Call the upstream API directly, bypassing the cache.
    pub async fn fetch(
        &self,
        video_id: &str,
        parts: &[Part],
    ) -> Result<VideoMetadata, ProviderError> {
        let url = self.request_url(video_id, parts);
        debug!(video_id, "fetching video metadata");

        let response = self
            .http
            .get(&url)
            .await
            .map_err(|err| ProviderError::Unavailable(err.to_string()))?;

        if !response.is_success() {
            return Err(ProviderError::Unavailable(format!(
                "unexpected status {}",
                response.status
            )));
        }

        let payload: ApiResponse = serde_json::from_slice(&response.body)
            .map_err(|err| ProviderError::Unavailable(format!("unparseable response: {err}")))?;

        if let Some(error) = payload.error {
            let message = if error.message.is_empty() {
                "double-check your YouTube API key".to_string()
            } else {
                error.message
            };
            return Err(ProviderError::Unauthorized(message));
        }

        let Some(video) = payload.items.into_iter().next() else {
            return Err(ProviderError::NotFound);
        };

        Ok(normalize(video_id, video))
    }

    /// Cache-backed fetch; the entry point every other component uses.
    ///
    /// A hit short-circuits the network call. A miss fetches both parts and
    /// caches only on success, under [`METADATA_CACHE_KEY`] with the default
    /// 24-hour TTL.
    pub async fn fetch_cached(
        &self,
        item_id: u64,
        video_id: &str,
    ) -> Result<VideoMetadata, ProviderError> {
        if let Some(cached) = self.cache.get(item_id, METADATA_CACHE_KEY) {
            match serde_json::from_value::<VideoMetadata>(cached) {
                Ok(metadata) => {
                    debug!(item_id, video_id, "metadata cache hit");
                    return Ok(metadata);
                }
                Err(err) => {
                    debug!(item_id, %err, "discarding stale cached metadata shape");
                    self.cache.delete(item_id, METADATA_CACHE_KEY);
                }
            }
        }

        let metadata = self
            .fetch(video_id, &[Part::Snippet, Part::ContentDetails])
            .await?;

        let value = serde_json::to_value(&metadata)
            .expect("normalized metadata always serializes");
        self.cache.set(item_id, METADATA_CACHE_KEY, value);

        Ok(metadata)
    }
}

/// Flatten an API video into the normalized record.
fn normalize(video_id: &str, video: ApiVideo) -> VideoMetadata {
    let id = if video.id.is_empty() {
        video_id.to_string()
    } else {
        video.id
    };

    let mut title = None;
    let mut thumbnails = Vec::new();

    if let Some(snippet) = video.snippet {
        title = snippet.title;
        let tiers = [
            (QualityTier::Default, snippet.thumbnails.default),
            (QualityTier::High, snippet.thumbnails.high),
            (QualityTier::Standard, snippet.thumbnails.standard),
            (QualityTier::Maxres, snippet.thumbnails.maxres),
        ];
        for (tier, thumb) in tiers {
            if let Some(thumb) = thumb {
                thumbnails.push(ThumbnailCandidate {
                    url: thumb.url,
                    width: thumb.width,
                    height: thumb.height,
                    tier,
                });
            }
        }
    }

    let duration = video.content_details.and_then(|details| details.duration);

    VideoMetadata {
        video_id: id,
        title,
        duration,
        thumbnails,
    }
}
