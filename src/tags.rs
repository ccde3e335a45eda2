//! Open Graph and JSON-LD document builders.
//!
//! Pure functions from already-enriched data to the exact values the host
//! should emit. All rendering/escaping concerns stay with the host; this
//! module only decides the property names and contents.

use serde_json::{json, Value};

use crate::host::ContentItem;
use crate::provider::VideoMetadata;
use crate::thumbnail::LocalThumbnailAsset;

/// The `og:type` value for pages that embed a video.
pub const OG_TYPE_VIDEO: &str = "video";

/// Canonical watch URL for a video id; used identically for `og:video:url`
/// and `og:video:secure_url`.
#[must_use]
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

/// The Open Graph `(property, content)` pairs for an enriched item.
///
/// `image_url` is the locally addressable copy of the thumbnail.
#[must_use]
pub fn open_graph_pairs(
    asset: &LocalThumbnailAsset,
    image_url: &str,
    video_id: &str,
) -> Vec<(String, String)> {
    let watch = watch_url(video_id);
    vec![
        ("og:image".into(), image_url.to_string()),
        ("og:image:width".into(), asset.width.to_string()),
        ("og:image:height".into(), asset.height.to_string()),
        ("og:video:url".into(), watch.clone()),
        ("og:video:secure_url".into(), watch),
        ("og:video:type".into(), "text/html".into()),
    ]
}

/// The schema.org `VideoObject` document for an enriched item.
///
/// `duration` is omitted entirely when unknown rather than emitted as an
/// empty string; the thumbnail block is present only when an asset was
/// materialized.
#[must_use]
pub fn json_ld_document(
    item: &ContentItem,
    metadata: &VideoMetadata,
    thumbnail: Option<(&LocalThumbnailAsset, &str)>,
) -> Value {
    let mut document = json!({
        "@context": "http://schema.org",
        "@type": "VideoObject",
        "@id": item.permalink,
        "name": item.title,
        "description": item.title,
        "uploadDate": item.published.to_rfc3339(),
    });

    let fields = document.as_object_mut().expect("document is an object");

    if let Some(duration) = &metadata.duration {
        fields.insert("duration".into(), json!(duration));
    }

    if let Some((asset, image_url)) = thumbnail {
        fields.insert(
            "thumbnail".into(),
            json!({
                "@type": "ImageObject",
                "contentUrl": image_url,
                "width": asset.width,
                "height": asset.height,
            }),
        );
        fields.insert("thumbnailUrl".into(), json!(image_url));
    }

    document
}

/// Fall back to the item title when the host's description is empty.
#[must_use]
pub fn description_or_title<'a>(existing: &'a str, item: &'a ContentItem) -> &'a str {
    if existing.is_empty() {
        &item.title
    } else {
        existing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{QualityTier, ThumbnailCandidate};
    use chrono::{TimeZone, Utc};

    fn item() -> ContentItem {
        ContentItem {
            id: 42,
            title: "Post title".into(),
            body: "https://youtu.be/abc123".into(),
            permalink: "https://example.com/post".into(),
            published: Utc.with_ymd_and_hms(2023, 4, 5, 6, 7, 8).unwrap(),
        }
    }

    fn asset() -> LocalThumbnailAsset {
        LocalThumbnailAsset {
            asset_id: "a1".into(),
            source_url: "https://i.ytimg.com/vi/abc123/hqdefault.jpg".into(),
            width: 480,
            height: 360,
        }
    }

    #[test]
    fn open_graph_pairs_share_one_watch_url() {
        let pairs = open_graph_pairs(&asset(), "https://example.com/thumb.jpg", "abc123");
        let get = |property: &str| {
            pairs
                .iter()
                .find(|(p, _)| p == property)
                .map(|(_, c)| c.as_str())
                .unwrap()
        };

        assert_eq!(get("og:image"), "https://example.com/thumb.jpg");
        assert_eq!(get("og:image:width"), "480");
        assert_eq!(get("og:image:height"), "360");
        assert_eq!(get("og:video:url"), "https://www.youtube.com/watch?v=abc123");
        assert_eq!(get("og:video:url"), get("og:video:secure_url"));
        assert_eq!(get("og:video:type"), "text/html");
    }

    #[test]
    fn json_ld_includes_duration_and_thumbnail_when_known() {
        let metadata = VideoMetadata {
            video_id: "abc123".into(),
            title: Some("A video".into()),
            duration: Some("PT5M30S".into()),
            thumbnails: vec![ThumbnailCandidate {
                url: "https://i.ytimg.com/vi/abc123/hqdefault.jpg".into(),
                width: 480,
                height: 360,
                tier: QualityTier::High,
            }],
        };

        let asset = asset();
        let doc = json_ld_document(&item(), &metadata, Some((&asset, "memory://assets/a1")));

        assert_eq!(doc["@type"], "VideoObject");
        assert_eq!(doc["@id"], "https://example.com/post");
        assert_eq!(doc["name"], "Post title");
        assert_eq!(doc["description"], "Post title");
        assert_eq!(doc["uploadDate"], "2023-04-05T06:07:08+00:00");
        assert_eq!(doc["duration"], "PT5M30S");
        assert_eq!(doc["thumbnail"]["@type"], "ImageObject");
        assert_eq!(doc["thumbnail"]["contentUrl"], "memory://assets/a1");
        assert_eq!(doc["thumbnail"]["width"], 480);
        assert_eq!(doc["thumbnailUrl"], "memory://assets/a1");
    }

    #[test]
    fn json_ld_omits_unknown_duration_and_missing_thumbnail() {
        let metadata = VideoMetadata {
            video_id: "abc123".into(),
            title: None,
            duration: None,
            thumbnails: Vec::new(),
        };

        let doc = json_ld_document(&item(), &metadata, None);
        assert!(doc.get("duration").is_none());
        assert!(doc.get("thumbnail").is_none());
        assert!(doc.get("thumbnailUrl").is_none());
    }

    #[test]
    fn empty_description_falls_back_to_title() {
        let item = item();
        assert_eq!(description_or_title("", &item), "Post title");
        assert_eq!(description_or_title("existing", &item), "existing");
    }
}
