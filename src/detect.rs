//! YouTube link detection in free-form body text.
//!
//! A single pattern recognizes both the canonical and short-link domains,
//! with or without a scheme and `www.`, and with or without the `watch?v=`
//! marker. The first match wins. Detection is a pure function: it gates the
//! expensive enrichment work and also supplies the literal id embedded in
//! emitted tags, so it must be deterministic.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches a YouTube link and captures the video id.
///
/// The id charset is deliberately loose (anything up to whitespace or a
/// quote); quotes are excluded so ids inside `href="..."` embeds are not
/// swallowed.
static EMBED_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:https?://)?(?:www\.)?(?:youtube\.com|youtu\.be)/(?:watch\?v=)?([^\s"']+)"#)
        .expect("embed link pattern is valid")
});

/// A video reference extracted from body text.
///
/// Equality is by id, so two differently written links to the same video
/// compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoReference {
    pub video_id: String,
}

/// Scan `text` for the first YouTube link and extract its video id.
///
/// Returns `None` when no link is present; that is a valid outcome, not an
/// error.
#[must_use]
pub fn detect(text: &str) -> Option<VideoReference> {
    EMBED_LINK.captures(text).map(|captures| VideoReference {
        video_id: captures[1].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id_of(text: &str) -> Option<String> {
        detect(text).map(|r| r.video_id)
    }

    #[test]
    fn detects_watch_urls() {
        assert_eq!(
            id_of("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".into())
        );
        assert_eq!(
            id_of("see youtube.com/watch?v=abc123 for details"),
            Some("abc123".into())
        );
    }

    #[test]
    fn detects_short_links() {
        assert_eq!(
            id_of("check this out https://youtu.be/abc123 nice"),
            Some("abc123".into())
        );
        assert_eq!(id_of("youtu.be/xyz"), Some("xyz".into()));
    }

    #[test]
    fn scheme_and_www_are_optional() {
        assert_eq!(
            id_of("http://youtube.com/watch?v=a1"),
            Some("a1".into())
        );
        assert_eq!(
            id_of("www.youtube.com/watch?v=a2"),
            Some("a2".into())
        );
    }

    #[test]
    fn first_match_wins() {
        assert_eq!(
            id_of("https://youtu.be/first then https://youtu.be/second"),
            Some("first".into())
        );
    }

    #[test]
    fn id_stops_at_whitespace_and_quotes() {
        assert_eq!(id_of("youtu.be/abc def"), Some("abc".into()));
        assert_eq!(
            id_of(r#"<a href="https://youtu.be/abc123">video</a>"#),
            Some("abc123".into())
        );
    }

    #[test]
    fn no_link_returns_none() {
        assert_eq!(detect(""), None);
        assert_eq!(detect("just some text"), None);
        assert_eq!(detect("https://vimeo.com/12345"), None);
    }

    #[test]
    fn references_compare_by_id() {
        let a = detect("youtu.be/same").unwrap();
        let b = detect("https://www.youtube.com/watch?v=same").unwrap();
        assert_eq!(a, b);
    }
}
