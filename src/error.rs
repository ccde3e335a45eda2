//! Error taxonomy for the enrichment pipeline.
//!
//! Every failure here is recoverable-by-omission: the render surface degrades
//! to emitting nothing for the missing piece instead of failing the page.
//! "No video link in the body" is not an error at all; detection returns
//! `None` for that case.

use thiserror::Error;

/// Failures talking to the YouTube Data API.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned an explicit error payload, almost always a missing
    /// or invalid API key.
    #[error("YouTube API rejected the request: {0}")]
    Unauthorized(String),

    /// Transport failure, timeout, non-2xx status, or an unparseable body.
    #[error("YouTube API unavailable: {0}")]
    Unavailable(String),

    /// The API answered but the `items` array was empty.
    #[error("video not found")]
    NotFound,
}

/// Failures while downloading or registering a thumbnail image.
#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("thumbnail download failed for {url}: {reason}")]
    Download { url: String, reason: String },

    #[error("asset registration failed: {0}")]
    Registration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_render_their_detail() {
        let err = ProviderError::Unauthorized("API key not valid".into());
        assert!(err.to_string().contains("API key not valid"));

        let err = ProviderError::NotFound;
        assert_eq!(err.to_string(), "video not found");
    }
}
