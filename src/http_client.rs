//! HTTP collaborator.
//!
//! Both upstream calls this crate makes (the metadata API and the thumbnail
//! image) are plain GETs, so the seam is a single-method trait. Tests swap
//! in a counting mock; production uses [`UpstreamClient`], a reqwest client
//! with bounded timeouts so a slow provider can never hang a page render.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

/// A fetched response: status code plus raw body bytes.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Minimal HTTP GET seam.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse>;
}

/// Production HTTP client for the metadata API and thumbnail downloads.
pub struct UpstreamClient {
    client: reqwest::Client,
}

impl UpstreamClient {
    /// Create a client with connection pooling and bounded timeouts.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .gzip(true)
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetch for UpstreamClient {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        debug!(url, "GET");
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        debug!(status, bytes = body.len(), "response received");
        Ok(HttpResponse { status, body })
    }
}
