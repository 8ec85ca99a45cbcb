//! HTTP access to the news site.
//!
//! The orchestrator only needs "give me the body of this URL", so that is
//! all [`PageFetcher`] asks for. [`HttpFetcher`] is the real implementation;
//! tests plug in canned pages instead.

use crate::config::ScraperConfig;
use crate::error::{NewsError, Result};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Something that can fetch a page body by URL.
pub trait PageFetcher {
    /// Fetch `url` and return the response body. Non-success statuses are
    /// errors.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// [`PageFetcher`] backed by a `reqwest` client with a browser-like
/// User-Agent and a per-request timeout.
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client, timeout })
    }

    pub fn from_config(config: &ScraperConfig) -> Result<Self> {
        Self::new(&config.user_agent, config.timeout())
    }
}

impl fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String> {
        let t0 = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), elapsed_ms = t0.elapsed().as_millis() as u64, "Non-success status");
            return Err(NewsError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        debug!(bytes = body.len(), elapsed_ms = t0.elapsed().as_millis() as u64, "Fetched page");
        Ok(body)
    }
}
