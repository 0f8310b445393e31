use crate::types::{FetchConfig, RadarError, Result};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Shared HTTP client for all sources. One request at a time, each bounded
/// by the configured timeout; no retries.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let redirect_policy = if config.follow_redirects {
            reqwest::redirect::Policy::limited(config.max_redirects)
        } else {
            reqwest::redirect::Policy::none()
        };

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(redirect_policy)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// GET a URL, failing on non-2xx statuses.
    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        debug!("Fetching: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(RadarError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    /// GET a URL and return the raw body. Feed parsers sniff the encoding themselves.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let start_time = Instant::now();
        let body = self.get(url).await?.bytes().await?;
        info!(
            "Fetched {} ({} bytes in {}ms)",
            url,
            body.len(),
            start_time.elapsed().as_millis()
        );
        Ok(body.to_vec())
    }

    /// GET a URL and decode the body using the charset the server declares.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let start_time = Instant::now();
        let text = self.get(url).await?.text().await?;
        info!(
            "Fetched {} ({} chars in {}ms)",
            url,
            text.chars().count(),
            start_time.elapsed().as_millis()
        );
        Ok(text)
    }

    /// Lightweight existence check (HEAD). Never fails, only reports.
    pub async fn probe(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(response) => {
                let ok = response.status().is_success();
                debug!("Probe {} -> HTTP {}", url, response.status());
                ok
            }
            Err(e) => {
                debug!("Probe {} failed: {}", url, e);
                false
            }
        }
    }
}
