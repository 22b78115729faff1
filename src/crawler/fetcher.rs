//! HTTP fetcher implementation
//!
//! This module handles all network requests for the crawler, including:
//! - Building HTTP clients with a fixed user agent and timeout
//! - GET requests returning the page body
//! - Error classification (transport failure vs. non-success status)

use crate::config::Config;
use crate::{FetchError, FetchResult};
use reqwest::Client;
use std::time::Duration;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Page body content
    pub body: String,
}

/// Network access used by the page cache
///
/// Implementations fail with [`FetchError`] unless the request completed
/// with a success status.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn get(&self, url: &str) -> FetchResult<FetchedPage>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - Value of the `User-Agent` header
/// * `timeout` - Ceiling for a whole request
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Transport`] over a reqwest client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the transport from the `[user-agent]` and `[crawler]` settings
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(
            &config.user_agent.value,
            config.crawler.request_timeout(),
        )?;
        Ok(Self::new(client))
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> FetchResult<FetchedPage> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let final_url = response.url().to_string();

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        tracing::debug!(
            "Response {} for {}: {} bytes",
            status.as_u16(),
            final_url,
            body.len()
        );

        Ok(FetchedPage {
            final_url,
            status_code: status.as_u16(),
            body,
        })
    }
}
