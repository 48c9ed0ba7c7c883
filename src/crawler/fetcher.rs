//! HTTP fetcher implementation
//!
//! This module handles page requests for the pipeline, including:
//! - Building the HTTP client with the crawler's user agent
//! - GET requests with status and Content-Type validation
//! - Error classification into [`FetchError`]

use crate::config::FetcherConfig;
use crate::FetchError;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// A successfully fetched HTML page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,
    /// Content-Type header value
    pub content_type: String,
    /// Raw response body
    pub body: Vec<u8>,
}

/// Builds the HTTP client used for page fetches
///
/// Redirects follow reqwest's default policy.
///
/// # Example
///
/// ```no_run
/// use spidey::config::FetcherConfig;
/// use spidey::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10.min(config.timeout_secs)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Returns true if a Content-Type header value denotes an HTML document
pub fn is_html_content_type(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("text/html")
}

/// Page fetch client
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Builds a fetcher from configuration
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    /// Builds a fetcher around an existing HTTP client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetches a URL and returns its raw HTML body
    ///
    /// # Response Handling
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | URL does not parse | `Request` |
    /// | Timeout | `Timeout` |
    /// | Connection refused, DNS, TLS | `Network` |
    /// | Non-2xx status | `Status` |
    /// | Content-Type without `text/html` | `NotHtml` |
    /// | Body read failure | `Body` |
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::Request(format!("{}: {}", url, e)))?;

        let response = self.client.get(parsed).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else if e.is_builder() {
                FetchError::Request(e.to_string())
            } else {
                FetchError::Network(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !is_html_content_type(&content_type) {
            return Err(FetchError::NotHtml { content_type });
        }

        let final_url = response.url().to_string();
        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Body(e)
            }
        })?;

        Ok(FetchedPage {
            final_url,
            content_type,
            body: body.to_vec(),
        })
    }
}
