//! Classification client
//!
//! Sends a URL to the external model service and returns its normalized
//! label and confidence. One attempt per call; no retries.

use crate::config::ClassifierConfig;
use crate::ClassificationError;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// A label and confidence returned by the model service
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Upper-cased prediction label
    pub label: String,
    /// Model confidence in `[0, 1]`
    pub confidence: f64,
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    prediction: String,
    confidence: f64,
}

/// HTTP client for the `POST {base}/predict` endpoint
#[derive(Debug, Clone)]
pub struct Classifier {
    client: Client,
    endpoint: String,
}

impl Classifier {
    /// Builds a classifier from configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Base URL and timeout of the model service
    pub fn new(config: &ClassifierConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self::with_client(client, &config.base_url))
    }

    /// Builds a classifier around an existing HTTP client
    pub fn with_client(client: Client, base_url: &str) -> Self {
        let endpoint = format!("{}/predict", base_url.trim_end_matches('/'));
        Self { client, endpoint }
    }

    /// The full prediction endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Classifies a URL
    ///
    /// # Errors
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Endpoint is not a valid URL | `Request` |
    /// | Timeout | `Timeout` |
    /// | Connection or transport failure | `Transport` |
    /// | Non-2xx status | `Status` (with the response body) |
    /// | Body is not `{prediction, confidence}` | `Decode` |
    /// | Confidence outside `[0, 1]` | `ConfidenceOutOfRange` |
    pub async fn classify(&self, url: &str) -> Result<Classification, ClassificationError> {
        let endpoint = Url::parse(&self.endpoint)
            .map_err(|e| ClassificationError::Request(format!("{}: {}", self.endpoint, e)))?;

        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&PredictRequest { url })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClassificationError::Timeout {
                        url: self.endpoint.clone(),
                    }
                } else if e.is_builder() {
                    ClassificationError::Request(e.to_string())
                } else {
                    ClassificationError::Transport(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassificationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(ClassificationError::Transport)?;
        let parsed: PredictResponse = serde_json::from_slice(&body)
            .map_err(|e| ClassificationError::Decode(e.to_string()))?;

        if !(0.0..=1.0).contains(&parsed.confidence) {
            return Err(ClassificationError::ConfidenceOutOfRange(parsed.confidence));
        }

        Ok(Classification {
            label: parsed.prediction.to_uppercase(),
            confidence: parsed.confidence,
        })
    }
}
