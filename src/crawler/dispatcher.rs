//! Concurrent dispatch of pipeline runs
//!
//! Each submitted URL becomes one independent tokio task. Tasks are never
//! cancelled once started, and nothing bounds how many run at once.

use crate::crawler::pipeline::{Outcome, Pipeline};
use crate::state::UrlStatus;
use crate::storage::Storage;
use crate::url::is_valid_http_url;
use crate::SubmitError;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Launches pipeline runs as background tasks
pub struct Dispatcher<S> {
    pipeline: Arc<Pipeline<S>>,
}

impl<S> Clone for Dispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}

impl<S: Storage + Send + 'static> Dispatcher<S> {
    pub fn new(pipeline: Arc<Pipeline<S>>) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &Arc<Pipeline<S>> {
        &self.pipeline
    }

    /// Starts processing `url` in the background and returns immediately
    ///
    /// The URL must already have a record in the store; otherwise the run
    /// aborts at its first status write. Must be called from within a tokio
    /// runtime.
    pub fn spawn(&self, url: impl Into<String>) -> JoinHandle<Outcome> {
        let pipeline = Arc::clone(&self.pipeline);
        let url = url.into();

        tokio::spawn(async move { pipeline.process(&url).await })
    }

    /// Registers `url` and starts processing it
    ///
    /// The URL is inserted as `pending` if unknown. A URL that is already
    /// known is only run again while it is still `pending`.
    ///
    /// # Errors
    ///
    /// - `InvalidUrl` if `url` is not an absolute http(s) URL
    /// - `AlreadyProcessed` if the URL is known and past `pending`
    /// - `Storage` if the store cannot be read or written
    pub fn submit(&self, url: &str) -> Result<JoinHandle<Outcome>, SubmitError> {
        let url = url.trim();
        if !is_valid_http_url(url) {
            return Err(SubmitError::InvalidUrl(url.to_string()));
        }

        let status = {
            let mut storage = self.pipeline.lock_storage();
            if storage.insert_url(url)? {
                tracing::debug!("Registered new URL: {}", url);
                UrlStatus::Pending
            } else {
                storage
                    .get_url(url)?
                    .map(|record| record.status)
                    .unwrap_or(UrlStatus::Pending)
            }
        };

        if status != UrlStatus::Pending {
            return Err(SubmitError::AlreadyProcessed {
                url: url.to_string(),
                status,
            });
        }

        tracing::info!("URL accepted for processing: {}", url);
        Ok(self.spawn(url))
    }
}
