//! Pipeline controller - the per-URL state machine
//!
//! One call to [`Pipeline::process`] drives a single URL through
//! classification, an optional fetch and extraction, and the final atomic
//! write. Every failure is captured into the URL's record; nothing is
//! returned to the caller as an error.

use crate::config::Config;
use crate::crawler::classifier::Classifier;
use crate::crawler::extractor::extract;
use crate::crawler::fetcher::Fetcher;
use crate::state::UrlStatus;
use crate::storage::Storage;
use crate::url::is_valid_http_url;
use crate::{PipelineError, SpideyError};
use futures::FutureExt;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Maximum length of a stored error message, in characters
pub const MAX_ERROR_MESSAGE_CHARS: usize = 1024;

/// The pipeline step at which processing failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Classify,
    PersistClassification,
    Fetch,
    Extract,
    Commit,
    /// A fault (panic) anywhere in the pipeline body
    Internal,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Classify => "classify",
            Self::PersistClassification => "persist_classification",
            Self::Fetch => "fetch",
            Self::Extract => "extract",
            Self::Commit => "commit",
            Self::Internal => "internal",
        };
        f.write_str(name)
    }
}

/// What happened to a URL during one [`Pipeline::process`] call
///
/// This is a report, not a result: the store has already been updated
/// accordingly by the time it is returned.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Page stored as `crawled`
    Crawled {
        /// Distinct links found on the page
        links_found: usize,
        /// Links that were valid and not yet known, now `pending`
        links_queued: usize,
    },

    /// Classified as something other than the target label
    Skipped { label: String },

    /// Record marked `failed` with `message`
    Failed { stage: Stage, message: String },

    /// A status write failed, so the record was left as it was
    Aborted { reason: String },
}

/// Truncates an error message to [`MAX_ERROR_MESSAGE_CHARS`] characters
///
/// Counts characters rather than bytes so multi-byte text is never split.
pub fn truncate_error_message(message: &str) -> String {
    match message.char_indices().nth(MAX_ERROR_MESSAGE_CHARS) {
        Some((cut, _)) => message[..cut].to_string(),
        None => message.to_string(),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// The URL processing pipeline
///
/// Collaborators are handed in at construction; nothing is read from
/// process-wide state. The store is shared between concurrently running
/// pipelines and is the only point where they contend.
pub struct Pipeline<S> {
    storage: Arc<Mutex<S>>,
    classifier: Classifier,
    fetcher: Fetcher,
    target_label: String,
}

impl<S: Storage + Send + 'static> Pipeline<S> {
    /// Creates a pipeline from its collaborators
    ///
    /// `target_label` is upper-cased, matching how classifier labels are
    /// normalized.
    pub fn new(
        storage: Arc<Mutex<S>>,
        classifier: Classifier,
        fetcher: Fetcher,
        target_label: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            classifier,
            fetcher,
            target_label: target_label.into().to_uppercase(),
        }
    }

    /// Creates a pipeline with clients built from configuration
    pub fn from_config(config: &Config, storage: Arc<Mutex<S>>) -> Result<Self, SpideyError> {
        let classifier = Classifier::new(&config.classifier)?;
        let fetcher = Fetcher::new(&config.fetcher)?;

        Ok(Self::new(
            storage,
            classifier,
            fetcher,
            config.classifier.target_label.clone(),
        ))
    }

    /// The shared store
    pub fn storage(&self) -> &Arc<Mutex<S>> {
        &self.storage
    }

    /// The label that triggers a crawl
    pub fn target_label(&self) -> &str {
        &self.target_label
    }

    /// Locks the store, recovering it if a previous holder panicked
    pub fn lock_storage(&self) -> MutexGuard<'_, S> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Processes one URL to completion
    ///
    /// Never fails and never panics: a fault anywhere in the body is caught
    /// here and the record is marked `failed` with an internal-fault message.
    pub async fn process(&self, url: &str) -> Outcome {
        tracing::info!("Starting to process URL: {}", url);

        let outcome = match AssertUnwindSafe(self.run(url)).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(panic) => {
                let fault = PipelineError::UnexpectedFault(panic_message(panic.as_ref()));
                tracing::error!("Panic recovered while processing {}: {}", url, fault);
                self.fail(url, Stage::Internal, &fault.to_string())
            }
        };

        match &outcome {
            Outcome::Crawled {
                links_found,
                links_queued,
            } => tracing::info!(
                "Successfully crawled and stored {} ({} links found, {} queued)",
                url,
                links_found,
                links_queued
            ),
            Outcome::Skipped { label } => {
                tracing::info!("Skipped {} (classified as {})", url, label)
            }
            Outcome::Failed { stage, message } => {
                tracing::warn!("Failed {} at {}: {}", url, stage, message)
            }
            Outcome::Aborted { reason } => {
                tracing::warn!("Aborted {} without a status change: {}", url, reason)
            }
        }

        outcome
    }

    async fn run(&self, url: &str) -> Outcome {
        // Step 1: claim the record. A store failure here is not this URL's fault,
        // so the record is left as it was.
        let claimed = self.lock_storage().update_status(url, UrlStatus::Classifying);
        if let Err(e) = claimed {
            tracing::error!("Failed to update status to classifying for {}: {}", url, e);
            return Outcome::Aborted {
                reason: e.to_string(),
            };
        }
        tracing::info!("Status updated to 'classifying' for {}", url);

        // Step 2: classify
        let classification = match self.classifier.classify(url).await {
            Ok(classification) => classification,
            Err(e) => {
                tracing::error!("Failed to classify {}: {}", url, e);
                let error = PipelineError::from(e);
                return self.fail(url, Stage::Classify, &error.to_string());
            }
        };
        tracing::info!(
            "URL {} classified as {} ({:.3})",
            url,
            classification.label,
            classification.confidence
        );

        // Step 3: persist the classification
        let persisted = self.lock_storage().update_classification(
            url,
            &classification.label,
            classification.confidence,
        );
        if let Err(e) = persisted {
            tracing::error!("Failed to update classification for {}: {}", url, e);
            return self.fail(
                url,
                Stage::PersistClassification,
                "failed to update classification",
            );
        }

        // Step 4: anything but the target label is a normal skip
        if classification.label != self.target_label {
            let skipped = self.lock_storage().mark_skipped(url);
            if let Err(e) = skipped {
                tracing::error!("Failed to update status to skipped for {}: {}", url, e);
                return Outcome::Aborted {
                    reason: e.to_string(),
                };
            }
            return Outcome::Skipped {
                label: classification.label,
            };
        }

        // Step 5: same rule as step 1
        let crawling = self.lock_storage().update_status(url, UrlStatus::Crawling);
        if let Err(e) = crawling {
            tracing::error!("Failed to update status to crawling for {}: {}", url, e);
            return Outcome::Aborted {
                reason: e.to_string(),
            };
        }
        tracing::info!("Status updated to 'crawling' for {}", url);

        // Step 6: fetch and extract
        let page = match self.fetcher.fetch(url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!("Failed to fetch {}: {}", url, e);
                let error = PipelineError::from(e);
                return self.fail(url, Stage::Fetch, &error.to_string());
            }
        };

        let extracted = match extract(&page.body, url) {
            Ok(extracted) => extracted,
            Err(e) => {
                tracing::error!("Failed to parse {}: {}", url, e);
                let error = PipelineError::from(e);
                return self.fail(url, Stage::Extract, &error.to_string());
            }
        };
        tracing::info!(
            "Fetched and parsed {} ({} bytes, {} links)",
            url,
            page.body.len(),
            extracted.links.len()
        );

        // Step 7: one atomic write for the content and the new frontier
        let links: Vec<String> = extracted
            .links
            .iter()
            .filter(|link| is_valid_http_url(link))
            .cloned()
            .collect();
        tracing::debug!(
            "{} of {} links from {} passed validation",
            links.len(),
            extracted.links.len(),
            url
        );

        let committed = self
            .lock_storage()
            .complete_crawl(url, &extracted.text, &links);
        match committed {
            Ok(links_queued) => Outcome::Crawled {
                links_found: extracted.links.len(),
                links_queued,
            },
            Err(e) => {
                tracing::error!("Database transaction failed for {}: {}", url, e);
                self.fail(url, Stage::Commit, "database transaction failed")
            }
        }
    }

    /// Marks the record `failed` with a truncated message
    fn fail(&self, url: &str, stage: Stage, message: &str) -> Outcome {
        let message = truncate_error_message(message);

        let marked = self.lock_storage().mark_failed(url, &message);
        if let Err(e) = marked {
            tracing::error!("Failed to mark {} as failed in DB: {}", url, e);
        }

        Outcome::Failed { stage, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_message_unchanged() {
        assert_eq!(truncate_error_message("boom"), "boom");
        assert_eq!(truncate_error_message(""), "");
    }

    #[test]
    fn test_truncate_long_message_to_exact_limit() {
        let message = "x".repeat(5000);
        let truncated = truncate_error_message(&message);
        assert_eq!(truncated.chars().count(), MAX_ERROR_MESSAGE_CHARS);
    }

    #[test]
    fn test_truncate_at_exact_limit_unchanged() {
        let message = "y".repeat(MAX_ERROR_MESSAGE_CHARS);
        assert_eq!(truncate_error_message(&message), message);
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let message = "é".repeat(MAX_ERROR_MESSAGE_CHARS + 10);
        let truncated = truncate_error_message(&message);
        assert_eq!(truncated.chars().count(), MAX_ERROR_MESSAGE_CHARS);
        assert_eq!(truncated.len(), MAX_ERROR_MESSAGE_CHARS * 2);
    }

    #[test]
    fn test_panic_message_payloads() {
        let from_str: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(from_str.as_ref()), "static message");

        let from_string: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(panic_message(from_string.as_ref()), "owned message");

        let other: Box<dyn Any + Send> = Box::new(42_u32);
        assert_eq!(panic_message(other.as_ref()), "unknown panic payload");
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Fetch.to_string(), "fetch");
        assert_eq!(Stage::PersistClassification.to_string(), "persist_classification");
    }
}
