/// URL status definitions for tracking pipeline progress
///
/// This module defines every state a URL record can be in and the forward-only
/// transitions between them.
use std::fmt;

/// Represents the current status of a URL record in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlStatus {
    // ===== Active States =====
    /// URL is known but processing has not started
    Pending,

    /// URL is being sent to the classification service
    Classifying,

    /// URL was classified as a crawl target and is being fetched
    Crawling,

    // ===== Terminal States =====
    /// URL was fetched, extracted and stored
    Crawled,

    /// URL was classified as something other than the target label
    Skipped,

    /// Processing failed at some stage; see `error_message`
    Failed,
}

impl UrlStatus {
    /// Returns true if this is a terminal state (no further processing happens)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Crawled | Self::Skipped | Self::Failed)
    }

    /// Returns true if a pipeline task currently owns this record
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Classifying | Self::Crawling)
    }

    /// Returns true if moving from `self` to `next` is allowed
    ///
    /// The lifecycle is `pending → classifying → {skipped | crawling} → crawled`,
    /// with `failed` reachable from every non-terminal state.
    pub fn can_transition_to(&self, next: UrlStatus) -> bool {
        match (self, next) {
            (Self::Pending, Self::Classifying) => true,
            (Self::Classifying, Self::Skipped | Self::Crawling) => true,
            (Self::Crawling, Self::Crawled) => true,
            (from, Self::Failed) => !from.is_terminal(),
            _ => false,
        }
    }

    /// Converts the status to its database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Classifying => "classifying",
            Self::Crawling => "crawling",
            Self::Crawled => "crawled",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }

    /// Parses a status from its database string representation
    ///
    /// Returns None if the string doesn't match any known status.
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "classifying" => Some(Self::Classifying),
            "crawling" => Some(Self::Crawling),
            "crawled" => Some(Self::Crawled),
            "skipped" => Some(Self::Skipped),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Returns all possible statuses in lifecycle order
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Pending,
            Self::Classifying,
            Self::Crawling,
            Self::Crawled,
            Self::Skipped,
            Self::Failed,
        ]
    }
}

impl fmt::Display for UrlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}
