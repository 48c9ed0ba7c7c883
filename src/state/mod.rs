//! State module for tracking pipeline progress
//!
//! # Components
//!
//! - `UrlStatus`: the lifecycle of a single URL record (pending, classifying,
//!   crawling, crawled, skipped, failed) and its allowed transitions

mod url_status;

pub use url_status::UrlStatus;
