//! Output module for reporting on the URL database
//!
//! This module handles:
//! - Loading per-status counts from storage
//! - Printing a human-readable summary

pub mod stats;

pub use stats::{load_statistics, print_statistics, CrawlStatistics};
