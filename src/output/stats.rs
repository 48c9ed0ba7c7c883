//! Statistics generation from the URL database
//!
//! This module provides functionality for extracting and displaying
//! per-status counts from the storage layer.

use crate::state::UrlStatus;
use crate::storage::{Storage, StorageResult};
use std::collections::HashMap;

/// URL statistics summary
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    /// Total number of URLs known to the store
    pub total_urls: u64,

    /// Count of URLs by status; statuses with no URLs are omitted
    pub urls_by_status: HashMap<UrlStatus, u64>,
}

impl CrawlStatistics {
    /// Count for one status, zero if absent
    pub fn count(&self, status: UrlStatus) -> u64 {
        self.urls_by_status.get(&status).copied().unwrap_or(0)
    }

    /// URLs that reached a terminal status
    pub fn finished(&self) -> u64 {
        UrlStatus::all_states()
            .iter()
            .filter(|status| status.is_terminal())
            .map(|status| self.count(*status))
            .sum()
    }

    /// Percentage of finished URLs that were crawled
    pub fn success_rate(&self) -> f64 {
        let finished = self.finished();
        if finished == 0 {
            return 0.0;
        }
        (self.count(UrlStatus::Crawled) as f64 / finished as f64) * 100.0
    }
}

/// Loads statistics from storage
pub fn load_statistics(storage: &dyn Storage) -> StorageResult<CrawlStatistics> {
    let total_urls = storage.count_total()?;

    let mut urls_by_status = HashMap::new();
    for status in UrlStatus::all_states() {
        let count = storage.count_by_status(status)?;
        if count > 0 {
            urls_by_status.insert(status, count);
        }
    }

    Ok(CrawlStatistics {
        total_urls,
        urls_by_status,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== URL Statistics ===\n");

    println!("Overview:");
    println!("  Total URLs: {}", stats.total_urls);
    println!();

    println!("URLs by Status:");
    // Sort statuses by count (descending)
    let mut status_counts: Vec<_> = stats.urls_by_status.iter().collect();
    status_counts.sort_by(|a, b| b.1.cmp(a.1));

    for (status, count) in status_counts {
        let percentage = if stats.total_urls > 0 {
            (*count as f64 / stats.total_urls as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", status, count, percentage);
    }
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} finished URLs crawled)",
        stats.success_rate(),
        stats.count(UrlStatus::Crawled),
        stats.finished()
    );
}
