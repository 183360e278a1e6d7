//! Statistics collected over one crawl run
//!
//! This module provides the end-of-run summary printed after the export has
//! been written.

use crate::state::{CrawlState, PageState, RejectReason};
use std::collections::HashMap;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    /// Number of URLs admitted (including the seed)
    pub pages_admitted: u64,

    /// Number of pages fetched successfully
    pub pages_visited: u64,

    /// Number of pages whose fetch failed
    pub pages_failed: u64,

    /// Number of pages that produced at least one record
    pub pages_with_records: u64,

    /// Total number of records extracted
    pub records_extracted: u64,

    /// Refused candidate URLs by reason
    pub rejections: HashMap<RejectReason, u64>,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

impl CrawlStatistics {
    /// Creates an empty statistics block
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one refused candidate
    pub fn record_rejection(&mut self, reason: RejectReason) {
        *self.rejections.entry(reason).or_insert(0) += 1;
    }

    /// Number of candidates refused for `reason`
    pub fn rejected(&self, reason: RejectReason) -> u64 {
        self.rejections.get(&reason).copied().unwrap_or(0)
    }

    /// Total number of refused candidates
    pub fn total_rejected(&self) -> u64 {
        self.rejections.values().sum()
    }

    /// Fills in the page and record counts from the final crawl state
    pub fn absorb_state(&mut self, state: &CrawlState) {
        self.pages_admitted = state.admitted_count() as u64;
        self.pages_visited = state.visited_count() as u64;
        self.pages_failed = state.count_in_state(PageState::Failed) as u64;
        self.pages_with_records = state.results().len() as u64;
        self.records_extracted = state.record_count() as u64;
    }

    /// Returns the success rate as a percentage of admitted pages
    pub fn success_rate(&self) -> f64 {
        if self.pages_admitted == 0 {
            return 0.0;
        }
        (self.pages_visited as f64 / self.pages_admitted as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Pages admitted: {}", stats.pages_admitted);
    println!("  Pages visited: {}", stats.pages_visited);
    println!("  Pages failed: {}", stats.pages_failed);
    println!("  Pages with records: {}", stats.pages_with_records);
    println!("  Records extracted: {}", stats.records_extracted);
    println!("  Elapsed: {:.2}s", stats.elapsed.as_secs_f64());
    println!();

    if stats.total_rejected() > 0 {
        println!("Rejected Links:");
        let mut rejection_counts: Vec<_> = stats.rejections.iter().collect();
        rejection_counts.sort_by(|a, b| b.1.cmp(a.1));

        for (reason, count) in rejection_counts {
            println!("  {}: {}", reason, count);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} pages successfully visited)",
        stats.success_rate(),
        stats.pages_visited,
        stats.pages_admitted
    );
}
