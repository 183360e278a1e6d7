//! Output module for exporting crawl results
//!
//! This module handles:
//! - Serializing the aggregated records as JSON
//! - Writing the export file through a `Sink`
//! - Recording and printing crawl statistics

mod fs_sink;
mod json;
pub mod stats;
mod traits;

pub use fs_sink::FsSink;
pub use json::{export_results, output_file_name, save_results, write_export};
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputResult, Sink};
