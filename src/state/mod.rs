//! State module for tracking crawl progress
//!
//! This module provides the per-run crawl state shared between worker tasks.
//!
//! # Components
//!
//! - `CrawlState`: visited sets, depth map and aggregated results of one run
//! - `SharedCrawlState`: the mutex-guarded handle workers use
//! - `PageState`: lifecycle of an individual candidate URL
//! - `ExtractedRecord`: one normalized text fragment of a page

mod crawl_state;
mod page_state;
mod record;

// Re-export main types
pub use crawl_state::{Admission, CrawlState, RejectReason, SharedCrawlState};
pub use page_state::PageState;
pub use record::ExtractedRecord;
