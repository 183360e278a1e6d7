//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with user-agent rotation and referer headers
//! - HTML parsing, text extraction and link extraction
//! - The FIFO work queue and worker pool bound
//! - Overall crawl coordination

mod coordinator;
mod extractor;
mod fetcher;
mod parser;
mod scheduler;
mod user_agent;

pub use coordinator::{run_crawl, Coordinator, CrawlOutcome};
pub use extractor::{extract_record, normalize_text, TagSelector};
pub use fetcher::{
    build_http_client, redirect_policy, FetchResult, Fetcher, HttpFetcher, RedirectError,
    MAX_REDIRECTS,
};
pub use parser::{parse_page, ParsedPage};
pub use scheduler::{CrawlTask, Scheduler};
pub use user_agent::UserAgentPool;

