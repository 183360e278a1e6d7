//! Sumi-Glean: a single-domain text harvester
//!
//! This crate implements a depth-bounded web crawler that stays inside one domain,
//! extracts normalized text from a configurable set of HTML elements, and writes the
//! aggregated result as a JSON document keyed by page URL.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Glean operations
#[derive(Debug, Error)]
pub enum GleanError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Invalid state transition for {url}: {from:?} -> {to:?}")]
    InvalidTransition {
        url: String,
        from: state::PageState,
        to: state::PageState,
    },

    #[error("Seed URL {url} was not admitted: {reason}")]
    SeedRejected {
        url: String,
        reason: state::RejectReason,
    },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Worker task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    #[error("Invalid protocol '{0}', expected 'http' or 'https'")]
    InvalidProtocol(String),

    #[error("Invalid tag selector list '{tags}': {message}")]
    InvalidSelector { tags: String, message: String },
}

/// Result type alias for Sumi-Glean operations
pub type Result<T> = std::result::Result<T, GleanError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use state::{Admission, CrawlState, ExtractedRecord, PageState, SharedCrawlState};
pub use url::{normalize_url, CanonicalUrl};
