//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with timeouts and redirect policy
//! - Rotating user agents and sending the referring page
//! - GET requests to fetch page content
//! - Error classification

use crate::config::Config;
use crate::crawler::user_agent::UserAgentPool;
use crate::state::{RejectReason, SharedCrawlState};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, REFERER, USER_AGENT};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum number of redirects followed for one request
pub const MAX_REDIRECTS: usize = 10;

/// Result of a fetch operation
#[derive(Debug, Clone)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: Url,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value (empty if absent)
        content_type: String,
        /// Page body content
        body: String,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read failure, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Returns true if the page should be parsed as HTML
    ///
    /// A missing Content-Type falls back to sniffing the body for markup.
    pub fn is_html(&self) -> bool {
        match self {
            Self::Success {
                content_type, body, ..
            } => {
                if content_type.is_empty() {
                    body.trim_start().starts_with('<')
                } else {
                    content_type.to_ascii_lowercase().contains("html")
                }
            }
            _ => false,
        }
    }
}

/// Something that can retrieve a page for the crawler
///
/// The coordinator only talks to this trait; timeouts, redirects and header
/// handling belong to the implementation.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url`, telling the server which page linked to it
    async fn fetch(&self, url: &Url, referer: Option<&Url>) -> FetchResult;
}

/// Why a redirect was not followed
#[derive(Debug, Error)]
pub enum RedirectError {
    #[error("too many redirects (limit {0})")]
    TooMany(usize),

    #[error("redirect to {url} refused: {reason}")]
    Refused { url: String, reason: RejectReason },
}

/// Builds the redirect policy for one crawl
///
/// Every hop is reserved in the crawl state before it is followed, so a page
/// reached through a redirect is never fetched a second time through a link
/// (and the other way round). Hops leaving the crawl domain are refused.
pub fn redirect_policy(state: SharedCrawlState, domain: String) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() > MAX_REDIRECTS {
            return attempt.error(RedirectError::TooMany(MAX_REDIRECTS));
        }

        let verdict = state.reserve_redirect(attempt.url().as_str(), attempt.previous(), &domain);
        match verdict {
            Ok(_) => attempt.follow(),
            Err(reason) => {
                let url = attempt.url().to_string();
                tracing::debug!("Not following redirect to {}: {}", url, reason);
                attempt.error(RedirectError::Refused { url, reason })
            }
        }
    })
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `request_timeout_secs` - Total timeout for one request
/// * `redirects` - How redirects are handled
///
/// # Example
///
/// ```no_run
/// use reqwest::redirect::Policy;
/// use sumi_glean::crawler::build_http_client;
///
/// let client = build_http_client(30, Policy::limited(10)).unwrap();
/// ```
pub fn build_http_client(
    request_timeout_secs: u64,
    redirects: Policy,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .redirect(redirects)
        .gzip(true)
        .brotli(true)
        .build()
}

/// `Fetcher` backed by a `reqwest` client
pub struct HttpFetcher {
    client: Client,
    user_agents: UserAgentPool,
}

impl HttpFetcher {
    /// Creates a fetcher whose redirects go through admission on `state`
    pub fn new(config: &Config, state: SharedCrawlState) -> Result<Self, reqwest::Error> {
        let redirects = redirect_policy(state, config.domain.clone());
        Ok(Self {
            client: build_http_client(config.request_timeout_secs, redirects)?,
            user_agents: UserAgentPool::new(),
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    /// Fetches a URL with error classification
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | HTTP 2xx/3xx after redirects | Success |
    /// | HTTP 4xx/5xx | HttpError |
    /// | Timeout | NetworkError |
    /// | Connection refused | NetworkError |
    /// | Body read failure | NetworkError |
    async fn fetch(&self, url: &Url, referer: Option<&Url>) -> FetchResult {
        let mut request = self
            .client
            .get(url.clone())
            .header(USER_AGENT, self.user_agents.pick());

        if let Some(referer) = referer {
            request = request.header(REFERER, referer.as_str());
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                let final_url = response.url().clone();

                if !status.is_success() {
                    return FetchResult::HttpError {
                        status_code: status.as_u16(),
                    };
                }

                let content_type = response
                    .headers()
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("")
                    .to_string();

                match response.text().await {
                    Ok(body) => FetchResult::Success {
                        final_url,
                        status_code: status.as_u16(),
                        content_type,
                        body,
                    },
                    Err(e) => FetchResult::NetworkError {
                        error: e.to_string(),
                    },
                }
            }
            Err(e) => {
                if e.is_timeout() {
                    FetchResult::NetworkError {
                        error: "Request timeout".to_string(),
                    }
                } else if e.is_connect() {
                    FetchResult::NetworkError {
                        error: "Connection refused".to_string(),
                    }
                } else if e.is_redirect() {
                    let reason = std::error::Error::source(&e)
                        .map(|source| source.to_string())
                        .unwrap_or_else(|| e.to_string());
                    FetchResult::NetworkError {
                        error: format!("Redirect not followed: {}", reason),
                    }
                } else {
                    FetchResult::NetworkError {
                        error: e.to_string(),
                    }
                }
            }
        }
    }
}
