//! URL handling module for Sumi-Glean
//!
//! This module provides the canonical URL identity used for deduplication and
//! aggregation, domain restriction checks, and link resolution.

mod domain;
mod normalize;
mod resolve;

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export main functions
pub use domain::{base_url, matches_domain};
pub use normalize::normalize_url;
pub use resolve::resolve_link;

/// A case- and whitespace-normalized URL string
///
/// This is the only identity a page has during a crawl: it is the key of the
/// visited sets, the depth map and the results map. Construct it with
/// [`normalize_url`] so every comparison goes through the same normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalUrl(String);

impl CanonicalUrl {
    /// Returns the canonical form as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the canonical form contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.0.contains(needle)
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&::url::Url> for CanonicalUrl {
    fn from(url: &::url::Url) -> Self {
        normalize_url(url.as_str())
    }
}
