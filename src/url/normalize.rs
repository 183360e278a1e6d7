use super::CanonicalUrl;

/// Normalizes a raw URL string into its canonical crawl identity
///
/// # Normalization Steps
///
/// 1. Trim leading and trailing whitespace
/// 2. Lowercase the entire string (scheme, host, path and query alike)
///
/// This is a total function: any input, including an empty or malformed URL,
/// produces a `CanonicalUrl`. Lowercasing the path means two pages whose paths
/// differ only by case share one identity; that is accepted for this crawler.
///
/// # Examples
///
/// ```
/// use sumi_glean::url::normalize_url;
///
/// let url = normalize_url("  https://Example.COM/About \n");
/// assert_eq!(url.as_str(), "https://example.com/about");
/// ```
pub fn normalize_url(raw: &str) -> CanonicalUrl {
    CanonicalUrl(raw.trim().to_lowercase())
}
