use super::CanonicalUrl;
use crate::config::Protocol;

/// Checks whether a canonical URL belongs to the crawl domain
///
/// Membership is plain substring containment on the canonical string, not host
/// parsing. A domain that is a substring of
/// another host (`example.com` inside `notexample.com` or
/// `example.com.attacker.net`) is admitted too, as is any URL carrying the domain
/// in its path or query. This is a known limitation of the crawler.
///
/// `domain` is expected to already be lowercase; configuration loading takes
/// care of that.
///
/// # Examples
///
/// ```
/// use sumi_glean::url::{matches_domain, normalize_url};
///
/// assert!(matches_domain(&normalize_url("https://Example.com/a"), "example.com"));
/// assert!(!matches_domain(&normalize_url("https://other.org/"), "example.com"));
/// ```
pub fn matches_domain(url: &CanonicalUrl, domain: &str) -> bool {
    url.contains(domain)
}

/// Builds the seed URL of a crawl from its protocol and domain
///
/// # Examples
///
/// ```
/// use sumi_glean::config::Protocol;
/// use sumi_glean::url::base_url;
///
/// assert_eq!(base_url(Protocol::Https, "example.com"), "https://example.com/");
/// ```
pub fn base_url(protocol: Protocol, domain: &str) -> String {
    format!("{}://{}/", protocol.as_str(), domain)
}
