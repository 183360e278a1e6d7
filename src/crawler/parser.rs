//! HTML parser for extracting records and links
//!
//! This module handles parsing a fetched page to extract:
//! - One record per element matching the configured tag list
//! - Links to follow (from `<a href>` tags)

use crate::crawler::extractor::{extract_record, TagSelector};
use crate::state::ExtractedRecord;
use crate::url::resolve_link;
use scraper::{Html, Selector};
use url::Url;

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Records for every matched element, in document order
    pub records: Vec<ExtractedRecord>,

    /// All followable links found on the page (absolute URLs)
    pub links: Vec<Url>,
}

/// Parses HTML content and extracts records and links
///
/// # Link Extraction Rules
///
/// Every `<a href="...">` is resolved against `base_url`. Links are skipped
/// when they are `javascript:`, `mailto:`, `tel:` or `data:` links, same-page
/// anchors, or do not resolve to an HTTP(S) URL. Domain and depth filtering is
/// left to admission.
///
/// # Example
///
/// ```
/// use sumi_glean::crawler::{parse_page, TagSelector};
/// use url::Url;
///
/// let html = r#"<html><body><p>Hi</p><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let tags = TagSelector::parse("p").unwrap();
///
/// let parsed = parse_page(html, &base_url, &tags);
/// assert_eq!(parsed.records[0].inner_text(), "hi");
/// assert_eq!(parsed.links[0].as_str(), "https://example.com/page");
/// ```
pub fn parse_page(html: &str, base_url: &Url, tags: &TagSelector) -> ParsedPage {
    let document = Html::parse_document(html);

    let records = document
        .select(tags.selector())
        .map(|element| extract_record(&element))
        .collect();

    let links = extract_links(&document, base_url);

    ParsedPage { records, links }
}

/// Extracts all valid links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}
