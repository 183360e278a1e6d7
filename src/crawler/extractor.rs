//! Text extraction from matched HTML elements

use crate::state::ExtractedRecord;
use crate::ConfigError;
use scraper::{ElementRef, Selector};

/// Characters replaced by a space after whitespace collapsing
const FORBIDDEN_TEXT_CHARACTERS: [char; 2] = ['\n', '\t'];

/// The compiled list of elements whose text is harvested
///
/// The configured tag list (e.g. `"h1, h2, p, li"`) is compiled once as a single
/// CSS selector group, so elements are matched in document order no matter which
/// tag of the list they match.
#[derive(Debug, Clone)]
pub struct TagSelector {
    source: String,
    selector: Selector,
}

impl TagSelector {
    /// Compiles a comma separated tag (or selector) list
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSelector` if the list is empty or is not a
    /// valid CSS selector group.
    pub fn parse(tags: &str) -> Result<Self, ConfigError> {
        let source = tags.trim();
        if source.is_empty() {
            return Err(ConfigError::InvalidSelector {
                tags: tags.to_string(),
                message: "tag list is empty".to_string(),
            });
        }

        let selector = Selector::parse(source).map_err(|e| ConfigError::InvalidSelector {
            tags: source.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            source: source.to_string(),
            selector,
        })
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// The tag list as configured
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// Builds a record from one matched element
///
/// Reads the element's tag name and the concatenated text of all its
/// descendants, then normalizes the text with [`normalize_text`]. Never fails;
/// an element without text yields an empty `inner_text`.
pub fn extract_record(element: &ElementRef<'_>) -> ExtractedRecord {
    let text: String = element.text().collect();
    ExtractedRecord::new(element.value().name(), normalize_text(&text))
}

/// Lowercases text and collapses every whitespace run to a single space
///
/// Leading and trailing whitespace disappears. Any newline or tab left over
/// after collapsing is replaced by a space.
///
/// # Examples
///
/// ```
/// use sumi_glean::crawler::normalize_text;
///
/// assert_eq!(normalize_text("  Hello\n\t  World  "), "hello world");
/// ```
pub fn normalize_text(text: &str) -> String {
    let collapsed = text
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    FORBIDDEN_TEXT_CHARACTERS
        .iter()
        .fold(collapsed, |acc, forbidden| acc.replace(*forbidden, " "))
}
