use serde::{Deserialize, Serialize};

/// One normalized text fragment taken from an HTML element of a page
///
/// The serialized field names (`elementTag`, `innerText`) are the external
/// schema of the JSON output and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    #[serde(rename = "elementTag")]
    element_tag: String,

    #[serde(rename = "innerText")]
    inner_text: String,
}

impl ExtractedRecord {
    /// Creates a record from an element tag and already-normalized text
    pub fn new(element_tag: impl Into<String>, inner_text: impl Into<String>) -> Self {
        Self {
            element_tag: element_tag.into(),
            inner_text: inner_text.into(),
        }
    }

    /// The tag name of the element the text came from (e.g. `p`, `h1`)
    pub fn element_tag(&self) -> &str {
        &self.element_tag
    }

    /// The normalized, lowercased text content of the element
    pub fn inner_text(&self) -> &str {
        &self.inner_text
    }
}
