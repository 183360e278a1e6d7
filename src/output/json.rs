//! JSON export of the aggregated crawl results
//!
//! The export is a single JSON object mapping each page URL to the records
//! extracted from it, in extraction order:
//!
//! ```json
//! {
//!   "https://example.com/": [
//!     { "elementTag": "p", "innerText": "hello" }
//!   ]
//! }
//! ```
//!
//! Keys are the canonical (trimmed, lowercased) request URLs, emitted in sorted
//! order. Older exports of the same tool keyed pages by the URL exactly as
//! requested, so mixed-case paths may differ between the two.

use crate::output::traits::{OutputResult, Sink};
use crate::state::CrawlState;
use std::path::{Path, PathBuf};

/// Serializes the results of a crawl as pretty-printed JSON
///
/// # Errors
///
/// Returns `OutputError::Serialization` if serde_json fails.
pub fn export_results(state: &CrawlState) -> OutputResult<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(state.results())?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Builds the export file name `<domain>_<unix timestamp>.json`
///
/// A `:` in the domain (from an explicit port) is replaced by `_` so the name
/// is valid on every filesystem.
pub fn output_file_name(domain: &str, unix_timestamp: i64) -> String {
    format!("{}_{}.json", domain.replace(':', "_"), unix_timestamp)
}

/// Writes serialized results into `dir`, creating the directory if needed
///
/// # Returns
///
/// The path of the written file.
///
/// # Errors
///
/// Returns `OutputError::Io` if the directory cannot be created or the file
/// cannot be written.
pub fn write_export(
    sink: &dyn Sink,
    dir: &Path,
    file_name: &str,
    bytes: &[u8],
) -> OutputResult<PathBuf> {
    sink.ensure_directory(dir)?;

    let path = dir.join(file_name);
    sink.write_file(&path, bytes)?;

    tracing::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}

/// Exports the crawl results for `domain` into `dir`
///
/// Combines [`export_results`], [`output_file_name`] and [`write_export`].
pub fn save_results(
    sink: &dyn Sink,
    state: &CrawlState,
    dir: &Path,
    domain: &str,
    unix_timestamp: i64,
) -> OutputResult<PathBuf> {
    let bytes = export_results(state)?;
    write_export(sink, dir, &output_file_name(domain, unix_timestamp), &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{FsSink, OutputError};
    use crate::state::{Admission, ExtractedRecord};
    use crate::url::CanonicalUrl;
    use serde_json::Value;
    use tempfile::TempDir;

    fn admit(state: &mut CrawlState, url: &str, depth: u32) -> CanonicalUrl {
        match state.admit(url, "example.com", depth, 5) {
            Admission::Admitted { url, .. } => url,
            other => panic!("{} not admitted: {:?}", url, other),
        }
    }

    fn create_test_state() -> CrawlState {
        let mut state = CrawlState::new();
        let seed = admit(&mut state, "https://example.com/", 0);
        let about = admit(&mut state, "https://example.com/About", 1);

        state.record(&seed, ExtractedRecord::new("p", "hello"));
        state.record(&seed, ExtractedRecord::new("p", "world"));
        state.record(&about, ExtractedRecord::new("p", "about us"));
        state
    }

    #[test]
    fn test_export_shape() {
        let bytes = export_results(&create_test_state()).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "https://example.com/": [
                    { "elementTag": "p", "innerText": "hello" },
                    { "elementTag": "p", "innerText": "world" }
                ],
                "https://example.com/about": [
                    { "elementTag": "p", "innerText": "about us" }
                ]
            })
        );
    }

    #[test]
    fn test_export_keys_are_sorted() {
        let bytes = export_results(&create_test_state()).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let seed = text.find("\"https://example.com/\"").unwrap();
        let about = text.find("\"https://example.com/about\"").unwrap();
        assert!(seed < about);
    }

    #[test]
    fn test_export_empty_state() {
        let bytes = export_results(&CrawlState::new()).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(
            output_file_name("go-colly.org", 1700000000),
            "go-colly.org_1700000000.json"
        );
        assert_eq!(
            output_file_name("localhost:8080", 42),
            "localhost_8080_42.json"
        );
    }

    #[test]
    fn test_save_results_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("outputs");
        let state = create_test_state();

        let path = save_results(&FsSink::new(), &state, &dir, "example.com", 1700000000).unwrap();
        assert_eq!(path, dir.join("example.com_1700000000.json"));

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: std::collections::BTreeMap<String, Vec<ExtractedRecord>> =
            serde_json::from_str(&content).unwrap();

        assert_eq!(parsed.len(), state.results().len());
        for (url, records) in state.results() {
            assert_eq!(parsed[url.as_str()], *records);
        }
    }

    #[test]
    fn test_unwritable_destination_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-directory");
        std::fs::write(&blocker, b"file").unwrap();

        let err = write_export(&FsSink::new(), &blocker, "out.json", b"{}").unwrap_err();
        assert!(matches!(err, OutputError::Io { .. }));
    }
}
