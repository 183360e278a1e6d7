//! Output sink trait and error types
//!
//! This module defines the trait interface for the destination the export is
//! written to and the errors writing it can produce.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize results: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl OutputError {
    /// Wraps an I/O error together with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for export destinations
///
/// The exporter only needs two things from the place it writes to: a
/// directory that exists and a way to write a whole file into it.
pub trait Sink {
    /// Creates the directory (and any missing parents) if it does not exist
    ///
    /// # Arguments
    ///
    /// * `path` - The directory to create
    fn ensure_directory(&self, path: &Path) -> OutputResult<()>;

    /// Writes `bytes` to `path`, replacing any existing file
    ///
    /// # Arguments
    ///
    /// * `path` - The file to write
    /// * `bytes` - The complete file content
    fn write_file(&self, path: &Path, bytes: &[u8]) -> OutputResult<()>;
}
