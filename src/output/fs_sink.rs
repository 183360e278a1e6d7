//! Filesystem-backed output sink

use crate::output::traits::{OutputError, OutputResult, Sink};
use std::fs;
use std::path::Path;

/// Writes exports to the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSink;

impl FsSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for FsSink {
    fn ensure_directory(&self, path: &Path) -> OutputResult<()> {
        fs::create_dir_all(path).map_err(|e| OutputError::io(path, e))
    }

    fn write_file(&self, path: &Path, bytes: &[u8]) -> OutputResult<()> {
        fs::write(path, bytes).map_err(|e| OutputError::io(path, e))
    }
}
