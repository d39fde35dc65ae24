//! Per-file, per-line accumulation of deduplicated diagnostic messages.

use crate::diagnostic::Diagnostic;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Messages recorded for one source file, keyed by 1-indexed line number.
#[derive(Debug, Default)]
struct FileAnnotations {
    lines: HashMap<u32, Vec<String>>,
}

/// Accumulates diagnostic messages per (file, line) during ingestion.
///
/// The store is populated exclusively while the diagnostic stream is being
/// read and is only queried afterwards, when rendering. Messages for a given
/// line keep their first-ingested order and are deduplicated by exact string
/// equality, so feeding the same stream twice leaves the store unchanged.
///
/// File enumeration follows first-seen ingestion order, which makes rendered
/// output reproducible for a given stream.
#[derive(Debug, Default)]
pub struct AnnotationStore {
    files: HashMap<PathBuf, FileAnnotations>,
    order: Vec<PathBuf>,
}

impl AnnotationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a parsed diagnostic into the store.
    pub fn record(&mut self, diag: Diagnostic) {
        self.add_message(&diag.file, diag.line, &diag.message);
    }

    /// Records `message` for `(file, line)` unless an identical message is
    /// already present there. Idempotent under repeated identical calls.
    pub fn add_message(&mut self, file: &Path, line: u32, message: &str) {
        let record = match self.files.entry(file.to_path_buf()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                self.order.push(file.to_path_buf());
                entry.insert(FileAnnotations::default())
            }
        };
        let messages = record.lines.entry(line).or_default();
        if !messages.iter().any(|m| m == message) {
            messages.push(message.to_string());
        }
    }

    /// Returns the messages recorded for `(file, line)` in first-ingested
    /// order, or an empty slice if none were recorded.
    pub fn messages(&self, file: &Path, line: u32) -> &[String] {
        self.files
            .get(file)
            .and_then(|record| record.lines.get(&line))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterates every file that received at least one message, in first-seen
    /// ingestion order.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.order.iter().map(PathBuf::as_path)
    }

    /// Number of distinct files with recorded messages.
    pub fn file_count(&self) -> usize {
        self.order.len()
    }

    /// Total number of distinct messages across all files and lines.
    pub fn message_count(&self) -> usize {
        self.files
            .values()
            .flat_map(|record| record.lines.values())
            .map(Vec::len)
            .sum()
    }

    /// Returns `true` if no messages have been recorded.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
