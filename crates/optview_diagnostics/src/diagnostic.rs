//! The structured diagnostic record produced by the line parser.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One compiler diagnostic tied to a source location.
///
/// Diagnostics are transient: each one is produced by
/// [`parse_line`](crate::parse_line) from a single line of compiler output
/// and immediately folded into the [`AnnotationStore`](crate::AnnotationStore).
/// The message content is opaque text; optview never interprets it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Path of the source file the compiler reported on.
    pub file: PathBuf,
    /// 1-indexed line number within the file.
    pub line: u32,
    /// The message text, verbatim (including any leading whitespace the
    /// compiler emitted after the second colon).
    pub message: String,
}

impl Diagnostic {
    /// Creates a new diagnostic record.
    pub fn new(file: impl Into<PathBuf>, line: u32, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            message: message.into(),
        }
    }
}
