//! Error types for source file rendering.

use std::path::PathBuf;

/// Errors that can occur while rendering one source file.
///
/// An [`Open`](RenderError::Open) failure is recoverable at the pipeline
/// level: the file is skipped with a warning and no output is produced for
/// it, while other files still render.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A file referenced by diagnostics could not be opened for reading.
    #[error("failed to open source file {}: {source}", path.display())]
    Open {
        /// The path that failed to open.
        path: PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },

    /// Reading the source or writing the annotated output failed mid-stream.
    #[error("failed to render annotated output: {0}")]
    Io(#[from] std::io::Error),
}
