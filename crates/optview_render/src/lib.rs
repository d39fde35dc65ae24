//! Rendering of annotated source files for the optview pipeline.
//!
//! Streams a source file line by line, strips any previously applied
//! annotation suffix at the configured marker, and (unless cleaning) appends
//! the current messages from the [`AnnotationStore`](optview_diagnostics::AnnotationStore).
//! Stripping before appending makes repeated annotation runs idempotent.

#![warn(missing_docs)]

pub mod error;
pub mod options;
pub mod renderer;

pub use error::RenderError;
pub use options::{OutputMode, RenderOptions, DEFAULT_MARKER};
pub use renderer::{annotate, annotate_file, strip_suffix};
