//! Diagnostic ingestion for the optview annotation pipeline.
//!
//! This crate provides the structured [`Diagnostic`] record, the line parser
//! that turns raw `file:line:message` compiler output into records, and the
//! [`AnnotationStore`] that accumulates deduplicated messages per source line
//! during the ingestion phase.

#![warn(missing_docs)]

pub mod diagnostic;
pub mod parser;
pub mod store;

pub use diagnostic::Diagnostic;
pub use parser::{parse_line, ParseError};
pub use store::AnnotationStore;
