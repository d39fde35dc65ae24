//! Parsing of raw `file:line:message` compiler output lines.

use crate::diagnostic::Diagnostic;
use std::num::ParseIntError;
use std::path::PathBuf;

/// Errors produced when a compiler output line cannot be parsed.
///
/// Parse failures are recoverable by design: the ingestion loop reports the
/// offending line on stderr and continues with the next one.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The line did not contain the two colons separating file, line number,
    /// and message.
    #[error("expected `file:line:message`, got {0:?}")]
    MissingFields(String),

    /// The field between the first two colons is not a non-negative integer.
    #[error("invalid line number {found:?}: {source}")]
    InvalidLineNumber {
        /// The text found where a line number was expected.
        found: String,
        /// The underlying integer parse failure.
        source: ParseIntError,
    },
}

/// Parses one line of compiler output into a [`Diagnostic`].
///
/// The line is split at its first two `:` separators; everything after the
/// second colon is the message, taken verbatim even when it contains further
/// colons. Typical input (`gc -m` style):
///
/// ```text
/// main.go:91: can inline NewSourceFile
/// main.go:26: leaking param: in_
/// ```
pub fn parse_line(input: &str) -> Result<Diagnostic, ParseError> {
    let (file, rest) = input
        .split_once(':')
        .ok_or_else(|| ParseError::MissingFields(input.to_string()))?;
    let (line_field, message) = rest
        .split_once(':')
        .ok_or_else(|| ParseError::MissingFields(input.to_string()))?;

    let line = line_field
        .parse::<u32>()
        .map_err(|source| ParseError::InvalidLineNumber {
            found: line_field.to_string(),
            source,
        })?;

    Ok(Diagnostic {
        file: PathBuf::from(file),
        line,
        message: message.to_string(),
    })
}
