//! Rendering configuration resolved by the CLI and passed into the core.

/// Default annotation marker, matching the compiler-comment style of the
/// languages this tool is typically pointed at.
pub const DEFAULT_MARKER: &str = "//\u{2190}";

/// Options controlling how annotated output is produced.
#[derive(Clone, Debug)]
pub struct RenderOptions {
    /// Literal text that delimits an annotation suffix from the original
    /// source line content. Stripping truncates at its first occurrence.
    pub marker: String,
    /// When set, strip existing annotation suffixes without appending the
    /// stored messages.
    pub clean: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            clean: false,
        }
    }
}

/// Where rendered output goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    /// Stream every file, each preceded by a header line, to stdout.
    Stdout,
    /// Overwrite each source file in place with its annotated content.
    Writeback,
}
