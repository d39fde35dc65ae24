//! The per-line annotation algorithm.

use crate::error::RenderError;
use crate::options::RenderOptions;
use optview_diagnostics::AnnotationStore;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

/// Removes a previously applied annotation suffix from one source line.
///
/// Truncates at the first occurrence of `marker`; the line is returned
/// unchanged when the marker never occurs. If the marker text legitimately
/// appears inside a message, truncation still happens at the first
/// occurrence — the suffix it introduced is removed as a whole.
pub fn strip_suffix<'a>(line: &'a str, marker: &str) -> &'a str {
    match line.find(marker) {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Streams `source`, writing each line of `path` with its annotations.
///
/// Per physical line (1-indexed, counted independently of content):
/// 1. strip any existing annotation suffix at `options.marker`;
/// 2. unless `options.clean`, append `marker` followed by the stored
///    messages joined with `;` when the store holds any for this line;
/// 3. terminate with `\n`.
///
/// Lines of arbitrary length are supported; reads grow as needed.
pub fn annotate<R: BufRead, W: Write>(
    source: R,
    path: &Path,
    store: &AnnotationStore,
    options: &RenderOptions,
    out: &mut W,
) -> io::Result<()> {
    let mut line_no: u32 = 0;
    for line in source.lines() {
        let line = line?;
        line_no += 1;
        out.write_all(strip_suffix(&line, &options.marker).as_bytes())?;
        if !options.clean {
            let messages = store.messages(path, line_no);
            if !messages.is_empty() {
                write!(out, "{}{}", options.marker, messages.join(";"))?;
            }
        }
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// Opens `path`, renders its annotated content fully into memory, and
/// returns the buffer.
///
/// The read handle is closed before this returns, so the caller may safely
/// overwrite `path` with the buffer (writeback) or stream it elsewhere.
/// An unreadable file yields [`RenderError::Open`] and no output.
pub fn annotate_file(
    path: &Path,
    store: &AnnotationStore,
    options: &RenderOptions,
) -> Result<Vec<u8>, RenderError> {
    let file = File::open(path).map_err(|source| RenderError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut buf = Vec::new();
    annotate(BufReader::new(file), path, store, options, &mut buf)?;
    Ok(buf)
}
