//! The two-phase annotation pipeline.
//!
//! Phase 1 (ingest) reads the diagnostic stream to end-of-stream and folds
//! every parseable line into the [`AnnotationStore`]; malformed lines warn
//! and are skipped. Phase 2 (render) walks the store's files in first-seen
//! order and renders each one, either to stdout behind a header line or back
//! over its own path. Diagnostics for one line may arrive scattered through
//! the stream, so rendering never starts until ingestion has finished.

use std::fs;
use std::io::{self, BufRead, Write};

use optview_diagnostics::{parse_line, AnnotationStore};
use optview_render::{annotate_file, OutputMode, RenderOptions};

use crate::GlobalArgs;

/// Counters from the ingestion phase.
#[derive(Debug, Default, Clone, Copy)]
pub struct IngestStats {
    /// Lines that parsed and were folded into the store (duplicates included).
    pub recorded: usize,
    /// Malformed lines that were reported and skipped.
    pub skipped: usize,
}

/// Reads the diagnostic stream to end-of-stream, folding each parseable line
/// into `store`.
///
/// A line that fails to parse is reported on stderr and skipped; ingestion
/// continues with the next line. Only a read failure on the stream itself is
/// an error.
pub fn ingest<R: BufRead>(input: R, store: &mut AnnotationStore) -> io::Result<IngestStats> {
    let mut stats = IngestStats::default();
    for line in input.lines() {
        let line = line?;
        match parse_line(&line) {
            Ok(diag) => {
                store.record(diag);
                stats.recorded += 1;
            }
            Err(err) => {
                stats.skipped += 1;
                eprintln!("warning: skipping diagnostic line: {err}");
            }
        }
    }
    Ok(stats)
}

/// Renders every file known to the store, one at a time.
///
/// In stdout mode the annotated files stream to `out` (the locked stdout in
/// the binary; any sink in tests), each preceded by a `<marker> <path> :`
/// header line. A file that cannot be opened is reported and produces no
/// output at all — no header, no writeback — while the remaining files still
/// render. Each writeback fully materializes the annotated content before
/// the destination path is reopened for truncation, since source and
/// destination are the same file.
pub fn render_all<W: Write>(
    store: &AnnotationStore,
    options: &RenderOptions,
    mode: OutputMode,
    out: &mut W,
    global: &GlobalArgs,
) -> Result<i32, Box<dyn std::error::Error>> {
    let mut rendered = 0usize;
    let mut skipped = 0usize;

    match mode {
        OutputMode::Stdout => {
            for path in store.files() {
                match annotate_file(path, store, options) {
                    Ok(buf) => {
                        writeln!(out, "{} {} :", options.marker, path.display())?;
                        out.write_all(&buf)?;
                        rendered += 1;
                    }
                    Err(err) => {
                        skipped += 1;
                        eprintln!("warning: {err}");
                    }
                }
            }
            out.flush()?;
        }
        OutputMode::Writeback => {
            for path in store.files() {
                match annotate_file(path, store, options) {
                    Ok(buf) => {
                        if let Err(err) = fs::write(path, &buf) {
                            skipped += 1;
                            eprintln!("warning: failed to write {}: {err}", path.display());
                        } else {
                            rendered += 1;
                        }
                    }
                    Err(err) => {
                        skipped += 1;
                        eprintln!("warning: {err}");
                    }
                }
            }
        }
    }

    if global.verbose {
        eprintln!("   Rendered {rendered} file(s), skipped {skipped}");
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::Path;
    use tempfile::NamedTempFile;

    fn quiet_global() -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
        }
    }

    fn options(marker: &str, clean: bool) -> RenderOptions {
        RenderOptions {
            marker: marker.to_string(),
            clean,
        }
    }

    #[test]
    fn ingest_valid_stream() {
        let stream = "a.go:3: can inline foo\na.go:5: escapes to heap\n";
        let mut store = AnnotationStore::new();
        let stats = ingest(Cursor::new(stream), &mut store).unwrap();
        assert_eq!(stats.recorded, 2);
        assert_eq!(stats.skipped, 0);
        assert_eq!(store.messages(Path::new("a.go"), 3), [" can inline foo"]);
        assert_eq!(store.messages(Path::new("a.go"), 5), [" escapes to heap"]);
    }

    #[test]
    fn ingest_survives_malformed_line() {
        let stream = "a.go:3: can inline foo\nnot a diagnostic\nb.go:1: note\n";
        let mut store = AnnotationStore::new();
        let stats = ingest(Cursor::new(stream), &mut store).unwrap();
        assert_eq!(stats.recorded, 2);
        assert_eq!(stats.skipped, 1);
        assert_eq!(store.message_count(), 2);
        assert_eq!(store.messages(Path::new("a.go"), 3), [" can inline foo"]);
        assert_eq!(store.messages(Path::new("b.go"), 1), [" note"]);
    }

    #[test]
    fn ingest_duplicate_stream_is_idempotent() {
        let stream = "a.go:3: can inline foo\na.go:3: can inline foo\n";
        let mut store = AnnotationStore::new();
        let stats = ingest(Cursor::new(stream), &mut store).unwrap();
        assert_eq!(stats.recorded, 2);
        assert_eq!(store.messages(Path::new("a.go"), 3), [" can inline foo"]);
    }

    #[test]
    fn ingest_scattered_entries_merge() {
        // Entries for the same file arrive non-adjacently (distinct passes).
        let stream = "a.go:3: can inline foo\nb.go:1: other\na.go:3: foo does not escape\n";
        let mut store = AnnotationStore::new();
        ingest(Cursor::new(stream), &mut store).unwrap();
        assert_eq!(
            store.messages(Path::new("a.go"), 3),
            [" can inline foo", " foo does not escape"]
        );
    }

    #[test]
    fn writeback_annotates_in_place() {
        let source = "package main\n\nfunc foo() int {\n\treturn 1\n}\n\n";
        let tmp = NamedTempFile::new().unwrap();
        fs::write(tmp.path(), source).unwrap();
        let path = tmp.path().to_str().unwrap();

        let stream = format!("{path}:3: can inline foo\n{path}:3: can inline foo\n{path}:5: escapes to heap\n");
        let mut store = AnnotationStore::new();
        ingest(Cursor::new(stream), &mut store).unwrap();

        let options = options("//#", false);
        render_all(&store, &options, OutputMode::Writeback, &mut io::sink(), &quiet_global()).unwrap();

        let annotated = fs::read_to_string(tmp.path()).unwrap();
        let lines: Vec<_> = annotated.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[2], "func foo() int {//# can inline foo");
        assert_eq!(lines[2].matches("//#").count(), 1);
        assert_eq!(lines[4], "}//# escapes to heap");
        assert_eq!(lines[0], "package main");
        assert_eq!(lines[3], "\treturn 1");
    }

    #[test]
    fn writeback_twice_matches_once() {
        let source = "func foo() {}\n";
        let tmp = NamedTempFile::new().unwrap();
        fs::write(tmp.path(), source).unwrap();
        let path = tmp.path().to_str().unwrap();

        let mut store = AnnotationStore::new();
        ingest(Cursor::new(format!("{path}:1: can inline foo\n")), &mut store).unwrap();

        let options = options("//#", false);
        render_all(&store, &options, OutputMode::Writeback, &mut io::sink(), &quiet_global()).unwrap();
        let once = fs::read_to_string(tmp.path()).unwrap();
        render_all(&store, &options, OutputMode::Writeback, &mut io::sink(), &quiet_global()).unwrap();
        let twice = fs::read_to_string(tmp.path()).unwrap();
        assert_eq!(twice, once);
        assert_eq!(once, "func foo() {}//# can inline foo\n");
    }

    #[test]
    fn clean_writeback_restores_original() {
        let source = "package main\n\nfunc foo() int {\n\treturn 1\n}\n";
        let tmp = NamedTempFile::new().unwrap();
        fs::write(tmp.path(), source).unwrap();
        let path = tmp.path().to_str().unwrap();

        let mut store = AnnotationStore::new();
        ingest(Cursor::new(format!("{path}:3: can inline foo\n")), &mut store).unwrap();

        render_all(
            &store,
            &options("//#", false),
            OutputMode::Writeback,
            &mut io::sink(),
            &quiet_global(),
        )
        .unwrap();
        assert_ne!(fs::read_to_string(tmp.path()).unwrap(), source);

        render_all(
            &store,
            &options("//#", true),
            OutputMode::Writeback,
            &mut io::sink(),
            &quiet_global(),
        )
        .unwrap();
        assert_eq!(fs::read_to_string(tmp.path()).unwrap(), source);
    }

    #[test]
    fn unreadable_file_skipped_others_render() {
        let tmp = NamedTempFile::new().unwrap();
        fs::write(tmp.path(), "func foo() {}\n").unwrap();
        let good = tmp.path().to_str().unwrap();

        let stream = format!("/nonexistent/gone.go:1: note\n{good}:1: can inline foo\n");
        let mut store = AnnotationStore::new();
        ingest(Cursor::new(stream), &mut store).unwrap();

        render_all(
            &store,
            &options("//#", false),
            OutputMode::Writeback,
            &mut io::sink(),
            &quiet_global(),
        )
        .unwrap();

        let annotated = fs::read_to_string(tmp.path()).unwrap();
        assert_eq!(annotated, "func foo() {}//# can inline foo\n");
    }

    #[test]
    fn untouched_files_never_written() {
        // Files never mentioned in diagnostics are never rendered.
        let tmp = NamedTempFile::new().unwrap();
        fs::write(tmp.path(), "original\n").unwrap();

        let mut store = AnnotationStore::new();
        ingest(Cursor::new("other.go:1: note\n"), &mut store).unwrap();

        render_all(
            &store,
            &options("//#", false),
            OutputMode::Writeback,
            &mut io::sink(),
            &quiet_global(),
        )
        .unwrap();
        assert_eq!(fs::read_to_string(tmp.path()).unwrap(), "original\n");
    }

    #[test]
    fn stream_mode_writes_header_and_content() {
        let tmp = NamedTempFile::new().unwrap();
        fs::write(tmp.path(), "package main\nfunc foo() {}\n").unwrap();
        let path = tmp.path().to_str().unwrap();

        let mut store = AnnotationStore::new();
        ingest(Cursor::new(format!("{path}:2: can inline foo\n")), &mut store).unwrap();

        let mut out = Vec::new();
        render_all(
            &store,
            &options("//#", false),
            OutputMode::Stdout,
            &mut out,
            &quiet_global(),
        )
        .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert_eq!(
            out,
            format!("//# {path} :\npackage main\nfunc foo() {{}}//# can inline foo\n")
        );
    }

    #[test]
    fn stream_mode_keeps_first_seen_file_order() {
        let first = NamedTempFile::new().unwrap();
        let second = NamedTempFile::new().unwrap();
        fs::write(first.path(), "one\n").unwrap();
        fs::write(second.path(), "two\n").unwrap();
        let first_path = first.path().to_str().unwrap();
        let second_path = second.path().to_str().unwrap();

        let stream = format!("{first_path}:1: a\n{second_path}:1: b\n{first_path}:1: c\n");
        let mut store = AnnotationStore::new();
        ingest(Cursor::new(stream), &mut store).unwrap();

        let mut out = Vec::new();
        render_all(
            &store,
            &options("//#", false),
            OutputMode::Stdout,
            &mut out,
            &quiet_global(),
        )
        .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert_eq!(
            out,
            format!("//# {first_path} :\none//# a; c\n//# {second_path} :\ntwo//# b\n")
        );
    }

    #[test]
    fn stream_mode_skips_header_for_unreadable_file() {
        let tmp = NamedTempFile::new().unwrap();
        fs::write(tmp.path(), "readable\n").unwrap();
        let good = tmp.path().to_str().unwrap();

        let stream = format!("/nonexistent/gone.go:1: note\n{good}:1: ok\n");
        let mut store = AnnotationStore::new();
        ingest(Cursor::new(stream), &mut store).unwrap();

        let mut out = Vec::new();
        render_all(
            &store,
            &options("//#", false),
            OutputMode::Stdout,
            &mut out,
            &quiet_global(),
        )
        .unwrap();

        // The unreadable file contributes nothing, not even its header.
        let out = String::from_utf8(out).unwrap();
        assert!(!out.contains("gone.go"));
        assert_eq!(out, format!("//# {good} :\nreadable//# ok\n"));
    }
}
