//! optview — overlays compiler diagnostics onto the source files they refer to.
//!
//! Reads `file:line:message` diagnostic lines (from stdin or from a spawned
//! compiler command), accumulates them per source line, then renders every
//! referenced file with the messages appended as marked comment suffixes.
//! Re-running is idempotent, and `--clean` strips the suffixes back out.

#![warn(missing_docs)]

mod compiler;
mod pipeline;

use std::io::{self, BufReader};
use std::process;

use clap::Parser;
use optview_diagnostics::AnnotationStore;
use optview_render::{OutputMode, RenderOptions, DEFAULT_MARKER};

/// optview — view compiler optimization decisions next to the source.
#[derive(Parser, Debug)]
#[command(
    name = "optview",
    version,
    about = "Overlay compiler diagnostics onto source files"
)]
pub struct Cli {
    /// Write annotated output back to the source files instead of stdout.
    #[arg(short, long)]
    pub write: bool,

    /// Strip existing annotation suffixes without adding new ones.
    #[arg(short, long)]
    pub clean: bool,

    /// Marker text that delimits an annotation suffix.
    #[arg(long, default_value = DEFAULT_MARKER)]
    pub marker: String,

    /// Suppress status output (warnings are still printed).
    #[arg(short, long)]
    pub quiet: bool,

    /// Print an ingestion and rendering summary to stderr.
    #[arg(short, long)]
    pub verbose: bool,

    /// Compiler command whose stdout supplies the diagnostic stream.
    /// When omitted, the stream is read from stdin.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-warning status output.
    pub quiet: bool,
    /// Whether to print per-phase summaries.
    pub verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Runs the two-phase pipeline: ingest the diagnostic stream, then render
/// every referenced file.
fn run(cli: Cli) -> Result<i32, Box<dyn std::error::Error>> {
    let options = RenderOptions {
        marker: cli.marker,
        clean: cli.clean,
    };
    let mode = if cli.write {
        OutputMode::Writeback
    } else {
        OutputMode::Stdout
    };
    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
    };

    let mut store = AnnotationStore::new();

    // Phase 1: ingest to end-of-stream before any rendering, so every file
    // sees its complete message set.
    let stats = if cli.command.is_empty() {
        pipeline::ingest(io::stdin().lock(), &mut store)?
    } else {
        let mut child = compiler::spawn(&cli.command)?;
        let stdout = child
            .stdout
            .take()
            .ok_or("compiler stdout was not captured")?;
        let stats = pipeline::ingest(BufReader::new(stdout), &mut store)?;
        let status = child.wait()?;
        if !status.success() {
            eprintln!("warning: compiler exited with {status}");
        }
        stats
    };

    if global.verbose {
        eprintln!(
            "   Recorded {} message(s) across {} file(s), skipped {} malformed line(s)",
            store.message_count(),
            store.file_count(),
            stats.skipped
        );
    }

    if !global.quiet && !store.is_empty() {
        eprintln!("   Rendering {} file(s)", store.file_count());
    }

    // Phase 2: render.
    pipeline::render_all(&store, &options, mode, &mut io::stdout().lock(), &global)
}
