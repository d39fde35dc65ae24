//! Spawning the compiler whose stdout supplies the diagnostic stream.

use std::process::{Child, Command, Stdio};

/// Spawns the given command with stdout piped for ingestion.
///
/// The command is taken verbatim: the first element is the program, the rest
/// are its arguments. Stderr is inherited so compile errors remain visible
/// alongside optview's own warnings.
pub fn spawn(command: &[String]) -> Result<Child, Box<dyn std::error::Error>> {
    let (program, args) = command.split_first().ok_or("empty compiler command")?;
    let child = Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| format!("failed to run `{program}`: {e}"))?;
    Ok(child)
}
