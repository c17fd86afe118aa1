use std::io::Write;
use std::process::{Command, Stdio};

use tracing::{debug, info, warn};

use super::ExportError;
use crate::config::PrintConfig;
use crate::domain::GoalPlan;
use crate::render::{RenderMode, render_plan};

/// Where a printed plan went
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintOutcome {
    /// Piped to the named print command
    Sent(String),
    /// Written to stdout
    Stdout,
}

/// Print the plan's print rendering
///
/// With a configured command the rendering is piped to its stdin, otherwise
/// it goes to stdout.
pub fn print_plan(plan: &GoalPlan, config: &PrintConfig) -> Result<PrintOutcome, ExportError> {
    debug!(command = ?config.command, "print_plan: called");
    let rendering = render_plan(plan, RenderMode::Print);

    match config.command.as_deref() {
        Some([program, args @ ..]) => {
            pipe_to_command(program, args, &rendering)?;
            info!("Sent plan '{}' to {}", plan.title, program);
            Ok(PrintOutcome::Sent(program.clone()))
        }
        _ => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendering.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|source| ExportError::Print {
                    command: "stdout".to_string(),
                    source,
                })?;
            Ok(PrintOutcome::Stdout)
        }
    }
}

fn pipe_to_command(program: &str, args: &[String], text: &str) -> Result<(), ExportError> {
    debug!(%program, ?args, "pipe_to_command: called");
    let io_err = |source| ExportError::Print {
        command: program.to_string(),
        source,
    };

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(io_err)?;

    // A command that exits without reading is judged by its exit status
    if let Some(mut stdin) = child.stdin.take()
        && let Err(e) = stdin.write_all(text.as_bytes())
        && e.kind() != std::io::ErrorKind::BrokenPipe
    {
        return Err(io_err(e));
    }

    let output = child.wait_with_output().map_err(io_err)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        warn!(%program, status = ?output.status.code(), %stderr, "pipe_to_command: print command failed");
        return Err(ExportError::PrintCommandFailed {
            command: program.to_string(),
            code: output.status.code(),
            stderr,
        });
    }
    Ok(())
}
