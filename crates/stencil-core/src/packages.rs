//! Package-manager fetch run after an installation

use crate::error::{Result, StencilError};
use colored::Colorize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::info;

/// Run `command` (argv form) in `dir`, streaming its output to the terminal
///
/// An empty command is a no-op.
pub async fn run_fetch(command: &[String], dir: &Path) -> Result<()> {
    let Some((program, args)) = command.split_first() else {
        return Ok(());
    };
    let rendered = command.join(" ");

    println!("{} {}", "Running:".dimmed(), rendered.yellow());

    let status = Command::new(program)
        .args(args)
        .current_dir(dir)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|e| StencilError::PackageFetch {
            command: rendered.clone(),
            reason: e.to_string(),
        })?;

    if !status.success() {
        return Err(StencilError::PackageFetch {
            command: rendered,
            reason: format!("exit code {}", status.code().unwrap_or(-1)),
        });
    }

    info!(command = %rendered, "package fetch finished");
    Ok(())
}
