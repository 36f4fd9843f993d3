//! Delete proofs

use std::path::Path;
use std::process::ExitCode;

use shipcheck::output::{OperationResult, OutputMode};
use shipcheck::workspace::Workspace;

/// Delete the proof of one step, or every proof
pub fn reset(dir: &Path, step: Option<&str>, mode: OutputMode) -> anyhow::Result<ExitCode> {
    let workspace = Workspace::open(dir)?;
    let removed = workspace.reset(step)?;

    let message = match (step, removed) {
        (Some(name), 0) => format!("No proof for '{name}'."),
        (Some(name), _) => format!("Removed proof for '{name}'."),
        (None, count) => format!("Removed {count} proof(s)."),
    };
    OperationResult::ok(message).render(mode);
    Ok(ExitCode::SUCCESS)
}
