//! Show proof state of every step

use std::path::Path;
use std::process::ExitCode;

use shipcheck::output::{OutputMode, StatusReport, StepStatus};
use shipcheck::workspace::Workspace;

/// Report which steps are verified at the current revision
pub fn status(dir: &Path, mode: OutputMode) -> anyhow::Result<ExitCode> {
    let workspace = Workspace::open(dir)?;
    let revision = workspace.revision()?;

    let steps = workspace
        .proof_states()?
        .into_iter()
        .enumerate()
        .map(|(index, (name, state))| {
            let title = workspace
                .rulebook()
                .step(&name)
                .and_then(|s| s.title.clone())
                .unwrap_or_else(|| name.clone());
            StepStatus::new(index + 1, name, title, state)
        })
        .collect();

    StatusReport {
        revision: revision.short,
        stack: workspace.stack(),
        steps,
    }
    .render(mode);
    Ok(ExitCode::SUCCESS)
}
