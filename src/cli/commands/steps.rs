//! List steps and their checks

use std::path::Path;
use std::process::ExitCode;

use shipcheck::output::{OutputMode, StepListReport};
use shipcheck::workspace::Workspace;

/// Print every step as it would run for the detected stack
pub fn steps(dir: &Path, mode: OutputMode) -> anyhow::Result<ExitCode> {
    let workspace = Workspace::open(dir)?;

    let steps = workspace
        .rulebook()
        .steps
        .iter()
        .map(|step| workspace.plan(&step.name))
        .collect::<Result<Vec<_>, _>>()?;

    StepListReport {
        stack: workspace.stack(),
        steps,
    }
    .render(mode);
    Ok(ExitCode::SUCCESS)
}
