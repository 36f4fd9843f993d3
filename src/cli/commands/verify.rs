//! Verify one step

use std::path::Path;
use std::process::ExitCode;

use log::debug;

use shipcheck::output::{OutputMode, VerifyReport};
use shipcheck::workspace::Workspace;

/// Run every check of a step; exit 0 only when all of them passed
pub fn verify(dir: &Path, step: &str, mode: OutputMode) -> anyhow::Result<ExitCode> {
    let workspace = Workspace::open(dir)?;
    let hosted = workspace.hosted();

    let (plan, run) = workspace.verify(step, &hosted)?;
    debug!("step '{step}' finished: {}", run.result.ratio());

    let revision = workspace.revision()?;
    let proof_path = workspace.proofs().path_for(step);
    let shown = proof_path.strip_prefix(workspace.root()).unwrap_or(&proof_path);

    let report = VerifyReport::new(&plan, run, &revision.short, shown.display().to_string());
    report.render(mode);

    Ok(if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
