//! Merge a pull request into the protected default branch

use std::path::Path;
use std::process::ExitCode;

use shipcheck::ShipcheckError;
use shipcheck::core::models::MergeMethod;
use shipcheck::core::ports::HostedRepository;
use shipcheck::core::services::assisted_merge;
use shipcheck::output::{MergeResult, OutputMode};
use shipcheck::probe::hosted::resolve_default_branch;
use shipcheck::workspace::Workspace;

/// Relax required approvals, merge, and restore them
pub fn merge(
    dir: &Path,
    pull_request: u64,
    method: MergeMethod,
    mode: OutputMode,
) -> anyhow::Result<ExitCode> {
    let workspace = Workspace::open(dir)?;
    let hosted = workspace.hosted();
    if !hosted.is_available() {
        return Err(ShipcheckError::ToolMissing("gh".to_string()).into());
    }

    let branch = resolve_default_branch(
        &hosted,
        workspace.git(),
        &workspace.rulebook().settings.fallback_branch,
    );
    let report = assisted_merge(&hosted, &branch, pull_request, method)?;

    MergeResult {
        success: true,
        report,
    }
    .render(mode);
    Ok(ExitCode::SUCCESS)
}
