//! Hosted repository probes
//!
//! A host that cannot be asked (tool error, network, auth) yields
//! `Pending`: the condition is undetermined, not known to be false.

use log::debug;

use crate::core::models::{Job, Outcome, WorkflowRun};
use crate::core::ports::{HostedRepository, VersionControl};

/// Resolve the default branch
///
/// Priority: hosted repository metadata, then the local `origin/HEAD`
/// tracking ref, then `fallback`. No other names are guessed.
#[must_use]
pub fn resolve_default_branch(
    hosted: &dyn HostedRepository,
    vcs: &dyn VersionControl,
    fallback: &str,
) -> String {
    match hosted.default_branch() {
        Ok(Some(branch)) if !branch.is_empty() => {
            debug!("default branch '{branch}' from hosted metadata");
            return branch;
        },
        Ok(_) => debug!("hosted metadata has no default branch"),
        Err(err) => debug!("hosted metadata unavailable: {err:#}"),
    }

    if let Some(branch) = vcs.tracking_default_branch() {
        debug!("default branch '{branch}' from origin/HEAD");
        return branch;
    }

    debug!("default branch falls back to '{fallback}'");
    fallback.to_string()
}

/// An issue, open or closed, has a title containing `marker`
#[must_use]
pub fn handshake_issue(hosted: &dyn HostedRepository, marker: &str) -> Outcome {
    match hosted.find_issue(marker) {
        Ok(Some(issue)) => {
            debug!("handshake issue #{} ({})", issue.number, issue.state);
            Outcome::Pass
        },
        Ok(None) => Outcome::fail(format!("no issue title contains '{marker}'")),
        Err(err) => Outcome::pending(format!("cannot search issues: {err:#}")),
    }
}

/// The branch is protected with the requested rules
#[must_use]
pub fn branch_protection(
    hosted: &dyn HostedRepository,
    branch: &str,
    required_check: Option<&str>,
    enforce_admins: bool,
    min_approvals: Option<u32>,
) -> Outcome {
    let protection = match hosted.branch_protection(branch) {
        Ok(Some(protection)) => protection,
        Ok(None) => return Outcome::fail(format!("branch '{branch}' is not protected")),
        Err(err) => return Outcome::pending(format!("cannot read protection of '{branch}': {err:#}")),
    };

    let mut problems = Vec::new();
    if let Some(check) = required_check
        && !protection.required_checks.iter().any(|c| c == check)
    {
        problems.push(format!("status check '{check}' is not required"));
    }
    if enforce_admins && !protection.enforce_admins {
        problems.push("rules are not enforced for administrators".to_string());
    }
    if let Some(min) = min_approvals {
        let actual = protection.required_approvals.unwrap_or(0);
        if actual < min {
            problems.push(format!("{actual} approval(s) required, need at least {min}"));
        }
    }

    Outcome::pass_or_fail(problems.is_empty(), || format!("'{branch}': {}", problems.join("; ")))
}

/// The most recent run on the branch concluded successfully
#[must_use]
pub fn ci_green(hosted: &dyn HostedRepository, branch: &str, workflow: Option<&str>) -> Outcome {
    match latest_run(hosted, branch, workflow) {
        Ok(run) => run.outcome(),
        Err(outcome) => outcome,
    }
}

/// The most recent run on the branch has a successful job named `name`
///
/// Matrix jobs such as `test (3.12)` count for `test`; every matching job
/// must succeed.
#[must_use]
pub fn ci_job(
    hosted: &dyn HostedRepository,
    branch: &str,
    name: &str,
    workflow: Option<&str>,
) -> Outcome {
    let run = match latest_run(hosted, branch, workflow) {
        Ok(run) => run,
        Err(outcome) => return outcome,
    };

    let jobs = match hosted.run_jobs(run.id) {
        Ok(jobs) => jobs,
        Err(err) => return Outcome::pending(format!("cannot list jobs of run {}: {err:#}", run.id)),
    };

    let matrix_prefix = format!("{name} (");
    let outcomes: Vec<Outcome> = jobs
        .iter()
        .filter(|job| job.name == name || job.name.starts_with(&matrix_prefix))
        .map(Job::outcome)
        .collect();

    if outcomes.is_empty() {
        return if run.status == "completed" {
            Outcome::fail(format!("run {} has no job '{name}'", run.id))
        } else {
            Outcome::pending(format!("run {} has not started job '{name}' yet", run.id))
        };
    }

    outcomes
        .iter()
        .find(|o| matches!(o, Outcome::Fail { .. }))
        .or_else(|| outcomes.iter().find(|o| matches!(o, Outcome::Pending { .. })))
        .cloned()
        .unwrap_or(Outcome::Pass)
}

/// Every check on the current branch's pull request is green
#[must_use]
pub fn pr_checks_green(hosted: &dyn HostedRepository) -> Outcome {
    let checks = match hosted.pull_request_checks() {
        Ok(Some(checks)) => checks,
        Ok(None) => return Outcome::pending("no pull request for the current branch"),
        Err(err) => return Outcome::pending(format!("cannot read pull request checks: {err:#}")),
    };

    if checks.is_empty() {
        return Outcome::pending("pull request has no checks reported yet");
    }

    let failing: Vec<&str> = checks
        .iter()
        .filter(|c| matches!(c.bucket.as_str(), "fail" | "cancel"))
        .map(|c| c.name.as_str())
        .collect();
    if !failing.is_empty() {
        return Outcome::fail(format!("failing checks: {}", failing.join(", ")));
    }

    // Only settled buckets count as green; anything unrecognised waits.
    let waiting: Vec<&str> = checks
        .iter()
        .filter(|c| !matches!(c.bucket.as_str(), "pass" | "skipping"))
        .map(|c| c.name.as_str())
        .collect();
    if !waiting.is_empty() {
        return Outcome::pending(format!("checks still running: {}", waiting.join(", ")));
    }

    Outcome::Pass
}

/// Fetch the latest run, mapping "no run" and host errors to pending
fn latest_run(
    hosted: &dyn HostedRepository,
    branch: &str,
    workflow: Option<&str>,
) -> Result<WorkflowRun, Outcome> {
    match hosted.latest_run(branch, workflow) {
        Ok(Some(run)) => Ok(run),
        Ok(None) => Err(Outcome::pending(format!("no CI run on '{branch}' yet"))),
        Err(err) => Err(Outcome::pending(format!("cannot list CI runs on '{branch}': {err:#}"))),
    }
}
