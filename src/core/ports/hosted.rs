//! Hosted repository port
//!
//! Defines the interface to the service hosting the repository (GitHub).

use crate::core::models::{BranchProtection, Issue, Job, MergeMethod, PrCheck, WorkflowRun};

/// Hosted repository abstraction
///
/// Query methods return `Ok(None)` when the host answered that the thing
/// does not exist, and `Err` when the host could not be asked or answered
/// with something unusable. Probes turn both into outcomes.
pub trait HostedRepository: Send + Sync {
    /// Whether the client tooling is installed at all
    fn is_available(&self) -> bool;

    /// Default branch from repository metadata
    fn default_branch(&self) -> anyhow::Result<Option<String>>;

    /// Protection rules on a branch (None when unprotected)
    fn branch_protection(&self, branch: &str) -> anyhow::Result<Option<BranchProtection>>;

    /// Most recent workflow run on a branch, optionally for one workflow
    fn latest_run(
        &self,
        branch: &str,
        workflow: Option<&str>,
    ) -> anyhow::Result<Option<WorkflowRun>>;

    /// Jobs of a workflow run
    fn run_jobs(&self, run_id: u64) -> anyhow::Result<Vec<Job>>;

    /// Checks on the pull request of the current branch (None when no PR)
    fn pull_request_checks(&self) -> anyhow::Result<Option<Vec<PrCheck>>>;

    /// First issue, open or closed, whose title contains `marker`
    fn find_issue(&self, marker: &str) -> anyhow::Result<Option<Issue>>;

    /// Set the required approving review count on a protected branch
    fn set_required_approvals(&self, branch: &str, count: u32) -> anyhow::Result<()>;

    /// Merge a pull request
    fn merge_pull_request(&self, number: u64, method: MergeMethod) -> anyhow::Result<()>;
}
