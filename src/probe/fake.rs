//! Configurable in-memory hosted repository for tests

use std::sync::Mutex;

use crate::core::models::{BranchProtection, Issue, Job, MergeMethod, PrCheck, WorkflowRun};
use crate::core::ports::HostedRepository;

/// In-memory [`HostedRepository`] that records mutating calls
#[derive(Debug, Default)]
pub struct FakeHosted {
    /// Pretend the client tooling is not installed
    pub missing_tool: bool,
    /// Every query fails as if the host were unreachable
    pub failing: bool,
    /// Default branch from metadata
    pub default_branch: Option<String>,
    /// Protection of any branch
    pub protection: Option<BranchProtection>,
    /// Runs, newest first
    pub runs: Vec<WorkflowRun>,
    /// Jobs of any run
    pub jobs: Vec<Job>,
    /// Checks of the current branch's pull request
    pub pr_checks: Option<Vec<PrCheck>>,
    /// All issues
    pub issues: Vec<Issue>,
    /// Merges fail
    pub merge_fails: bool,
    /// Log of mutating calls
    pub log: Mutex<Vec<String>>,
}

impl FakeHosted {
    /// Recorded mutating calls
    pub fn calls(&self) -> Vec<String> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    fn record(&self, call: String) {
        if let Ok(mut log) = self.log.lock() {
            log.push(call);
        }
    }

    fn reachable(&self) -> anyhow::Result<()> {
        if self.failing {
            anyhow::bail!("gh: could not resolve host github.com");
        }
        Ok(())
    }
}

impl HostedRepository for FakeHosted {
    fn is_available(&self) -> bool {
        !self.missing_tool
    }

    fn default_branch(&self) -> anyhow::Result<Option<String>> {
        self.reachable()?;
        Ok(self.default_branch.clone())
    }

    fn branch_protection(&self, _branch: &str) -> anyhow::Result<Option<BranchProtection>> {
        self.reachable()?;
        Ok(self.protection.clone())
    }

    fn latest_run(
        &self,
        _branch: &str,
        workflow: Option<&str>,
    ) -> anyhow::Result<Option<WorkflowRun>> {
        self.reachable()?;
        Ok(self
            .runs
            .iter()
            .find(|run| workflow.is_none_or(|w| run.workflow_name == w))
            .cloned())
    }

    fn run_jobs(&self, _run_id: u64) -> anyhow::Result<Vec<Job>> {
        self.reachable()?;
        Ok(self.jobs.clone())
    }

    fn pull_request_checks(&self) -> anyhow::Result<Option<Vec<PrCheck>>> {
        self.reachable()?;
        Ok(self.pr_checks.clone())
    }

    fn find_issue(&self, marker: &str) -> anyhow::Result<Option<Issue>> {
        self.reachable()?;
        Ok(self.issues.iter().find(|issue| issue.title.contains(marker)).cloned())
    }

    fn set_required_approvals(&self, branch: &str, count: u32) -> anyhow::Result<()> {
        self.record(format!("set_required_approvals {branch} {count}"));
        Ok(())
    }

    fn merge_pull_request(&self, number: u64, method: MergeMethod) -> anyhow::Result<()> {
        self.record(format!("merge {number} {}", method.flag()));
        if self.merge_fails {
            anyhow::bail!("Pull request #{number} is not mergeable");
        }
        Ok(())
    }
}
