//! Hosted repository state
//!
//! Typed records for what the hosted repository reports: branch protection,
//! workflow runs and their jobs, pull request checks and issues. Field names
//! follow the JSON emitted by `gh ... --json`.

use serde::{Deserialize, Serialize};

use super::Outcome;

/// Run statuses that mean "not finished yet"
const UNFINISHED_STATUSES: &[&str] =
    &["queued", "in_progress", "waiting", "requested", "pending", "action_required"];

/// Protection rules on a branch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchProtection {
    /// Status checks required before merging
    pub required_checks: Vec<String>,
    /// Whether rules also apply to administrators
    pub enforce_admins: bool,
    /// Required approving review count, if reviews are required at all
    pub required_approvals: Option<u32>,
}

/// A CI workflow run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRun {
    /// Run ID
    #[serde(rename = "databaseId")]
    pub id: u64,
    /// Run display name
    #[serde(default)]
    pub name: String,
    /// Workflow name
    #[serde(default)]
    pub workflow_name: String,
    /// Lifecycle status, e.g. `queued`, `in_progress`, `completed`
    pub status: String,
    /// Conclusion once completed, e.g. `success`, `failure`; empty before
    #[serde(default)]
    pub conclusion: String,
    /// Branch the run was triggered for
    #[serde(default)]
    pub head_branch: String,
}

impl WorkflowRun {
    /// Classify the run
    ///
    /// Completed and successful is a pass, completed with any other
    /// conclusion is a failure, anything still running is pending.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        classify(&self.label(), &self.status, &self.conclusion)
    }

    fn label(&self) -> String {
        let name = if self.workflow_name.is_empty() {
            &self.name
        } else {
            &self.workflow_name
        };
        format!("run {} ({name})", self.id)
    }
}

/// A job within a workflow run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Job name
    pub name: String,
    /// Lifecycle status
    pub status: String,
    /// Conclusion once completed
    #[serde(default)]
    pub conclusion: String,
}

impl Job {
    /// Classify the job with the same rules as a run
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        classify(&format!("job '{}'", self.name), &self.status, &self.conclusion)
    }
}

/// A check reported on a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrCheck {
    /// Check name
    pub name: String,
    /// Raw state reported by the host
    #[serde(default)]
    pub state: String,
    /// Normalized bucket: `pass`, `fail`, `pending`, `skipping` or `cancel`
    pub bucket: String,
}

/// An issue in the hosted repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number
    pub number: u64,
    /// Issue title
    pub title: String,
    /// `OPEN` or `CLOSED`
    pub state: String,
}

/// How a pull request is merged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    /// Squash all commits into one
    #[default]
    Squash,
    /// Create a merge commit
    Merge,
    /// Rebase commits onto the base branch
    Rebase,
}

impl MergeMethod {
    /// The matching `gh pr merge` flag
    #[must_use]
    pub const fn flag(self) -> &'static str {
        match self {
            Self::Squash => "--squash",
            Self::Merge => "--merge",
            Self::Rebase => "--rebase",
        }
    }
}

impl std::str::FromStr for MergeMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "squash" => Ok(Self::Squash),
            "merge" => Ok(Self::Merge),
            "rebase" => Ok(Self::Rebase),
            _ => Err(format!("Invalid merge method: {s}. Use: squash, merge, rebase")),
        }
    }
}

fn classify(label: &str, status: &str, conclusion: &str) -> Outcome {
    if status == "completed" {
        match conclusion {
            "success" => Outcome::Pass,
            "" => Outcome::fail(format!("{label} completed without a conclusion")),
            other => Outcome::fail(format!("{label} concluded '{other}'")),
        }
    } else if UNFINISHED_STATUSES.contains(&status) {
        Outcome::pending(format!("{label} is {status}"))
    } else {
        Outcome::pending(format!("{label} has unrecognized status '{status}'"))
    }
}
