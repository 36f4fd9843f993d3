//! GitHub adapter
//!
//! Implements [`HostedRepository`] by running the `gh` client inside the
//! work tree, so repository and authentication come from the user's own
//! `gh` setup. Output is requested as JSON and parsed with serde.

use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::{Command, Output};

use anyhow::{Context, bail};
use log::debug;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::core::models::{BranchProtection, Issue, Job, MergeMethod, PrCheck, WorkflowRun};
use crate::core::ports::HostedRepository;

const GH: &str = "gh";
const RUN_FIELDS: &str = "databaseId,name,workflowName,status,conclusion,headBranch";
const ISSUE_SEARCH_LIMIT: &str = "100";

/// `gh`-backed hosted repository
#[derive(Debug, Clone)]
pub struct GhCli {
    root: PathBuf,
}

impl GhCli {
    /// Create a client that runs `gh` inside `root`
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn run<I, S>(&self, args: I) -> anyhow::Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(GH);
        command.args(args).current_dir(&self.root);
        debug!("running {command:?}");
        command.output().with_context(|| format!("cannot run {GH}"))
    }

    /// Run and parse stdout as JSON, failing on a non-zero exit
    fn json<T, I, S>(&self, args: I) -> anyhow::Result<T>
    where
        T: DeserializeOwned,
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = self.run(args)?;
        if !output.status.success() {
            bail!("{GH} failed: {}", stderr(&output));
        }
        serde_json::from_slice(&output.stdout).with_context(|| format!("unexpected {GH} output"))
    }

    fn succeed<I, S>(&self, args: I) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = self.run(args)?;
        if !output.status.success() {
            bail!("{GH} failed: {}", stderr(&output));
        }
        Ok(())
    }
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

/// Exact-phrase title search for a marker
fn issue_search(marker: &str) -> String {
    format!("\"{}\" in:title", marker.replace('"', ""))
}

fn protection_endpoint(branch: &str) -> String {
    format!("repos/{{owner}}/{{repo}}/branches/{branch}/protection")
}

impl HostedRepository for GhCli {
    fn is_available(&self) -> bool {
        match Command::new(GH).arg("--version").output() {
            Ok(output) => output.status.success(),
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    debug!("{GH} --version failed: {e}");
                }
                false
            },
        }
    }

    fn default_branch(&self) -> anyhow::Result<Option<String>> {
        let view: RepoView = self.json(["repo", "view", "--json", "defaultBranchRef"])?;
        Ok(view.default_branch_ref.map(|r| r.name).filter(|name| !name.is_empty()))
    }

    fn branch_protection(&self, branch: &str) -> anyhow::Result<Option<BranchProtection>> {
        let output = self.run(["api".to_string(), protection_endpoint(branch)])?;
        if output.status.success() {
            return parse_protection(&String::from_utf8_lossy(&output.stdout)).map(Some);
        }

        let message = stderr(&output);
        if message.contains("Branch not protected") || message.contains("HTTP 404") {
            debug!("branch '{branch}' is not protected: {message}");
            return Ok(None);
        }
        bail!("{GH} failed: {message}")
    }

    fn latest_run(
        &self,
        branch: &str,
        workflow: Option<&str>,
    ) -> anyhow::Result<Option<WorkflowRun>> {
        let mut args = vec!["run", "list", "--branch", branch, "--limit", "1", "--json", RUN_FIELDS];
        if let Some(workflow) = workflow {
            args.extend(["--workflow", workflow]);
        }
        let runs: Vec<WorkflowRun> = self.json(args)?;
        Ok(runs.into_iter().next())
    }

    fn run_jobs(&self, run_id: u64) -> anyhow::Result<Vec<Job>> {
        let view: RunView = self.json(["run", "view", &run_id.to_string(), "--json", "jobs"])?;
        Ok(view.jobs)
    }

    fn pull_request_checks(&self) -> anyhow::Result<Option<Vec<PrCheck>>> {
        let output = self.run(["pr", "checks", "--json", "name,state,bucket"])?;
        let message = stderr(&output);
        if message.contains("no pull requests found") {
            return Ok(None);
        }
        if message.contains("no checks reported") {
            return Ok(Some(Vec::new()));
        }
        // Non-zero exits also signal failing or pending checks; the JSON is still printed.
        parse_pr_checks(&output.stdout)
            .map(Some)
            .with_context(|| format!("{GH} pr checks failed: {message}"))
    }

    fn find_issue(&self, marker: &str) -> anyhow::Result<Option<Issue>> {
        let search = issue_search(marker);
        let issues: Vec<Issue> = self.json([
            "issue",
            "list",
            "--state",
            "all",
            "--search",
            &search,
            "--limit",
            ISSUE_SEARCH_LIMIT,
            "--json",
            "number,title,state",
        ])?;
        // Search is fuzzy; the title must contain the marker verbatim.
        Ok(issues.into_iter().find(|issue| issue.title.contains(marker)))
    }

    fn set_required_approvals(&self, branch: &str, count: u32) -> anyhow::Result<()> {
        self.succeed([
            "api".to_string(),
            "-X".to_string(),
            "PATCH".to_string(),
            format!("{}/required_pull_request_reviews", protection_endpoint(branch)),
            "-F".to_string(),
            format!("required_approving_review_count={count}"),
        ])
    }

    fn merge_pull_request(&self, number: u64, method: MergeMethod) -> anyhow::Result<()> {
        self.succeed(["pr", "merge", &number.to_string(), method.flag()])
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepoView {
    default_branch_ref: Option<NamedRef>,
}

#[derive(Deserialize)]
struct NamedRef {
    name: String,
}

#[derive(Deserialize)]
struct RunView {
    #[serde(default)]
    jobs: Vec<Job>,
}

#[derive(Deserialize)]
struct ProtectionResponse {
    #[serde(default)]
    required_status_checks: Option<StatusChecks>,
    #[serde(default)]
    enforce_admins: Option<Toggle>,
    #[serde(default)]
    required_pull_request_reviews: Option<Reviews>,
}

#[derive(Deserialize)]
struct StatusChecks {
    #[serde(default)]
    contexts: Vec<String>,
    #[serde(default)]
    checks: Vec<StatusCheck>,
}

#[derive(Deserialize)]
struct StatusCheck {
    context: String,
}

#[derive(Deserialize)]
struct Toggle {
    enabled: bool,
}

#[derive(Deserialize)]
struct Reviews {
    #[serde(default)]
    required_approving_review_count: u32,
}

/// Parse the branch protection REST payload
pub fn parse_protection(json: &str) -> anyhow::Result<BranchProtection> {
    let response: ProtectionResponse =
        serde_json::from_str(json).context("unexpected branch protection payload")?;

    let mut required_checks = Vec::new();
    if let Some(status) = response.required_status_checks {
        required_checks.extend(status.contexts);
        for check in status.checks {
            if !required_checks.contains(&check.context) {
                required_checks.push(check.context);
            }
        }
    }

    Ok(BranchProtection {
        required_checks,
        enforce_admins: response.enforce_admins.is_some_and(|t| t.enabled),
        required_approvals: response
            .required_pull_request_reviews
            .map(|r| r.required_approving_review_count),
    })
}

/// Parse `gh pr checks --json` output
pub fn parse_pr_checks(stdout: &[u8]) -> anyhow::Result<Vec<PrCheck>> {
    let text = String::from_utf8_lossy(stdout);
    if text.trim().is_empty() {
        bail!("no output");
    }
    serde_json::from_str(&text).context("unexpected pr checks payload")
}
