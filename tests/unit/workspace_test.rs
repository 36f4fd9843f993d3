//! Tests for verifying steps through a workspace
//!
//! The hosted repository is replaced by a scripted implementation so the
//! tests run without network or the `gh` client.

use serial_test::serial;
use shipcheck::ShipcheckError;
use shipcheck::core::models::{
    BranchProtection, Issue, Job, MergeMethod, Outcome, PrCheck, WorkflowRun,
};
use shipcheck::core::ports::HostedRepository;
use shipcheck::workspace::Workspace;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Hosted repository with a fixed latest run
struct ScriptedHost {
    installed: bool,
    run: Option<WorkflowRun>,
}

impl ScriptedHost {
    fn with_run(status: &str, conclusion: &str) -> Self {
        Self {
            installed: true,
            run: Some(WorkflowRun {
                id: 7,
                name: "push".to_string(),
                workflow_name: "CI".to_string(),
                status: status.to_string(),
                conclusion: conclusion.to_string(),
                head_branch: "main".to_string(),
            }),
        }
    }
}

impl HostedRepository for ScriptedHost {
    fn is_available(&self) -> bool {
        self.installed
    }

    fn default_branch(&self) -> anyhow::Result<Option<String>> {
        Ok(Some("main".to_string()))
    }

    fn branch_protection(&self, _branch: &str) -> anyhow::Result<Option<BranchProtection>> {
        Ok(None)
    }

    fn latest_run(
        &self,
        _branch: &str,
        _workflow: Option<&str>,
    ) -> anyhow::Result<Option<WorkflowRun>> {
        Ok(self.run.clone())
    }

    fn run_jobs(&self, _run_id: u64) -> anyhow::Result<Vec<Job>> {
        Ok(Vec::new())
    }

    fn pull_request_checks(&self) -> anyhow::Result<Option<Vec<PrCheck>>> {
        Ok(None)
    }

    fn find_issue(&self, _marker: &str) -> anyhow::Result<Option<Issue>> {
        Ok(None)
    }

    fn set_required_approvals(&self, _branch: &str, _count: u32) -> anyhow::Result<()> {
        anyhow::bail!("read-only")
    }

    fn merge_pull_request(&self, _number: u64, _method: MergeMethod) -> anyhow::Result<()> {
        anyhow::bail!("read-only")
    }
}

const RULEBOOK: &str = r#"
[[step]]
name = "basics"

[[step.check]]
description = "README present"
kind = "file_exists"
path = "README.md"

[[step]]
name = "ci"
short_circuit = true

[[step.check]]
description = "Latest CI run succeeded"
kind = "ci_green"
"#;

fn commit_all(repo: &git2::Repository, message: &str) {
    let mut index = repo.index().unwrap();
    index.add_all(["*"], git2::IndexAddOption::DEFAULT, None).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = git2::Signature::now("Test", "test@example.com").unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents).unwrap();
}

fn setup() -> (TempDir, git2::Repository) {
    let temp = TempDir::new().unwrap();
    let repo = git2::Repository::init(temp.path()).unwrap();
    fs::write(temp.path().join(".shipcheck.toml"), RULEBOOK).unwrap();
    fs::write(temp.path().join("README.md"), "# widget\n").unwrap();
    commit_all(&repo, "Initial commit");
    (temp, repo)
}

fn open(path: &Path) -> Workspace {
    Workspace::open(path).unwrap()
}

#[test]
fn test_chain_with_green_ci() {
    let (temp, _repo) = setup();
    let workspace = open(temp.path());
    let host = ScriptedHost::with_run("completed", "success");

    let (_, basics) = workspace.verify("basics", &host).unwrap();
    assert!(basics.proof.is_some());

    let (plan, ci) = workspace.verify("ci", &host).unwrap();
    assert_eq!(plan.checks.len(), 2);
    assert!(ci.result.all_passed());
    assert_eq!(ci.proof.unwrap().ratio, "2/2");
}

#[test]
fn test_pending_ci_leaves_no_proof() {
    let (temp, _repo) = setup();
    let workspace = open(temp.path());
    let host = ScriptedHost::with_run("queued", "");

    workspace.verify("basics", &host).unwrap();
    let (_, ci) = workspace.verify("ci", &host).unwrap();

    assert_eq!(ci.result.pending, 1);
    assert!(ci.proof.is_none());
    assert!(!workspace.proofs().exists("ci"));
}

#[test]
fn test_short_circuit_blocks_hosted_checks() {
    let (temp, _repo) = setup();
    let workspace = open(temp.path());
    let host = ScriptedHost::with_run("completed", "success");

    let (_, ci) = workspace.verify("ci", &host).unwrap();

    assert_eq!(ci.result.failed, 2);
    assert!(matches!(
        &ci.result.results[1].outcome,
        Outcome::Fail { reason } if reason.contains("blocked")
    ));
}

#[test]
fn test_missing_client_is_hard_error_for_hosted_steps() {
    let (temp, _repo) = setup();
    let workspace = open(temp.path());
    let host = ScriptedHost {
        installed: false,
        run: None,
    };

    assert!(workspace.verify("basics", &host).is_ok());
    let err = workspace.verify("ci", &host).unwrap_err();
    assert!(matches!(err, ShipcheckError::ToolMissing(tool) if tool == "gh"));
}

#[test]
fn test_new_commit_invalidates_proofs() {
    let (temp, repo) = setup();
    let workspace = open(temp.path());
    let host = ScriptedHost::with_run("completed", "success");
    workspace.verify("basics", &host).unwrap();

    fs::write(temp.path().join("NOTES.md"), "handshake\n").unwrap();
    commit_all(&repo, "chore: handshake");

    let states = workspace.proof_states().unwrap();
    assert_eq!(states[0].1.label(), "stale");
    assert_eq!(states[1].1.label(), "missing");
    assert_eq!(workspace.reset(None).unwrap(), 0);
}

#[test]
fn test_reset_unknown_step() {
    let (temp, _repo) = setup();
    let workspace = open(temp.path());

    let err = workspace.reset(Some("deploy")).unwrap_err();

    assert!(matches!(err, ShipcheckError::UnknownStep(_)));
}

#[test]
#[serial]
fn test_open_relative_to_current_dir() {
    let (temp, _repo) = setup();
    fs::create_dir_all(temp.path().join("src")).unwrap();
    let original = std::env::current_dir().unwrap();

    std::env::set_current_dir(temp.path().join("src")).unwrap();
    let opened = Workspace::open(Path::new("."));
    std::env::set_current_dir(original).unwrap();

    let workspace = opened.unwrap();
    assert_eq!(workspace.root(), temp.path().canonicalize().unwrap());
    assert_eq!(workspace.rulebook().steps.len(), 2);
}
