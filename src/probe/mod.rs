//! External state probes
//!
//! [`Probe`] answers every [`Predicate`] kind by dispatching to:
//!
//! - [`files`] - working tree presence, patterns and structured keys
//! - [`history`] - git remotes and handshake commits
//! - [`hosted`] - GitHub metadata, CI runs, protection, issues, PR checks
//!
//! Probes never abort a run. Anything that goes wrong while answering
//! becomes a `Fail` or `Pending` outcome for that one check.

use std::cell::OnceCell;
use std::fmt;
use std::path::Path;

use crate::core::models::{Outcome, Predicate, Revision};
use crate::core::ports::{CheckEvaluator, HostedRepository, VersionControl};
use crate::rulebook::Settings;
use crate::storage::{ProofState, ProofStore};

pub mod files;
pub mod history;
pub mod hosted;

#[cfg(test)]
pub mod fake;

/// Read-only context shared by every check of one run
pub struct Probe<'a> {
    root: &'a Path,
    vcs: &'a dyn VersionControl,
    hosted: &'a dyn HostedRepository,
    proofs: &'a ProofStore,
    settings: &'a Settings,
    revision: &'a Revision,
    default_branch: OnceCell<String>,
}

impl<'a> Probe<'a> {
    /// Create a probe for one run at `revision`
    #[must_use]
    pub const fn new(
        root: &'a Path,
        vcs: &'a dyn VersionControl,
        hosted: &'a dyn HostedRepository,
        proofs: &'a ProofStore,
        settings: &'a Settings,
        revision: &'a Revision,
    ) -> Self {
        Self {
            root,
            vcs,
            hosted,
            proofs,
            settings,
            revision,
            default_branch: OnceCell::new(),
        }
    }

    /// The default branch, resolved once per run
    pub fn default_branch(&self) -> &str {
        self.default_branch.get_or_init(|| {
            hosted::resolve_default_branch(self.hosted, self.vcs, &self.settings.fallback_branch)
        })
    }

    /// Dependency gate: a current proof exists for `step`
    fn gate(&self, step: &str) -> Outcome {
        match self.proofs.check_stale(step, self.revision) {
            Ok(ProofState::Current(_)) => Outcome::Pass,
            Ok(ProofState::Stale { stored }) => Outcome::fail(format!(
                "proof for '{step}' was issued at {stored} but HEAD is {}; re-run `shipcheck verify {step}`",
                self.revision
            )),
            Ok(ProofState::Missing) => Outcome::fail(format!(
                "step '{step}' has not been verified; run `shipcheck verify {step}`"
            )),
            Err(err) => Outcome::fail(format!("cannot read proof for '{step}': {err}")),
        }
    }
}

impl CheckEvaluator for Probe<'_> {
    fn evaluate(&self, predicate: &Predicate) -> Outcome {
        let root = self.root;
        match predicate {
            Predicate::FileExists { path } => files::file_exists(root, path),
            Predicate::DirExists { path } => files::dir_exists(root, path),
            Predicate::AnyFileExists { paths } => files::any_file_exists(root, paths),
            Predicate::GlobMatches { pattern } => files::glob_matches(root, pattern),
            Predicate::FileContains { path, pattern } => files::file_contains(root, path, pattern),
            Predicate::YamlKey { path, key } => files::has_key(root, path, key, files::Format::Yaml),
            Predicate::JsonKey { path, key } => files::has_key(root, path, key, files::Format::Json),
            Predicate::TomlKey { path, key } => files::has_key(root, path, key, files::Format::Toml),
            Predicate::GitRemote { name } => history::git_remote(self.vcs, name),
            Predicate::HandshakeCommit { marker } => {
                history::handshake_commit(self.vcs, marker, self.settings.history_depth)
            },
            Predicate::HandshakeIssue { marker } => hosted::handshake_issue(self.hosted, marker),
            Predicate::BranchProtection {
                required_check,
                enforce_admins,
                min_approvals,
            } => hosted::branch_protection(
                self.hosted,
                self.default_branch(),
                required_check.as_deref(),
                *enforce_admins,
                *min_approvals,
            ),
            Predicate::CiGreen { workflow } => {
                hosted::ci_green(self.hosted, self.default_branch(), workflow.as_deref())
            },
            Predicate::CiJob { name, workflow } => {
                hosted::ci_job(self.hosted, self.default_branch(), name, workflow.as_deref())
            },
            Predicate::PrChecksGreen => hosted::pr_checks_green(self.hosted),
            Predicate::ProofExists { step } => self.gate(step),
        }
    }
}

impl fmt::Debug for Probe<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Probe")
            .field("root", &self.root)
            .field("proofs", &self.proofs)
            .field("revision", &self.revision)
            .field("default_branch", &self.default_branch.get())
            .finish_non_exhaustive()
    }
}
