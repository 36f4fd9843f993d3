//! Git integration adapter
//!
//! Implements [`VersionControl`] with libgit2. The repository is reopened
//! per query because `git2::Repository` is not `Sync`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use git2::{ErrorCode, Repository, Sort};
use log::debug;

use crate::core::models::Revision;
use crate::core::ports::VersionControl;
use crate::error::ShipcheckError;

const ORIGIN_HEAD: &str = "refs/remotes/origin/HEAD";
const ORIGIN_PREFIX: &str = "refs/remotes/origin/";

/// libgit2-backed version control
#[derive(Debug, Clone)]
pub struct GitRepository {
    root: PathBuf,
}

impl GitRepository {
    /// Find the work tree containing `start`
    pub fn discover(start: &Path) -> Result<Self, ShipcheckError> {
        let repo = Repository::discover(start)
            .map_err(|_| ShipcheckError::NotARepository(start.to_path_buf()))?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| ShipcheckError::NotARepository(start.to_path_buf()))?;
        let root = workdir.canonicalize()?;
        debug!("repository root: {}", root.display());
        Ok(Self { root })
    }

    /// Work tree root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn open(&self) -> anyhow::Result<Repository> {
        Repository::open(&self.root)
            .with_context(|| format!("cannot open repository at {}", self.root.display()))
    }
}

impl VersionControl for GitRepository {
    fn head_revision(&self) -> anyhow::Result<Revision> {
        let repo = self.open()?;
        let head = match repo.head() {
            Ok(head) => head,
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                return Err(ShipcheckError::NoRevision.into());
            },
            Err(e) => return Err(e.into()),
        };
        let commit = head.peel_to_commit()?;
        let short = commit.as_object().short_id()?;
        let short = short.as_str().context("abbreviated commit id is not valid UTF-8")?;
        Ok(Revision::new(commit.id().to_string(), short))
    }

    fn tracking_default_branch(&self) -> Option<String> {
        let repo = self.open().ok()?;
        let reference = repo.find_reference(ORIGIN_HEAD).ok()?;
        let target = reference.symbolic_target()?;
        target.strip_prefix(ORIGIN_PREFIX).map(str::to_string)
    }

    fn recent_commit_messages(&self, limit: usize) -> anyhow::Result<Vec<String>> {
        let repo = self.open()?;
        let mut walk = repo.revwalk()?;
        walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        walk.push_head()?;

        walk.take(limit)
            .map(|oid| -> anyhow::Result<String> {
                let commit = repo.find_commit(oid?)?;
                Ok(String::from_utf8_lossy(commit.message_bytes()).into_owned())
            })
            .collect()
    }

    fn has_remote(&self, name: &str) -> bool {
        self.open().is_ok_and(|repo| repo.find_remote(name).is_ok())
    }
}
