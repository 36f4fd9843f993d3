//! Proof file storage
//!
//! Stores one pretty-printed JSON proof per step, like git refs:
//! - `.shipcheck/proofs/verify-<step>.proof` - proof data
//! - `.shipcheck/proofs/.gitignore` - keeps proofs out of version control
//!
//! Proofs are deleted as soon as they can no longer be trusted, so a proof
//! that can be read is always one that was issued at the current revision
//! or has not been checked against it yet.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::core::models::{ProofToken, Revision};
use crate::error::ShipcheckError;
use crate::paths;

/// State of a step's proof relative to the current revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProofState {
    /// No proof on disk
    Missing,
    /// A proof existed but was issued at another revision (or was
    /// unreadable) and has been deleted
    Stale {
        /// Revision recorded in the deleted proof
        stored: String,
    },
    /// The proof matches the current revision
    Current(ProofToken),
}

impl ProofState {
    /// Whether a trustworthy proof exists
    #[must_use]
    pub const fn is_current(&self) -> bool {
        matches!(self, Self::Current(_))
    }

    /// Short label for reports
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Stale { .. } => "stale",
            Self::Current(_) => "verified",
        }
    }
}

/// Directory of proof files
#[derive(Debug, Clone)]
pub struct ProofStore {
    dir: PathBuf,
}

impl ProofStore {
    /// Create a store rooted at a proof directory
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The proof directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a step's proof file
    #[must_use]
    pub fn path_for(&self, step: &str) -> PathBuf {
        self.dir.join(paths::proof_file_name(step))
    }

    /// Create the proof directory and its ignore rule if absent
    pub fn ensure_dir(&self) -> Result<(), ShipcheckError> {
        fs::create_dir_all(&self.dir)?;
        let gitignore = self.dir.join(".gitignore");
        if !gitignore.exists() {
            fs::write(&gitignore, paths::PROOF_DIR_GITIGNORE)?;
            debug!("created {}", gitignore.display());
        }
        Ok(())
    }

    /// Write a proof for a fully passing step
    ///
    /// Overwrites any existing proof for the step. A run with no checks
    /// proves nothing and is refused like a partial pass.
    pub fn write(
        &self,
        step: &str,
        passed: usize,
        total: usize,
        revision: &Revision,
    ) -> Result<ProofToken, ShipcheckError> {
        if total == 0 || passed != total {
            return Err(ShipcheckError::IncompleteProof {
                step: step.to_string(),
                passed,
                total,
            });
        }

        self.ensure_dir()?;
        let proof = ProofToken::issue(step, passed, total, revision);
        let path = self.path_for(step);
        fs::write(&path, serde_json::to_string_pretty(&proof)?)?;
        debug!("wrote proof {} ({})", path.display(), proof.token);
        Ok(proof)
    }

    /// Read a step's proof without validating it
    pub fn read(&self, step: &str) -> Result<Option<ProofToken>, ShipcheckError> {
        let path = self.path_for(step);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Whether a proof file exists for a step
    #[must_use]
    pub fn exists(&self, step: &str) -> bool {
        self.path_for(step).is_file()
    }

    /// Validate a step's proof against the current revision
    ///
    /// A proof issued at another revision, or one that cannot be parsed,
    /// is deleted and reported as stale.
    pub fn check_stale(
        &self,
        step: &str,
        current: &Revision,
    ) -> Result<ProofState, ShipcheckError> {
        let proof = match self.read(step) {
            Ok(None) => return Ok(ProofState::Missing),
            Ok(Some(proof)) => proof,
            Err(ShipcheckError::Json(err)) => {
                info!("removing unreadable proof for '{step}': {err}");
                self.remove(step)?;
                return Ok(ProofState::Stale {
                    stored: "unreadable".to_string(),
                });
            },
            Err(err) => return Err(err),
        };

        if proof.matches_revision(current) {
            return Ok(ProofState::Current(proof));
        }

        info!(
            "removing stale proof for '{step}': issued at {}, repository is at {current}",
            proof.revision
        );
        self.remove(step)?;
        Ok(ProofState::Stale {
            stored: proof.revision,
        })
    }

    /// Delete a step's proof; returns whether one existed
    pub fn remove(&self, step: &str) -> Result<bool, ShipcheckError> {
        let path = self.path_for(step);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        debug!("removed proof {}", path.display());
        Ok(true)
    }

    /// Steps that currently have a proof file, sorted by name
    pub fn list(&self) -> Result<Vec<String>, ShipcheckError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut steps = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let name = entry?.file_name();
            if let Some(step) = paths::step_from_proof_file(&name.to_string_lossy()) {
                steps.push(step.to_string());
            }
        }
        steps.sort();
        Ok(steps)
    }

    /// Delete every proof; returns how many were removed
    ///
    /// The directory and its ignore rule are kept.
    pub fn clear(&self) -> Result<usize, ShipcheckError> {
        let mut removed = 0;
        for step in self.list()? {
            if self.remove(&step)? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
