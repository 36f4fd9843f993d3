//! Workspace - one repository opened for verification
//!
//! Ties the work tree, its rulebook, its proof store and its git state
//! together so commands only deal with step names.

use std::path::Path;

use log::debug;

use crate::adapters::{GhCli, GitRepository};
use crate::core::models::{Revision, Stack};
use crate::core::ports::{HostedRepository, VersionControl};
use crate::core::services::{StepPlan, StepRun, verify_step};
use crate::error::ShipcheckError;
use crate::paths;
use crate::probe::Probe;
use crate::rulebook::Rulebook;
use crate::storage::{ProofState, ProofStore};

/// An opened repository
#[derive(Debug)]
pub struct Workspace {
    git: GitRepository,
    rulebook: Rulebook,
    proofs: ProofStore,
    stack: Stack,
}

impl Workspace {
    /// Open the repository containing `start` and load its rulebook
    pub fn open(start: &Path) -> Result<Self, ShipcheckError> {
        let git = GitRepository::discover(start)?;
        let rulebook = Rulebook::load(git.root())?;
        let proofs = ProofStore::new(paths::proof_dir(git.root(), &rulebook.settings.proof_dir));
        let stack = Stack::detect(git.root());
        debug!("detected stack: {stack}");

        Ok(Self {
            git,
            rulebook,
            proofs,
            stack,
        })
    }

    /// Work tree root
    #[must_use]
    pub fn root(&self) -> &Path {
        self.git.root()
    }

    /// The loaded rulebook
    #[must_use]
    pub const fn rulebook(&self) -> &Rulebook {
        &self.rulebook
    }

    /// The proof store
    #[must_use]
    pub const fn proofs(&self) -> &ProofStore {
        &self.proofs
    }

    /// Detected project stack
    #[must_use]
    pub const fn stack(&self) -> Stack {
        self.stack
    }

    /// Local git state
    #[must_use]
    pub const fn git(&self) -> &GitRepository {
        &self.git
    }

    /// The hosted repository client for this work tree
    #[must_use]
    pub fn hosted(&self) -> GhCli {
        GhCli::new(self.root().to_path_buf())
    }

    /// The commit HEAD points at
    pub fn revision(&self) -> Result<Revision, ShipcheckError> {
        self.git.head_revision().map_err(|err| {
            let err = match err.downcast::<ShipcheckError>() {
                Ok(typed) => return typed,
                Err(other) => other,
            };
            match err.downcast::<git2::Error>() {
                Ok(git) => ShipcheckError::Git(git),
                Err(other) => {
                    debug!("cannot resolve HEAD: {other:#}");
                    ShipcheckError::NoRevision
                },
            }
        })
    }

    /// Resolve a step for the detected stack
    pub fn plan(&self, step: &str) -> Result<StepPlan, ShipcheckError> {
        self.rulebook.plan(step, self.stack)
    }

    /// Verify one step against a hosted repository
    ///
    /// Fails hard before any check runs when the step has hosted checks
    /// and the hosted client is not installed.
    pub fn verify(
        &self,
        step: &str,
        hosted: &dyn HostedRepository,
    ) -> Result<(StepPlan, StepRun), ShipcheckError> {
        let plan = self.plan(step)?;
        let revision = self.revision()?;

        if plan.needs_hosted() && !hosted.is_available() {
            return Err(ShipcheckError::ToolMissing("gh".to_string()));
        }

        let probe = Probe::new(
            self.root(),
            &self.git,
            hosted,
            &self.proofs,
            &self.rulebook.settings,
            &revision,
        );
        let run = verify_step(&plan, &probe, &self.proofs, &revision)?;
        Ok((plan, run))
    }

    /// Proof state of every step at the current revision
    ///
    /// Stale proofs are deleted while they are reported.
    pub fn proof_states(&self) -> Result<Vec<(String, ProofState)>, ShipcheckError> {
        let revision = self.revision()?;
        self.rulebook
            .steps
            .iter()
            .map(|step| {
                let state = self.proofs.check_stale(&step.name, &revision)?;
                Ok((step.name.clone(), state))
            })
            .collect()
    }

    /// Delete the proof of one step, or of every step
    pub fn reset(&self, step: Option<&str>) -> Result<usize, ShipcheckError> {
        match step {
            Some(name) => {
                if self.rulebook.step(name).is_none() {
                    return Err(ShipcheckError::UnknownStep(name.to_string()));
                }
                Ok(usize::from(self.proofs.remove(name)?))
            },
            None => self.proofs.clear(),
        }
    }
}
