//! Check model
//!
//! A check declares: "For this step to be complete, this must hold."
//! Each check pairs a human description with a [`Predicate`], the question
//! a probe answers about the working tree, git history or hosted repository.

use serde::{Deserialize, Serialize};

/// A single named check within a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Check {
    /// Ordinal within the step (1-based)
    pub id: usize,

    /// What the check verifies, shown in reports
    pub description: String,

    /// The question to ask
    pub predicate: Predicate,
}

impl Check {
    /// Create a new check
    #[must_use]
    pub fn new(id: usize, description: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            id,
            description: description.into(),
            predicate,
        }
    }
}

/// The question a check asks
///
/// Serialized with a `kind` tag so rulebook entries read as
/// `kind = "file_exists"` next to their arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// A regular file exists
    FileExists {
        /// Path relative to the repository root
        path: String,
    },

    /// A directory exists
    DirExists {
        /// Path relative to the repository root
        path: String,
    },

    /// At least one of several candidate files exists
    AnyFileExists {
        /// Candidate paths relative to the repository root
        paths: Vec<String>,
    },

    /// At least one file matches a glob
    GlobMatches {
        /// Glob relative to the repository root, e.g. `.github/workflows/*.yml`
        pattern: String,
    },

    /// A file's text matches a regular expression
    FileContains {
        /// Path relative to the repository root
        path: String,
        /// Regular expression searched in the file text
        pattern: String,
    },

    /// A YAML document contains a dotted key path
    YamlKey {
        /// Path relative to the repository root
        path: String,
        /// Dotted key path, e.g. `jobs.test`
        key: String,
    },

    /// A JSON document contains a dotted key path
    JsonKey {
        /// Path relative to the repository root
        path: String,
        /// Dotted key path, e.g. `scripts.test`
        key: String,
    },

    /// A TOML document contains a dotted key path
    TomlKey {
        /// Path relative to the repository root
        path: String,
        /// Dotted key path, e.g. `tool.pytest.ini_options`
        key: String,
    },

    /// A named git remote is configured
    GitRemote {
        /// Remote name, usually `origin`
        name: String,
    },

    /// A recent commit message contains a marker token
    HandshakeCommit {
        /// Marker token searched in commit messages
        marker: String,
    },

    /// An issue (open or closed) has a title containing a marker token
    HandshakeIssue {
        /// Marker token searched in issue titles
        marker: String,
    },

    /// The default branch is protected as required
    BranchProtection {
        /// Status check that must be required before merging
        #[serde(default, skip_serializing_if = "Option::is_none")]
        required_check: Option<String>,
        /// Whether the rules must also apply to administrators
        #[serde(default)]
        enforce_admins: bool,
        /// Minimum number of approving reviews
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_approvals: Option<u32>,
    },

    /// The most recent CI run on the default branch succeeded
    CiGreen {
        /// Restrict to one workflow (file name or display name)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        workflow: Option<String>,
    },

    /// The most recent CI run on the default branch ran a job that succeeded
    CiJob {
        /// Job name
        name: String,
        /// Restrict to one workflow (file name or display name)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        workflow: Option<String>,
    },

    /// All checks on the current branch's pull request are green
    PrChecksGreen,

    /// A current proof exists for another step (the dependency gate)
    ProofExists {
        /// Step whose proof is required
        step: String,
    },
}

impl Predicate {
    /// Whether answering this predicate needs the hosted repository
    #[must_use]
    pub const fn is_hosted(&self) -> bool {
        matches!(
            self,
            Self::HandshakeIssue { .. }
                | Self::BranchProtection { .. }
                | Self::CiGreen { .. }
                | Self::CiJob { .. }
                | Self::PrChecksGreen
        )
    }

    /// Whether this predicate is a dependency gate
    #[must_use]
    pub const fn is_gate(&self) -> bool {
        matches!(self, Self::ProofExists { .. })
    }
}
