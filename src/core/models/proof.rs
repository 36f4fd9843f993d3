//! Proof token model
//!
//! A proof asserts that every check of a step passed at a specific
//! repository revision. It is the only state shipcheck persists.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A commit as one run sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Revision {
    /// Full object id
    pub id: String,

    /// Abbreviated id, for display and tokens only
    pub short: String,
}

impl Revision {
    /// Create a revision from a full and an abbreviated id
    #[must_use]
    pub fn new(id: impl Into<String>, short: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            short: short.into(),
        }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short)
    }
}

/// Proof of a fully passing step run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofToken {
    /// Step name
    pub step: String,

    /// Short revision of HEAD when the proof was issued
    pub revision: String,

    /// Full commit id the proof is bound to
    #[serde(default)]
    pub commit: String,

    /// When the proof was issued (RFC3339)
    pub timestamp: String,

    /// Pass ratio, always `"T/T"`
    pub ratio: String,

    /// Opaque unique identifier
    pub token: String,
}

impl ProofToken {
    /// Issue a new proof for a step at a revision
    #[must_use]
    pub fn issue(step: &str, passed: usize, total: usize, revision: &Revision) -> Self {
        Self::issue_at(step, passed, total, revision, Utc::now())
    }

    /// Issue a proof with an explicit timestamp
    #[must_use]
    pub fn issue_at(
        step: &str,
        passed: usize,
        total: usize,
        revision: &Revision,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let token = format!(
            "SHIP-{}-{}-{passed}of{total}-{}",
            revision.short,
            issued_at.format("%Y%m%dT%H%M%SZ"),
            &nonce[..12]
        );

        Self {
            step: step.to_string(),
            revision: revision.short.clone(),
            commit: revision.id.clone(),
            timestamp: issued_at.to_rfc3339(),
            ratio: format!("{passed}/{total}"),
            token,
        }
    }

    /// Whether this proof was issued at `revision`
    ///
    /// Compares full ids: the abbreviation of a commit can grow as the
    /// object database does.
    #[must_use]
    pub fn matches_revision(&self, revision: &Revision) -> bool {
        self.commit == revision.id
    }
}
