//! Version control system port
//!
//! Defines the read-only interface shipcheck needs from version control.

use crate::core::models::Revision;

/// Version control system abstraction
///
/// Implementations never write commits, branches or refs.
#[cfg_attr(test, mockall::automock)]
pub trait VersionControl: Send + Sync {
    /// The commit HEAD points at
    fn head_revision(&self) -> anyhow::Result<Revision>;

    /// Default branch according to the local tracking ref (`origin/HEAD`)
    fn tracking_default_branch(&self) -> Option<String>;

    /// Messages of the most recent commits reachable from HEAD, newest first
    fn recent_commit_messages(&self, limit: usize) -> anyhow::Result<Vec<String>>;

    /// Whether a remote with this name is configured
    fn has_remote(&self, name: &str) -> bool;
}
