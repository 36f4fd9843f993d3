//! Version control probes

use crate::core::models::Outcome;
use crate::core::ports::VersionControl;

/// A named remote is configured
#[must_use]
pub fn git_remote(vcs: &dyn VersionControl, name: &str) -> Outcome {
    Outcome::pass_or_fail(vcs.has_remote(name), || format!("no git remote named '{name}'"))
}

/// One of the last `depth` commit messages contains `marker`
#[must_use]
pub fn handshake_commit(vcs: &dyn VersionControl, marker: &str, depth: usize) -> Outcome {
    match vcs.recent_commit_messages(depth) {
        Ok(messages) => Outcome::pass_or_fail(messages.iter().any(|m| m.contains(marker)), || {
            format!("none of the last {depth} commits mentions '{marker}'")
        }),
        Err(err) => Outcome::fail(format!("cannot read commit history: {err:#}")),
    }
}
