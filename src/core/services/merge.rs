//! Merge assistance
//!
//! Temporarily relaxes the required approval count on the default branch,
//! merges a pull request, and restores the original count. Restoration is
//! attempted even when the merge fails.

use anyhow::Context;
use log::{info, warn};
use serde::Serialize;

use crate::core::models::MergeMethod;
use crate::core::ports::HostedRepository;

/// What an assisted merge did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Pull request number
    pub pull_request: u64,
    /// Protected branch that was relaxed
    pub branch: String,
    /// Approval count before the merge (None when reviews are not required)
    pub original_approvals: Option<u32>,
    /// Whether the approval requirement was relaxed and restored
    pub relaxed: bool,
}

/// Merge `pull_request` into `branch`, relaxing approvals around the merge
pub fn assisted_merge(
    hosted: &dyn HostedRepository,
    branch: &str,
    pull_request: u64,
    method: MergeMethod,
) -> anyhow::Result<MergeReport> {
    let original = hosted
        .branch_protection(branch)
        .with_context(|| format!("failed to read protection of '{branch}'"))?
        .and_then(|protection| protection.required_approvals);

    let relax = original.filter(|count| *count > 0);
    if relax.is_some() {
        hosted
            .set_required_approvals(branch, 0)
            .with_context(|| format!("failed to relax approvals on '{branch}'"))?;
        info!("relaxed required approvals on '{branch}' to 0");
    }

    let merged = hosted.merge_pull_request(pull_request, method);

    if let Some(count) = relax {
        if let Err(err) = hosted.set_required_approvals(branch, count) {
            if let Err(merge_err) = &merged {
                warn!("merge of #{pull_request} also failed: {merge_err:#}");
            }
            return Err(err).with_context(|| {
                format!("failed to restore {count} required approval(s) on '{branch}'; restore it manually")
            });
        }
        info!("restored required approvals on '{branch}' to {count}");
    }

    merged.with_context(|| format!("failed to merge pull request #{pull_request}"))?;

    Ok(MergeReport {
        pull_request,
        branch: branch.to_string(),
        original_approvals: original,
        relaxed: relax.is_some(),
    })
}
