//! Check outcomes and the per-step result they fold into

use serde::Serialize;

use super::Check;

/// Result of evaluating one check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    /// The condition holds
    Pass,
    /// The condition was checked and found false, absent or broken
    Fail {
        /// Why the check failed
        reason: String,
    },
    /// The condition cannot be determined yet (e.g. CI still running)
    Pending {
        /// What is still outstanding
        reason: String,
    },
}

impl Outcome {
    /// Create a failing outcome
    #[must_use]
    pub fn fail(reason: impl Into<String>) -> Self {
        Self::Fail {
            reason: reason.into(),
        }
    }

    /// Create a pending outcome
    #[must_use]
    pub fn pending(reason: impl Into<String>) -> Self {
        Self::Pending {
            reason: reason.into(),
        }
    }

    /// Pass when `ok`, otherwise fail with `reason`
    #[must_use]
    pub fn pass_or_fail(ok: bool, reason: impl FnOnce() -> String) -> Self {
        if ok { Self::Pass } else { Self::fail(reason()) }
    }

    /// Whether this outcome is a pass
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Short uppercase label for reports
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail { .. } => "FAIL",
            Self::Pending { .. } => "PENDING",
        }
    }

    /// The reason attached to a fail or pending outcome
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Pass => None,
            Self::Fail { reason } | Self::Pending { reason } => Some(reason),
        }
    }
}

/// One evaluated check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    /// The check that was evaluated
    pub check: Check,
    /// What the evaluation found
    pub outcome: Outcome,
}

/// Aggregated result of one step run
///
/// Built by folding [`CheckOutcome`]s with [`StepResult::record`], so the
/// counters always agree with `results`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StepResult {
    /// Step name
    pub step: String,
    /// Number of passing checks
    pub passed: usize,
    /// Number of failing checks
    pub failed: usize,
    /// Number of pending checks
    pub pending: usize,
    /// Every check with its outcome, in evaluation order
    pub results: Vec<CheckOutcome>,
}

impl StepResult {
    /// Create an empty result for a step
    #[must_use]
    pub fn new(step: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            ..Self::default()
        }
    }

    /// Fold one evaluated check into the result
    #[must_use]
    pub fn record(mut self, evaluated: CheckOutcome) -> Self {
        match evaluated.outcome {
            Outcome::Pass => self.passed += 1,
            Outcome::Fail { .. } => self.failed += 1,
            Outcome::Pending { .. } => self.pending += 1,
        }
        self.results.push(evaluated);
        self
    }

    /// Number of checks evaluated
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.failed + self.pending
    }

    /// Whether every check passed
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0 && self.pending == 0
    }

    /// Pass ratio, e.g. `"7/8"`
    #[must_use]
    pub fn ratio(&self) -> String {
        format!("{}/{}", self.passed, self.total())
    }
}
