//! Output formatting for human and JSON modes
//!
//! This module provides structured output that can be rendered either as
//! human-readable text or machine-parseable JSON.

use colored::{ColoredString, Colorize};
use serde::Serialize;

use crate::core::models::{CheckOutcome, Outcome, ProofToken, Stack, StepResult};
use crate::core::services::{MergeReport, StepPlan, StepRun};
use crate::storage::ProofState;

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

fn colored_label(outcome: &Outcome) -> ColoredString {
    let label = format!("{:<7}", outcome.label());
    match outcome {
        Outcome::Pass => label.green().bold(),
        Outcome::Fail { .. } => label.red().bold(),
        Outcome::Pending { .. } => label.yellow().bold(),
    }
}

fn print_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// Result of verifying one step
#[derive(Debug, Serialize)]
pub struct VerifyReport {
    /// Step name
    pub step: String,
    /// Human title
    pub title: String,
    /// Position in the rulebook (1-based)
    pub number: usize,
    /// Revision the checks ran against
    pub revision: String,
    /// Proof state found before the run (`missing`, `stale`, `verified`)
    pub previous_proof: String,
    /// Number of passing checks
    pub passed: usize,
    /// Number of failing checks
    pub failed: usize,
    /// Number of pending checks
    pub pending: usize,
    /// Number of checks evaluated
    pub total: usize,
    /// Every check with its outcome
    pub results: Vec<CheckOutcome>,
    /// Proof written by this run
    pub proof: Option<ProofToken>,
    /// Where the proof lives
    pub proof_path: String,
}

impl VerifyReport {
    /// Build a report from a finished run
    #[must_use]
    pub fn new(plan: &StepPlan, run: StepRun, revision: &str, proof_path: String) -> Self {
        let StepResult {
            passed,
            failed,
            pending,
            results,
            ..
        } = run.result;

        Self {
            step: plan.name.clone(),
            title: plan.title.clone(),
            number: plan.number,
            revision: revision.to_string(),
            previous_proof: run.previous.label().to_string(),
            passed,
            failed,
            pending,
            total: passed + failed + pending,
            results,
            proof: run.proof,
            proof_path,
        }
    }

    /// Whether every check passed
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0 && self.pending == 0
    }

    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => print_json(self),
        }
    }

    fn render_human(&self) {
        println!(
            "{} {} ({}) at {}\n",
            format!("Step {}:", self.number).bold(),
            self.title.bold(),
            self.step,
            self.revision
        );
        if self.previous_proof == "stale" {
            println!("  {}\n", "Previous proof was stale and has been removed.".dimmed());
        }

        for evaluated in &self.results {
            println!(
                "  [{}] {} {}",
                evaluated.check.id,
                colored_label(&evaluated.outcome),
                evaluated.check.description
            );
            if let Some(reason) = evaluated.outcome.reason() {
                println!("          {}", reason.dimmed());
            }
        }

        println!(
            "\nResult: {}/{} passed, {} failed, {} pending",
            self.passed, self.total, self.failed, self.pending
        );
        match &self.proof {
            Some(proof) => {
                println!("{} {}", "VERIFIED".green().bold(), proof.token);
                println!("Proof written to {}", self.proof_path);
            },
            None => {
                println!("{}", "NOT VERIFIED: no proof written".red().bold());
                println!("Fix the failing checks and run `shipcheck verify {}` again.", self.step);
            },
        }
    }
}

/// Proof state of one step
#[derive(Debug, Serialize)]
pub struct StepStatus {
    /// Position in the rulebook (1-based)
    pub number: usize,
    /// Step name
    pub name: String,
    /// Human title
    pub title: String,
    /// `verified`, `stale` or `missing`
    pub state: String,
    /// The current proof, when verified
    pub proof: Option<ProofToken>,
}

impl StepStatus {
    /// Build a status line from a proof state
    #[must_use]
    pub fn new(number: usize, name: String, title: String, state: ProofState) -> Self {
        let label = state.label().to_string();
        let proof = match state {
            ProofState::Current(token) => Some(token),
            ProofState::Missing | ProofState::Stale { .. } => None,
        };
        Self {
            number,
            name,
            title,
            state: label,
            proof,
        }
    }
}

/// Result of a status operation
#[derive(Debug, Serialize)]
pub struct StatusReport {
    /// Current revision
    pub revision: String,
    /// Detected stack
    pub stack: Stack,
    /// Every step in chain order
    pub steps: Vec<StepStatus>,
}

impl StatusReport {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => print_json(self),
        }
    }

    fn render_human(&self) {
        println!("Revision {} ({} stack)\n", self.revision, self.stack);
        for step in &self.steps {
            let state = format!("{:<8}", step.state);
            let state = match step.state.as_str() {
                "verified" => state.green(),
                "stale" => state.yellow(),
                _ => state.dimmed(),
            };
            println!("  {:>2}. {state} {} ({})", step.number, step.title, step.name);
        }

        let verified = self.steps.iter().filter(|s| s.proof.is_some()).count();
        println!("\n{verified}/{} steps verified", self.steps.len());
        if let Some(next) = self.steps.iter().find(|s| s.proof.is_none()) {
            println!("Next: shipcheck verify {}", next.name);
        }
    }
}

/// Result of a steps listing
#[derive(Debug, Serialize)]
pub struct StepListReport {
    /// Detected stack the plans were resolved for
    pub stack: Stack,
    /// Every step in chain order
    pub steps: Vec<StepPlan>,
}

impl StepListReport {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => print_json(self),
        }
    }

    fn render_human(&self) {
        for (index, plan) in self.steps.iter().enumerate() {
            if index > 0 {
                println!();
            }
            println!("{}", format!("{}. {} ({})", plan.number, plan.title, plan.name).bold());
            for check in &plan.checks {
                let marker = if check.predicate.is_hosted() { " [gh]" } else { "" };
                println!("   [{}] {}{}", check.id, check.description, marker.dimmed());
            }
        }
    }
}

/// Result of a merge operation
#[derive(Debug, Serialize)]
pub struct MergeResult {
    /// Whether the pull request was merged
    pub success: bool,
    /// What the merge did
    #[serde(flatten)]
    pub report: MergeReport,
}

impl MergeResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => print_json(self),
        }
    }

    fn render_human(&self) {
        let report = &self.report;
        if let Some(count) = report.original_approvals.filter(|_| report.relaxed) {
            println!(
                "Relaxed required approvals on '{}' from {count} to 0 and restored it.",
                report.branch
            );
        }
        println!("{} pull request #{}", "Merged".green().bold(), report.pull_request);
    }
}

/// Generic operation result for simple commands
#[derive(Debug, Serialize)]
pub struct OperationResult {
    /// Whether the operation succeeded
    pub success: bool,
    /// Human-readable message
    pub message: String,
}

impl OperationResult {
    /// Create a successful result
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => println!("{}", self.message),
            OutputMode::Json => print_json(self),
        }
    }
}
