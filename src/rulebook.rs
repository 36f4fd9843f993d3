//! Rulebook - declarative step definitions
//!
//! Steps are read from `.shipcheck.toml` at the repository root. Without
//! that file the built-in onboarding checklist is used. Steps form a
//! linear chain in file order unless a step names its prerequisite with
//! `requires`.
//!
//! ```toml
//! [settings]
//! fallback_branch = "main"
//!
//! [[step]]
//! name = "git-setup"
//! title = "Git repository setup"
//!
//! [[step.check]]
//! description = "README present"
//! kind = "file_exists"
//! path = "README.md"
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::models::{Check, Predicate, Stack};
use crate::core::services::StepPlan;
use crate::error::ShipcheckError;
use crate::paths;

/// A parsed rulebook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rulebook {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Steps in chain order
    #[serde(default, rename = "step")]
    pub steps: Vec<StepDef>,
}

/// Global settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Proof directory, relative to the repository root
    pub proof_dir: String,

    /// Branch used when neither the host nor `origin/HEAD` names one
    pub fallback_branch: String,

    /// How many recent commits are searched for handshake markers
    pub history_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            proof_dir: paths::DEFAULT_PROOF_DIR.to_string(),
            fallback_branch: "main".to_string(),
            history_depth: 50,
        }
    }
}

/// A step definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDef {
    /// Unique step name, used in proof file names
    pub name: String,

    /// Human title (defaults to the name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Prerequisite step (defaults to the previous step)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires: Option<String>,

    /// Skip hosted checks once the prerequisite gate has failed
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub short_circuit: bool,

    /// Checks in evaluation order
    #[serde(default, rename = "check")]
    pub checks: Vec<CheckDef>,
}

/// A check definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckDef {
    /// What the check verifies
    pub description: String,

    /// Only include this check when the detected stack matches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<Stack>,

    /// The question to ask
    #[serde(flatten)]
    pub predicate: Predicate,
}

impl Rulebook {
    /// Load the rulebook of a repository, or the built-in checklist
    pub fn load(root: &Path) -> Result<Self, ShipcheckError> {
        let path = paths::rulebook(root);
        if !path.exists() {
            debug!("no {} found, using built-in checklist", paths::RULEBOOK_FILE);
            return Ok(Self::builtin());
        }

        let invalid = |message: String| ShipcheckError::InvalidRulebook {
            path: path.clone(),
            message,
        };

        let content = fs::read_to_string(&path).map_err(|e| invalid(e.to_string()))?;
        let rulebook = Self::parse(&content).map_err(invalid)?;
        debug!("loaded {} step(s) from {}", rulebook.steps.len(), path.display());
        Ok(rulebook)
    }

    /// Parse and validate rulebook text
    pub fn parse(content: &str) -> Result<Self, String> {
        let rulebook: Self = toml::from_str(content).map_err(|e| e.to_string())?;
        rulebook.validate()?;
        Ok(rulebook)
    }

    /// Render the rulebook as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Check structural rules
    ///
    /// - at least one step, every step with at least one check
    /// - unique step names usable in file names
    /// - `requires` names an earlier step
    /// - dependency gates are injected, never declared
    pub fn validate(&self) -> Result<(), String> {
        if self.steps.is_empty() {
            return Err("no steps defined".to_string());
        }
        if self.settings.history_depth == 0 {
            return Err("settings.history_depth must be at least 1".to_string());
        }

        let mut seen = HashSet::new();
        for step in &self.steps {
            if step.name.is_empty()
                || !step.name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                return Err(format!(
                    "invalid step name '{}': use letters, digits, '-' or '_'",
                    step.name
                ));
            }
            if !seen.insert(step.name.as_str()) {
                return Err(format!("step '{}' is defined more than once", step.name));
            }
            if let Some(required) = &step.requires
                && (required == &step.name || !seen.contains(required.as_str()))
            {
                return Err(format!(
                    "step '{}' requires '{required}', which is not an earlier step",
                    step.name
                ));
            }
            if step.checks.is_empty() {
                return Err(format!("step '{}' has no checks", step.name));
            }
            if step.checks.iter().any(|c| c.predicate.is_gate()) {
                return Err(format!(
                    "step '{}' declares a proof_exists check; use `requires` instead",
                    step.name
                ));
            }
        }
        Ok(())
    }

    /// Find a step definition by name
    #[must_use]
    pub fn step(&self, name: &str) -> Option<&StepDef> {
        self.steps.iter().find(|s| s.name == name)
    }

    /// The step whose proof gates `name`
    #[must_use]
    pub fn prerequisite(&self, name: &str) -> Option<&str> {
        let index = self.steps.iter().position(|s| s.name == name)?;
        let step = &self.steps[index];
        step.requires
            .as_deref()
            .or_else(|| index.checked_sub(1).map(|prev| self.steps[prev].name.as_str()))
    }

    /// Resolve a step into the checks that will run for `stack`
    ///
    /// The gate on the prerequisite comes first; stack-specific checks of
    /// other stacks are dropped; ordinals are assigned in final order.
    pub fn plan(&self, name: &str, stack: Stack) -> Result<StepPlan, ShipcheckError> {
        let number = self
            .steps
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| ShipcheckError::UnknownStep(name.to_string()))?
            + 1;
        let step = &self.steps[number - 1];
        let gate = self.prerequisite(name).map(str::to_string);

        let gate_check = gate.as_ref().map(|prerequisite| {
            (
                format!("Step '{prerequisite}' verified at the current revision"),
                Predicate::ProofExists {
                    step: prerequisite.clone(),
                },
            )
        });
        let declared = step
            .checks
            .iter()
            .filter(|c| c.stack.is_none_or(|s| s == stack))
            .map(|c| (c.description.clone(), c.predicate.clone()));

        let checks = gate_check
            .into_iter()
            .chain(declared)
            .enumerate()
            .map(|(index, (description, predicate))| Check::new(index + 1, description, predicate))
            .collect();

        Ok(StepPlan {
            name: step.name.clone(),
            title: step.title.clone().unwrap_or_else(|| step.name.clone()),
            number,
            gate,
            short_circuit: step.short_circuit,
            checks,
        })
    }

    /// The built-in production readiness checklist
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub fn builtin() -> Self {
        Self {
            settings: Settings::default(),
            steps: vec![
                step(
                    "git-setup",
                    "Git repository setup",
                    false,
                    vec![
                        check("Remote 'origin' configured", Predicate::GitRemote {
                            name: "origin".to_string(),
                        }),
                        check("README present", file("README.md")),
                        check("Ignore rules present", file(".gitignore")),
                        check("Handshake commit recorded", Predicate::HandshakeCommit {
                            marker: "[shipcheck:git-setup]".to_string(),
                        }),
                    ],
                ),
                step(
                    "ci",
                    "Continuous integration",
                    true,
                    vec![
                        check("Workflow file present", Predicate::GlobMatches {
                            pattern: ".github/workflows/*.y*ml".to_string(),
                        }),
                        check("CI workflow defines jobs", Predicate::YamlKey {
                            path: ".github/workflows/ci.yml".to_string(),
                            key: "jobs".to_string(),
                        }),
                        check("Latest default-branch CI run succeeded", Predicate::CiGreen {
                            workflow: None,
                        }),
                    ],
                ),
                step(
                    "container",
                    "Containerization",
                    false,
                    vec![
                        check("Container build file present", Predicate::AnyFileExists {
                            paths: vec!["Dockerfile".to_string(), "Containerfile".to_string()],
                        }),
                        check("Container build context filtered", file(".dockerignore")),
                        check("Image runs as a non-root user", Predicate::FileContains {
                            path: "Dockerfile".to_string(),
                            pattern: r"(?m)^\s*USER\s+\S+".to_string(),
                        }),
                    ],
                ),
                step(
                    "tests",
                    "Automated tests",
                    true,
                    vec![
                        check("Test directory present", Predicate::DirExists {
                            path: "tests".to_string(),
                        }),
                        stack_check(
                            Stack::Python,
                            "pytest configured",
                            Predicate::TomlKey {
                                path: "pyproject.toml".to_string(),
                                key: "tool.pytest.ini_options".to_string(),
                            },
                        ),
                        stack_check(
                            Stack::Node,
                            "Test script defined",
                            Predicate::JsonKey {
                                path: "package.json".to_string(),
                                key: "scripts.test".to_string(),
                            },
                        ),
                        check("CI runs the test job", Predicate::CiJob {
                            name: "test".to_string(),
                            workflow: None,
                        }),
                    ],
                ),
                step(
                    "pre-commit",
                    "Pre-commit hooks",
                    false,
                    vec![
                        check("Hook configuration present", file(".pre-commit-config.yaml")),
                        check("Hook repositories declared", Predicate::YamlKey {
                            path: ".pre-commit-config.yaml".to_string(),
                            key: "repos".to_string(),
                        }),
                        check("Hooks installed in the clone", file(".git/hooks/pre-commit")),
                    ],
                ),
                step(
                    "governance",
                    "Governance scripts",
                    false,
                    vec![
                        check("Governance scripts present", Predicate::DirExists {
                            path: "scripts/governance".to_string(),
                        }),
                        check("Governance baselines recorded", Predicate::DirExists {
                            path: ".memory-layer/baselines".to_string(),
                        }),
                        check("Governance wired into pre-commit", Predicate::FileContains {
                            path: ".pre-commit-config.yaml".to_string(),
                            pattern: "scripts/governance/".to_string(),
                        }),
                    ],
                ),
                step(
                    "ai-rules",
                    "AI assistant rules",
                    true,
                    vec![
                        check("Assistant rule file present", Predicate::AnyFileExists {
                            paths: vec![
                                "CLAUDE.md".to_string(),
                                "AGENTS.md".to_string(),
                                ".cursorrules".to_string(),
                                ".github/copilot-instructions.md".to_string(),
                            ],
                        }),
                        check(
                            "Default branch protected",
                            Predicate::BranchProtection {
                                required_check: None,
                                enforce_admins: true,
                                min_approvals: Some(1),
                            },
                        ),
                        check("Handshake issue filed", Predicate::HandshakeIssue {
                            marker: "[shipcheck:ai-rules]".to_string(),
                        }),
                    ],
                ),
            ],
        }
    }
}

fn step(name: &str, title: &str, short_circuit: bool, checks: Vec<CheckDef>) -> StepDef {
    StepDef {
        name: name.to_string(),
        title: Some(title.to_string()),
        requires: None,
        short_circuit,
        checks,
    }
}

fn check(description: &str, predicate: Predicate) -> CheckDef {
    CheckDef {
        description: description.to_string(),
        stack: None,
        predicate,
    }
}

fn stack_check(stack: Stack, description: &str, predicate: Predicate) -> CheckDef {
    CheckDef {
        stack: Some(stack),
        ..check(description, predicate)
    }
}

fn file(path: &str) -> Predicate {
    Predicate::FileExists {
        path: path.to_string(),
    }
}
