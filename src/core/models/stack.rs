//! Project stack detection
//!
//! The detected stack is read-only context for a run: checks declared for a
//! specific stack are only part of a step when that stack is detected.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Primary language/tooling stack of the project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stack {
    /// `pyproject.toml`, `setup.py` or `requirements.txt`
    Python,
    /// `package.json`
    Node,
    /// `Cargo.toml`
    Rust,
    /// `go.mod`
    Go,
    /// No marker file found
    #[default]
    Unknown,
}

/// Marker files in detection priority order
const MARKERS: &[(&str, Stack)] = &[
    ("pyproject.toml", Stack::Python),
    ("setup.py", Stack::Python),
    ("requirements.txt", Stack::Python),
    ("package.json", Stack::Node),
    ("Cargo.toml", Stack::Rust),
    ("go.mod", Stack::Go),
];

impl Stack {
    /// Detect the stack from marker files at the repository root
    #[must_use]
    pub fn detect(root: &Path) -> Self {
        MARKERS
            .iter()
            .find(|(marker, _)| root.join(marker).is_file())
            .map_or(Self::Unknown, |(_, stack)| *stack)
    }
}

impl std::fmt::Display for Stack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Python => write!(f, "python"),
            Self::Node => write!(f, "node"),
            Self::Rust => write!(f, "rust"),
            Self::Go => write!(f, "go"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for Stack {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "python" => Ok(Self::Python),
            "node" => Ok(Self::Node),
            "rust" => Ok(Self::Rust),
            "go" => Ok(Self::Go),
            "unknown" => Ok(Self::Unknown),
            _ => Err(format!("Invalid stack: {s}. Use: python, node, rust, go")),
        }
    }
}
