//! Working tree probes
//!
//! File presence, text patterns, and key lookups in structured documents.
//! Structured files are parsed, never grepped.

use std::fs;
use std::path::Path;

use log::debug;
use regex::Regex;
use serde_json::Value;

use crate::core::models::Outcome;

/// Document formats understood by key lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// YAML (GitHub workflows, pre-commit config)
    Yaml,
    /// JSON (package.json, tsconfig)
    Json,
    /// TOML (pyproject.toml, Cargo.toml)
    Toml,
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yaml => write!(f, "YAML"),
            Self::Json => write!(f, "JSON"),
            Self::Toml => write!(f, "TOML"),
        }
    }
}

/// A regular file exists
#[must_use]
pub fn file_exists(root: &Path, path: &str) -> Outcome {
    let full = root.join(path);
    if full.is_file() {
        Outcome::Pass
    } else if full.exists() {
        Outcome::fail(format!("{path} exists but is not a file"))
    } else {
        Outcome::fail(format!("{path} not found"))
    }
}

/// A directory exists
#[must_use]
pub fn dir_exists(root: &Path, path: &str) -> Outcome {
    let full = root.join(path);
    if full.is_dir() {
        Outcome::Pass
    } else if full.exists() {
        Outcome::fail(format!("{path} exists but is not a directory"))
    } else {
        Outcome::fail(format!("{path}/ not found"))
    }
}

/// At least one candidate file exists
#[must_use]
pub fn any_file_exists(root: &Path, paths: &[String]) -> Outcome {
    Outcome::pass_or_fail(paths.iter().any(|p| root.join(p).is_file()), || {
        format!("none of {} found", paths.join(", "))
    })
}

/// At least one path matches a glob relative to the root
#[must_use]
pub fn glob_matches(root: &Path, pattern: &str) -> Outcome {
    let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
    let full = format!("{escaped_root}/{pattern}");

    match glob::glob(&full) {
        Ok(mut entries) => Outcome::pass_or_fail(entries.any(|entry| entry.is_ok()), || {
            format!("no file matches {pattern}")
        }),
        Err(err) => Outcome::fail(format!("invalid glob '{pattern}': {err}")),
    }
}

/// A file's text matches a regular expression
#[must_use]
pub fn file_contains(root: &Path, path: &str, pattern: &str) -> Outcome {
    let regex = match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(err) => return Outcome::fail(format!("invalid pattern /{pattern}/: {err}")),
    };

    match fs::read_to_string(root.join(path)) {
        Ok(text) => Outcome::pass_or_fail(regex.is_match(&text), || {
            format!("{path} does not match /{pattern}/")
        }),
        Err(err) => {
            debug!("cannot read {path}: {err}");
            Outcome::fail(format!("{path} not found or unreadable"))
        },
    }
}

/// A structured document contains a dotted key path
#[must_use]
pub fn has_key(root: &Path, path: &str, key: &str, format: Format) -> Outcome {
    let document = match load_document(&root.join(path), format) {
        Ok(document) => document,
        Err(reason) => return Outcome::fail(format!("{path}: {reason}")),
    };

    Outcome::pass_or_fail(lookup(&document, key).is_some(), || {
        format!("{path} has no key '{key}'")
    })
}

/// Parse a document into a format-neutral value
pub fn load_document(path: &Path, format: Format) -> Result<Value, String> {
    let text = fs::read_to_string(path).map_err(|_| "not found or unreadable".to_string())?;
    let parsed = match format {
        Format::Yaml => serde_yaml::from_str::<Value>(&text).map_err(|e| e.to_string()),
        Format::Json => serde_json::from_str::<Value>(&text).map_err(|e| e.to_string()),
        Format::Toml => toml::from_str::<Value>(&text).map_err(|e| e.to_string()),
    };
    parsed.map_err(|err| format!("invalid {format}: {err}"))
}

/// Resolve a dotted key path; numeric segments index into arrays
#[must_use]
pub fn lookup<'v>(value: &'v Value, key: &str) -> Option<&'v Value> {
    key.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|index| items.get(index)),
        _ => None,
    })
}
