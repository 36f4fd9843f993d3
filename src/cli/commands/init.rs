//! Initialize shipcheck in a repository

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use log::info;

use shipcheck::adapters::GitRepository;
use shipcheck::output::{OperationResult, OutputMode};
use shipcheck::paths;
use shipcheck::rulebook::Rulebook;
use shipcheck::storage::ProofStore;

const HEADER: &str = "# shipcheck rulebook\n\
#\n\
# Steps run in file order; each step requires a current proof of the previous one.\n\
# Verify a step with `shipcheck verify <name>`.\n\n";

/// Write the built-in checklist and create the proof directory
pub fn init(dir: &Path, force: bool, mode: OutputMode) -> anyhow::Result<ExitCode> {
    let git = GitRepository::discover(dir)?;
    let root = git.root();
    let rulebook_path = paths::rulebook(root);

    if rulebook_path.exists() && !force {
        OperationResult::ok(format!(
            "Already initialized ({} exists). Use --force to overwrite.",
            paths::RULEBOOK_FILE
        ))
        .render(mode);
        return Ok(ExitCode::SUCCESS);
    }

    let rulebook = Rulebook::builtin();
    let body = rulebook.to_toml().context("failed to render default checklist")?;
    fs::write(&rulebook_path, format!("{HEADER}{body}"))
        .with_context(|| format!("failed to write {}", rulebook_path.display()))?;
    info!("wrote {}", rulebook_path.display());

    let proofs = ProofStore::new(paths::proof_dir(root, &rulebook.settings.proof_dir));
    proofs.ensure_dir()?;

    OperationResult::ok(format!(
        "Created {} with {} steps and {}/\nNext: shipcheck verify {}",
        paths::RULEBOOK_FILE,
        rulebook.steps.len(),
        rulebook.settings.proof_dir,
        rulebook.steps.first().map_or("<step>", |s| s.name.as_str())
    ))
    .render(mode);
    Ok(ExitCode::SUCCESS)
}
