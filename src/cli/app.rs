//! CLI definitions and entry point

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use super::commands;
use shipcheck::core::models::MergeMethod;
use shipcheck::output::OutputMode;

/// shipcheck - Step-by-step production readiness verification
#[derive(Parser, Debug)]
#[command(
    name = "shipcheck",
    version,
    about = "Step-by-step production readiness verification",
    long_about = "Verify a repository against a production readiness checklist.\n\n\
                  Each step runs every one of its checks and reports PASS, FAIL or PENDING.\n\
                  A fully passing step leaves a proof bound to the current commit;\n\
                  the next step requires that proof before it can pass."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    /// Run as if started in this directory
    #[arg(short = 'C', long, global = true, default_value = ".")]
    pub dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the default checklist to .shipcheck.toml
    Init {
        /// Overwrite an existing rulebook
        #[arg(short, long)]
        force: bool,
    },

    /// Verify one step and record a proof if every check passes
    Verify {
        /// Step name (see `shipcheck steps`)
        step: String,
    },

    /// Show which steps hold a proof for the current revision
    Status,

    /// List steps and their checks
    Steps,

    /// Delete the proof of one step, or of every step
    Reset {
        /// Step name; all proofs when omitted
        step: Option<String>,
    },

    /// Merge a pull request, relaxing required approvals around the merge
    Merge {
        /// Pull request number
        pr: u64,

        /// Merge method: squash, merge, rebase
        #[arg(short, long, default_value = "squash")]
        method: MergeMethod,
    },
}

/// Run the CLI
pub fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    match cli.command {
        Command::Init { force } => commands::init(&cli.dir, force, output_mode),
        Command::Verify { step } => commands::verify(&cli.dir, &step, output_mode),
        Command::Status => commands::status(&cli.dir, output_mode),
        Command::Steps => commands::steps(&cli.dir, output_mode),
        Command::Reset { step } => commands::reset(&cli.dir, step.as_deref(), output_mode),
        Command::Merge { pr, method } => commands::merge(&cli.dir, pr, method, output_mode),
    }
}
