//! Adapter implementations for port traits
//!
//! This module contains concrete implementations that handle I/O:
//!
//! - [`git`] - local repository state through libgit2
//! - [`gh`] - GitHub through the `gh` command line client

pub mod gh;
pub mod git;

pub use gh::GhCli;
pub use git::GitRepository;
