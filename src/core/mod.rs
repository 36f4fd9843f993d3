//! Core domain logic for shipcheck
//!
//! This module contains the verification engine. All external
//! interactions are abstracted through port traits.
//!
//! ## Architecture
//!
//! - `models/` - Domain types (Check, Outcome, StepResult, ProofToken)
//! - `services/` - Runner, step chain, merge assistance
//! - `ports/` - Trait definitions for external dependencies

pub mod models;
pub mod ports;
pub mod services;
