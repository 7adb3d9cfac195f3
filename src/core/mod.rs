//! Core business logic module
//!
//! Scheduling, classification and reporting. Process execution and
//! directory scanning belong in [`crate::infra`].
//!
//! # Submodules
//!
//! - [`project`] - Project metadata and identity validation
//! - [`graph`] - Dependency readiness
//! - [`classifier`] - Compiler output classification
//! - [`scheduler`] - Build session state machine
//! - [`report`] - Per-project outcomes
//! - [`settings`] - Layered TOML settings

pub mod classifier;
pub mod graph;
pub mod project;
pub mod report;
pub mod scheduler;
pub mod settings;
