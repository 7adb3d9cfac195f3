//! Batchbuild - dependency-ordered batch builder
//!
//! This library builds every project descriptor found under a directory
//! tree with an external compiler, one project at a time, in an order that
//! respects the references between them. Projects whose references failed
//! or form a cycle are failed without being compiled.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Scheduling, classification and reporting
//! - [`infra`] - Infrastructure layer (directory scanning, processes, logs)
//! - [`config`] - Configuration defaults
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
