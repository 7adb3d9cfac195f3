//! Infrastructure layer
//!
//! Handles all I/O operations: directory scanning, the failure log and
//! external processes. This module is the only place where side effects occur.

pub mod build_log;
pub mod compiler;
pub mod dirs;
pub mod loader;
pub mod test_runner;
