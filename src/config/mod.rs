//! Configuration constants
//!
//! - [`defaults`] - Default values used when nothing is configured

pub mod defaults;
