//! CLI utilities for sesame.
//!
//! This crate provides the configuration, path and output plumbing shared by
//! the sesame command-line tools.

pub mod config;
pub mod output;
pub mod paths;

pub use config::{load_config, Config};
pub use output::{Output, OutputFormat};
pub use paths::Paths;
