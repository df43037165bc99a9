//! Command implementations for the srcveto CLI
//!
//! Each command lives in its own module and receives already-loaded
//! configuration from [`crate::cli::Cli::run`].

pub mod check;
pub mod config;
pub mod rules;
pub mod scan;
pub mod version;
