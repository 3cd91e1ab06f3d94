//! Billable session report CLI library.
//!
//! This crate provides the CLI interface for the session reconciler.

mod cli;
mod config;
pub mod report;

pub use cli::Cli;
pub use config::{Config, OutputFormat};
