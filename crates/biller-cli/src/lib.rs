//! Bill splitter CLI library.
//!
//! This crate provides the CLI interface and data-file loading for the biller.

mod cli;
pub mod commands;
mod config;
pub mod loader;

pub use cli::{Cli, Commands};
pub use config::Config;
