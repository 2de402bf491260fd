//! CLI subcommand implementations.

pub mod bills;
pub mod compute;
pub mod timeline;
mod prompt;
