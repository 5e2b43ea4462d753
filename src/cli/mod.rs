//! Command line interface for release_helper.
//!
//! Parses the requested step and runs it against the environment snapshot
//! taken at startup.

mod args;
pub mod commands;

pub use args::{Args, Command};
pub use commands::execute_command;

use crate::config::EnvConfig;
use crate::error::Result;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    let env = EnvConfig::from_env();
    execute_command(&args, &env).await
}
