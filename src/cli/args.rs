//! Command line argument parsing.
//!
//! Everything that configures a run comes from the environment; arguments only
//! pick the step a CI job wants to perform.

use clap::{Parser, Subcommand};

/// Publish a tagged GitHub release from CI
#[derive(Parser, Debug)]
#[command(
    name = "release_helper",
    version,
    about = "Publish a tagged GitHub release from CI",
    long_about = "Find or create the GitHub release for v$VERSION, upload the files in
$SAFE_ROOT_DIR/$ASSETS_DIR that it does not carry yet, and report the outcome
to $DISCORD_WEBHOOK_RELEASE.

Usage:
  release_helper            # same as `release_helper publish`
  release_helper upload
  release_helper has-asset app.zip
  release_helper notify \"Release failed\" \"see CI log\" --failure"
)]
pub struct Args {
    /// Step to run (default: publish)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Release steps
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ensure the release, upload assets, then notify the outcome
    Publish,
    /// Find or create the release and print its id
    Ensure,
    /// Upload assets the release does not carry yet
    Upload,
    /// Exit 0 when the release already carries NAME, 1 otherwise
    HasAsset {
        /// Asset file name (case-sensitive)
        name: String,
    },
    /// Print the notes a new release would get
    Notes,
    /// Send a status message to the webhook
    Notify {
        /// Message title
        title: String,
        /// Message body
        description: String,
        /// Use the failure color
        #[arg(long)]
        failure: bool,
    },
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Selected step, defaulting to publish
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Publish)
    }
}
