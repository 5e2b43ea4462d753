//! # Release Helper
//!
//! Publishes a versioned GitHub release from a CI job.
//!
//! The run is configured entirely through environment variables and performs
//! four steps:
//!
//! - **Release lookup/creation**: the release for `v$VERSION` is reused when it
//!   exists and created otherwise, so re-running a job never creates twice
//! - **Release notes**: commits since the previous tag, sorted by subject with
//!   ties kept in history order, plus a compare link
//! - **Asset upload**: files from a directory confined to `SAFE_ROOT_DIR` that
//!   the release does not carry yet, uploaded one at a time
//! - **Notification**: a status message to an allow-listed HTTPS chat webhook
//!
//! ## Usage
//!
//! ```bash
//! VERSION=2.19.0 SAFE_ROOT_DIR=$PWD ASSETS_DIR=dist release_helper
//! release_helper has-asset app.zip
//! release_helper notify "Release failed" "see CI log" --failure
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod github;
pub mod notes;
pub mod notify;
pub mod pipeline;

pub use cli::Args;
pub use config::{EnvConfig, ReleaseSettings};
pub use error::{ReleaseError, Result};
pub use git::{SystemGit, TagHistory};
pub use github::{AssetUploader, GitHubClient, ReleaseApi, ReleaseRegistry, UploadReport};
pub use notes::CommitLogFormatter;
pub use notify::{Notifier, NotifyOutcome};
