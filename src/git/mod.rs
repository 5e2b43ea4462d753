//! Git history access for release notes.
//!
//! This module defines the read-only queries the notes formatter needs and a
//! backend that answers them with the system `git` binary.

mod operations;
mod system_git;

pub use operations::{CommitInfo, TagHistory};
pub use system_git::SystemGit;
