//! Version-control history access needed for release notes.
//!
//! Only two read-only queries are required. The production implementation
//! lives in `system_git`; tests substitute a canned history.

use crate::error::Result;
use std::future::Future;

/// Read-only tag and log queries against a repository
pub trait TagHistory {
    /// Most recent tag reachable from `rev`.
    ///
    /// Returns `Ok(None)` when no tag is reachable (for example `v1.0.0^` on
    /// the first tagged release).
    fn describe_tag(&self, rev: &str) -> impl Future<Output = Result<Option<String>>>;

    /// One-line log for `range`, oldest first, without the newest commit.
    ///
    /// Each line is `<short hash> <subject>`.
    fn log_oneline(&self, range: &str) -> impl Future<Output = Result<String>>;
}

/// A commit parsed from a one-line log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Short commit hash
    pub short_hash: String,
    /// First line of the commit message
    pub subject: String,
}

impl CommitInfo {
    /// Parse a `<hash> <subject>` line; blank lines yield `None`
    pub fn parse_oneline(line: &str) -> Option<Self> {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            return None;
        }
        let (hash, subject) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        Some(Self {
            short_hash: hash.to_string(),
            subject: subject.to_string(),
        })
    }
}
