//! Error types for release publishing operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.
//! Notification problems are deliberately absent: they are reported through
//! [`crate::notify::NotifyOutcome`] and never abort a run.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for release_helper operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all release_helper operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Configuration errors (fatal, raised before any I/O)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Git history errors
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// Hosting platform errors
    #[error("GitHub error: {0}")]
    GitHub(#[from] GitHubError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing or empty
    #[error("{name} environment variable is not set.")]
    MissingVariable {
        /// Variable name
        name: &'static str,
    },

    /// Configured path resolves outside the confinement root
    #[error("Invalid {name}: {value} resolves to {resolved}, outside of {root}")]
    PathOutsideRoot {
        /// Variable name
        name: &'static str,
        /// Raw configured value
        value: String,
        /// Resolved absolute path
        resolved: PathBuf,
        /// Confinement root
        root: PathBuf,
    },

    /// Path could not be made absolute
    #[error("Could not resolve {name} '{value}': {reason}")]
    UnresolvablePath {
        /// Variable name
        name: &'static str,
        /// Raw configured value
        value: String,
        /// Reason for the error
        reason: String,
    },

    /// Repository slug is not owner/repo
    #[error("Invalid GITHUB_REPOSITORY '{value}'. Expected: owner/repo")]
    InvalidRepository {
        /// Raw configured value
        value: String,
    },

    /// No credential for the hosting platform
    #[error("GitHub token not provided. Set GITHUB_TOKEN or GH_TOKEN environment variable")]
    MissingToken,
}

/// Git history errors
#[derive(Error, Debug)]
pub enum GitError {
    /// Git command exited unsuccessfully
    #[error("Git command failed: {command} - {stderr}")]
    CommandFailed {
        /// Command that failed
        command: String,
        /// Captured stderr
        stderr: String,
    },

    /// Current tag has no reachable name
    #[error("Git tag '{tag}' not found in repository history")]
    TagNotFound {
        /// Tag name
        tag: String,
    },
}

/// Hosting platform errors
#[derive(Error, Debug)]
pub enum GitHubError {
    /// API returned a non-success status
    #[error("{operation} failed with status {status}: {message}")]
    Api {
        /// Operation that failed
        operation: &'static str,
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },

    /// Release carries an unusable upload URL
    #[error("Invalid upload URL '{url}': {reason}")]
    InvalidUploadUrl {
        /// Raw upload URL
        url: String,
        /// Reason for the error
        reason: String,
    },
}

impl ReleaseError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ReleaseError::Config(ConfigError::MissingVariable { name }) => vec![
                format!("Export {name} in the CI job environment"),
            ],
            ReleaseError::Config(ConfigError::PathOutsideRoot { root, .. }) => vec![
                format!("Point ASSETS_DIR at a directory inside {}", root.display()),
                "Remove '..' segments and absolute paths from ASSETS_DIR".to_string(),
            ],
            ReleaseError::Config(ConfigError::MissingToken) => vec![
                "Pass secrets.GITHUB_TOKEN to the job as GITHUB_TOKEN".to_string(),
            ],
            ReleaseError::Git(GitError::TagNotFound { tag }) => vec![
                format!("Create and push the tag first: git tag {tag} && git push origin {tag}"),
                "Fetch full history in CI (actions/checkout with fetch-depth: 0)".to_string(),
            ],
            ReleaseError::GitHub(GitHubError::Api { status: 401 | 403, .. }) => vec![
                "Verify the token is valid and has contents: write permission".to_string(),
            ],
            _ => vec!["Re-run the job: published releases and assets are skipped".to_string()],
        }
    }

    /// Check if this error came from configuration rather than I/O
    pub fn is_configuration(&self) -> bool {
        matches!(self, ReleaseError::Config(_))
    }
}
