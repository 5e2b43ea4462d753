//! Commit log to release notes transform.

use crate::config::ReleaseSettings;
use crate::error::{GitError, Result};
use crate::git::{CommitInfo, TagHistory};
use crate::notes::stable_sort_by_key;

/// Values injected into rendered notes
#[derive(Debug, Clone)]
pub struct NotesContext {
    /// Web server URL, e.g. `https://github.com`
    pub server_url: String,
    /// `owner/repo`
    pub repository: String,
    /// Warning block placed above the notes of a prerelease
    pub prerelease_notice: Option<String>,
}

impl NotesContext {
    /// Build from settings; the notice is only kept for prereleases
    pub fn from_settings(settings: &ReleaseSettings) -> Self {
        Self {
            server_url: settings.server_url.trim_end_matches('/').to_string(),
            repository: settings.repository(),
            prerelease_notice: settings
                .prerelease
                .then(|| settings.prerelease_notice.clone()),
        }
    }
}

/// Escape characters the release notes renderer would treat as markup
pub fn escape_markup(text: &str) -> String {
    text.replace('<', "\\<")
}

/// Turn a one-line log into release note lines.
///
/// Lines are ordered by the first word of the subject (usually a `fix:` or
/// `feat:` style prefix); commits sharing that word keep their log order.
/// Each rendered line is `<subject> <hash>`.
pub fn format_commit_lines(raw_log: &str) -> String {
    let commits: Vec<CommitInfo> = raw_log
        .lines()
        .filter_map(CommitInfo::parse_oneline)
        .map(|commit| CommitInfo {
            subject: escape_markup(&commit.subject),
            ..commit
        })
        .collect();

    stable_sort_by_key(commits, |commit| sort_key(&commit.subject).to_string())
        .into_iter()
        .map(|commit| format!("{} {}", commit.subject, commit.short_hash))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Leading word of a subject, up to the first whitespace character
fn sort_key(subject: &str) -> &str {
    subject.split(char::is_whitespace).next().unwrap_or_default()
}

/// Derives release notes from the history between two tags
pub struct CommitLogFormatter<'a, H: TagHistory> {
    history: &'a H,
    context: NotesContext,
}

impl<'a, H: TagHistory> CommitLogFormatter<'a, H> {
    /// Create a formatter over `history`
    pub fn new(history: &'a H, context: NotesContext) -> Self {
        Self { history, context }
    }

    /// Tag immediately preceding `current_tag`, or `None` for a first release
    pub async fn previous_tag(&self, current_tag: &str) -> Result<Option<String>> {
        self.history.describe_tag(&format!("{current_tag}^")).await
    }

    /// Sorted commit lines strictly between `prev_tag` and `current_tag`
    pub async fn list_commits(&self, prev_tag: &str, current_tag: &str) -> Result<String> {
        let raw = self
            .history
            .log_oneline(&format!("{prev_tag}...{current_tag}"))
            .await?;
        Ok(format_commit_lines(&raw))
    }

    /// Full release notes for `current_tag`.
    ///
    /// Falls back to an initial-release layout when no earlier tag exists.
    pub async fn render_notes(&self, current_tag: &str) -> Result<String> {
        if self.history.describe_tag(current_tag).await?.is_none() {
            return Err(GitError::TagNotFound {
                tag: current_tag.to_string(),
            }
            .into());
        }

        let base = format!("{}/{}", self.context.server_url, self.context.repository);
        let body = match self.previous_tag(current_tag).await? {
            Some(prev_tag) => {
                let list = self.list_commits(&prev_tag, current_tag).await?;
                format!(
                    "Notable changes since {prev_tag}:\n{list}\n\nCommit log: {base}/compare/{prev_tag}...{current_tag}"
                )
            }
            None => {
                log::warn!("No tag precedes {current_tag}, rendering initial release notes");
                let raw = self.history.log_oneline(current_tag).await?;
                let list = format_commit_lines(&raw);
                format!(
                    "Initial release {current_tag}:\n{list}\n\nCommit log: {base}/commits/{current_tag}"
                )
            }
        };

        Ok(match &self.context.prerelease_notice {
            Some(notice) => format!("{notice}\n\n{body}"),
            None => body,
        })
    }
}
