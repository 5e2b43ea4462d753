//! System git backend.
//!
//! Runs the `git` binary in the repository's working directory.

use crate::error::{GitError, Result};
use crate::git::TagHistory;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Git backend using the system `git` executable
#[derive(Debug, Clone)]
pub struct SystemGit {
    work_dir: PathBuf,
}

impl SystemGit {
    /// Use the repository containing `work_dir`
    pub fn new<P: AsRef<Path>>(work_dir: P) -> Self {
        Self {
            work_dir: work_dir.as_ref().to_path_buf(),
        }
    }

    fn git_cmd(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.current_dir(&self.work_dir);
        // describe_tag matches on stderr text, which must stay untranslated
        cmd.env("LC_ALL", "C").env("LANGUAGE", "C");
        // Don't let user config decorate or page output
        cmd.arg("-c").arg("log.decorate=false");
        cmd.arg("-c").arg("core.quotePath=false");
        cmd.arg("--no-pager");
        cmd
    }

    async fn run(&self, args: &[&str]) -> Result<std::process::Output> {
        let output = self.git_cmd().args(args).output().await?;
        log::debug!("git {} -> {}", args.join(" "), output.status);
        Ok(output)
    }
}

impl TagHistory for SystemGit {
    async fn describe_tag(&self, rev: &str) -> Result<Option<String>> {
        let output = self.run(&["describe", "--abbrev=0", "--tags", rev]).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // "No names found" / "No tags can describe" mean no reachable tag;
            // an unknown revision (parent of a root commit) means the same here.
            if stderr.contains("No names found")
                || stderr.contains("No tags can describe")
                || stderr.contains("Not a valid object name")
                || stderr.contains("unknown revision")
            {
                return Ok(None);
            }
            return Err(GitError::CommandFailed {
                command: format!("git describe --abbrev=0 --tags {rev}"),
                stderr: stderr.trim().to_string(),
            }
            .into());
        }

        let tag = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!tag.is_empty()).then_some(tag))
    }

    async fn log_oneline(&self, range: &str) -> Result<String> {
        let output = self
            .run(&["log", "--format=%h %s", "--skip=1", "--reverse", range])
            .await?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: format!("git log --format='%h %s' --skip=1 --reverse {range}"),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    async fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .current_dir(dir)
            .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
            .args(["-c", "commit.gpgsign=false", "-c", "tag.gpgsign=false"])
            .args(args)
            .status()
            .await
            .unwrap();
        assert!(status.success(), "git {:?} failed", args);
    }

    async fn commit(dir: &Path, message: &str) {
        git(dir, &["commit", "--allow-empty", "-q", "-m", message]).await;
    }

    #[test]
    fn test_git_cmd_forces_c_locale() {
        let cmd = SystemGit::new(".").git_cmd();
        let envs: Vec<_> = cmd.as_std().get_envs().collect();
        assert!(envs.contains(&(OsStr::new("LC_ALL"), Some(OsStr::new("C")))));
        assert!(envs.contains(&(OsStr::new("LANGUAGE"), Some(OsStr::new("C")))));
    }

    #[tokio::test]
    async fn test_missing_parent_tag_under_foreign_locale() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path();
        git(dir, &["init", "-q"]).await;
        commit(dir, "initial").await;
        git(dir, &["tag", "v1.0.0"]).await;

        let repo = SystemGit::new(dir);
        let output = repo
            .git_cmd()
            .env("LANG", "de_DE.UTF-8")
            .args(["describe", "--abbrev=0", "--tags", "v1.0.0^"])
            .output()
            .await
            .unwrap();
        assert!(!output.status.success());
        assert!(String::from_utf8_lossy(&output.stderr).contains("Not a valid object name"));

        assert_eq!(repo.describe_tag("v1.0.0^").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_describe_and_log_against_real_repository() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path();
        git(dir, &["init", "-q"]).await;
        commit(dir, "initial").await;
        git(dir, &["tag", "v1.0.0"]).await;
        commit(dir, "fix bug").await;
        commit(dir, "add feature").await;
        commit(dir, "bump version").await;
        git(dir, &["tag", "v1.1.0"]).await;

        let repo = SystemGit::new(dir);
        assert_eq!(
            repo.describe_tag("v1.1.0").await.unwrap().as_deref(),
            Some("v1.1.0")
        );
        assert_eq!(
            repo.describe_tag("v1.1.0^").await.unwrap().as_deref(),
            Some("v1.0.0")
        );
        assert_eq!(repo.describe_tag("v1.0.0^").await.unwrap(), None);

        let log = repo.log_oneline("v1.0.0...v1.1.0").await.unwrap();
        let subjects: Vec<&str> = log
            .lines()
            .map(|line| line.split_once(' ').unwrap().1)
            .collect();
        // Newest commit (the version bump) is skipped, oldest comes first.
        assert_eq!(subjects, vec!["fix bug", "add feature"]);
    }
}
