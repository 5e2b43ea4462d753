//! Release lookup and creation for the active tag

use crate::config::ReleaseSettings;
use crate::error::Result;
use crate::git::TagHistory;
use crate::github::{CreateReleaseRequest, Release, ReleaseApi};
use crate::notes::{CommitLogFormatter, NotesContext};

/// Settings that shape a created release
#[derive(Debug, Clone)]
pub struct ReleaseTarget {
    /// Tag, `v{version}`
    pub tag: String,
    /// Display name
    pub name: String,
    /// Prerelease flag
    pub prerelease: bool,
}

impl ReleaseTarget {
    /// Target for the configured version
    pub fn from_settings(settings: &ReleaseSettings) -> Self {
        Self {
            tag: settings.tag(),
            name: settings.release_name.clone(),
            prerelease: settings.prerelease,
        }
    }
}

/// Finds or creates the release record for one tag
pub struct ReleaseRegistry<'a, A: ReleaseApi, H: TagHistory> {
    /// Hosting platform client
    api: &'a A,
    /// Notes source for new releases
    formatter: CommitLogFormatter<'a, H>,
    target: ReleaseTarget,
}

impl<'a, A: ReleaseApi, H: TagHistory> ReleaseRegistry<'a, A, H> {
    /// Create a registry for `target`
    pub fn new(api: &'a A, history: &'a H, notes: NotesContext, target: ReleaseTarget) -> Self {
        Self {
            api,
            formatter: CommitLogFormatter::new(history, notes),
            target,
        }
    }

    /// The active tag
    pub fn tag(&self) -> &str {
        &self.target.tag
    }

    /// Look up the release for `tag`.
    ///
    /// A missing release is `Ok(None)`; every other platform error propagates.
    pub async fn find_release(&self, tag: &str) -> Result<Option<Release>> {
        let release = self.api.get_release_by_tag(tag).await?;
        if release.is_some() {
            log::info!("Found release: {tag}");
        }
        Ok(release)
    }

    /// Create a release. Callers must have checked that none exists.
    pub async fn create_release(
        &self,
        tag: &str,
        name: &str,
        notes: String,
        prerelease: bool,
    ) -> Result<Release> {
        log::info!("Create release: {tag}");
        let request = CreateReleaseRequest {
            tag_name: tag.to_string(),
            name: name.to_string(),
            body: notes,
            prerelease,
        };
        self.api.create_release(&request).await
    }

    /// Existing release for the active tag, or a new one with generated notes.
    ///
    /// Looks up before creating, so repeated calls create at most once.
    pub async fn ensure_release(&self) -> Result<Release> {
        if let Some(release) = self.find_release(&self.target.tag).await? {
            return Ok(release);
        }
        let notes = self.formatter.render_notes(&self.target.tag).await?;
        self.create_release(
            &self.target.tag,
            &self.target.name,
            notes,
            self.target.prerelease,
        )
        .await
    }

    /// Whether the active tag's release carries `file_name`.
    ///
    /// No release means no asset.
    pub async fn has_asset(&self, file_name: &str) -> Result<bool> {
        Ok(self
            .find_release(&self.target.tag)
            .await?
            .is_some_and(|release| release.has_asset(file_name)))
    }
}
