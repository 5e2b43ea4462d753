//! Asset upload for the active release.
//!
//! Uploads run one at a time. The existing-asset check and the upload are not
//! atomic on the platform side, so overlapping uploads could double-post a name.

use crate::error::Result;
use crate::git::TagHistory;
use crate::github::{ReleaseApi, ReleaseRegistry};
use bytes::Bytes;
use std::path::{Path, PathBuf};

/// Outcome of an upload pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    /// Release the assets went to
    pub release_id: u64,
    /// Names uploaded in this pass, in upload order
    pub uploaded: Vec<String>,
    /// Names skipped because the release already had them
    pub skipped: Vec<String>,
}

impl UploadReport {
    /// Number of assets uploaded in this pass
    pub fn uploaded_count(&self) -> usize {
        self.uploaded.len()
    }
}

/// Uploads files from the confined assets directory that the release lacks
pub struct AssetUploader<'a, A: ReleaseApi, H: TagHistory> {
    registry: &'a ReleaseRegistry<'a, A, H>,
    api: &'a A,
    assets_dir: PathBuf,
}

impl<'a, A: ReleaseApi, H: TagHistory> AssetUploader<'a, A, H> {
    /// `assets_dir` must come from [`crate::config::ReleaseSettings`], which
    /// has already confined it to the root directory.
    pub fn new(registry: &'a ReleaseRegistry<'a, A, H>, api: &'a A, assets_dir: &Path) -> Self {
        Self {
            registry,
            api,
            assets_dir: assets_dir.to_path_buf(),
        }
    }

    /// Ensure the release, then upload every local file it does not carry yet
    pub async fn upload_assets(&self) -> Result<UploadReport> {
        let release = self.registry.ensure_release().await?;
        let local = list_asset_files(&self.assets_dir).await?;

        let (skipped, pending): (Vec<String>, Vec<String>) =
            local.into_iter().partition(|name| release.has_asset(name));

        let mut report = UploadReport {
            release_id: release.id,
            uploaded: Vec::with_capacity(pending.len()),
            skipped,
        };

        for name in pending {
            log::info!("> Upload asset: {name}");
            let content = tokio::fs::read(self.assets_dir.join(&name)).await?;
            let asset = self
                .api
                .upload_release_asset(&release, &name, Bytes::from(content))
                .await?;
            log::debug!("Uploaded {} ({} bytes)", asset.name, asset.size);
            report.uploaded.push(name);
        }

        if report.uploaded.is_empty() {
            log::info!("No asset to upload");
        } else {
            log::info!("Done");
        }
        Ok(report)
    }
}

/// Regular files directly inside `dir`, sorted by name.
///
/// Symlinks are not followed, so a link cannot pull in a file from outside
/// the confined directory.
async fn list_asset_files(dir: &Path) -> Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            log::warn!("Skipping non UTF-8 file name: {:?}", name);
            continue;
        };
        if !entry.file_type().await?.is_file() {
            log::warn!("Skipping non-file entry: {name}");
            continue;
        }
        names.push(name.to_string());
    }
    names.sort();
    Ok(names)
}
