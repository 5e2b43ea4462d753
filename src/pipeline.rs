//! The publish pipeline: notes, release, assets, notification.

use crate::config::ReleaseSettings;
use crate::error::Result;
use crate::git::TagHistory;
use crate::github::{AssetUploader, ReleaseApi, ReleaseRegistry, ReleaseTarget, UploadReport};
use crate::notes::NotesContext;
use crate::notify::{Notifier, NotifyOutcome};

/// Registry for the configured tag
pub fn registry<'a, A: ReleaseApi, H: TagHistory>(
    api: &'a A,
    history: &'a H,
    settings: &ReleaseSettings,
) -> ReleaseRegistry<'a, A, H> {
    ReleaseRegistry::new(
        api,
        history,
        NotesContext::from_settings(settings),
        ReleaseTarget::from_settings(settings),
    )
}

/// Ensure the release and upload missing assets, then report the outcome.
///
/// The notification is sent whether or not the release steps succeeded, and
/// its own outcome never changes the returned result.
pub async fn publish_release<A: ReleaseApi, H: TagHistory>(
    api: &A,
    history: &H,
    settings: &ReleaseSettings,
    notifier: &Notifier,
) -> (Result<UploadReport>, NotifyOutcome) {
    let registry = registry(api, history, settings);
    let uploader = AssetUploader::new(&registry, api, &settings.assets_dir);
    let result = uploader.upload_assets().await;

    let tag = settings.tag();
    let outcome = match &result {
        Ok(report) => {
            let description = format!(
                "{} asset(s) uploaded, {} already present.\n{}/{}/releases/tag/{}",
                report.uploaded_count(),
                report.skipped.len(),
                settings.server_url.trim_end_matches('/'),
                settings.repository(),
                tag
            );
            notifier
                .notify(&format!("Release {tag} published"), &description, true)
                .await
        }
        Err(e) => {
            notifier
                .notify(&format!("Release {tag} failed"), &e.to_string(), false)
                .await
        }
    };

    (result, outcome)
}
