//! Command execution.
//!
//! The GitHub client and git backend are built once here and lent to every
//! component that needs them.

use crate::cli::{Args, Command};
use crate::config::{EnvConfig, ReleaseSettings};
use crate::error::Result;
use crate::git::SystemGit;
use crate::github::GitHubClient;
use crate::notify::{Notifier, NotifyOutcome};
use crate::pipeline;

/// Execute the selected step and return the process exit code
pub async fn execute_command(args: &Args, env: &EnvConfig) -> Result<i32> {
    let settings = ReleaseSettings::load(env)?;
    log::debug!(
        "Release {} for {} from {}",
        settings.tag(),
        settings.repository(),
        settings.assets_dir.display()
    );
    let history = SystemGit::new(std::env::current_dir()?);

    match args.command() {
        Command::Publish => {
            let client = GitHubClient::new(&settings)?;
            let notifier = Notifier::new(settings.webhook_url.clone());
            let (result, outcome) =
                pipeline::publish_release(&client, &history, &settings, &notifier).await;
            if !matches!(outcome, NotifyOutcome::Delivered) {
                log::debug!("Notification outcome: {outcome:?}");
            }
            let report = result?;
            println!("{}", report.uploaded_count());
            Ok(0)
        }
        Command::Ensure => {
            let client = GitHubClient::new(&settings)?;
            let release = pipeline::registry(&client, &history, &settings)
                .ensure_release()
                .await?;
            println!("{}", release.id);
            Ok(0)
        }
        Command::Upload => {
            let client = GitHubClient::new(&settings)?;
            let registry = pipeline::registry(&client, &history, &settings);
            let report = crate::github::AssetUploader::new(&registry, &client, &settings.assets_dir)
                .upload_assets()
                .await?;
            println!("{}", report.uploaded_count());
            Ok(0)
        }
        Command::HasAsset { name } => {
            let client = GitHubClient::new(&settings)?;
            let present = pipeline::registry(&client, &history, &settings)
                .has_asset(&name)
                .await?;
            println!("{present}");
            Ok(if present { 0 } else { 1 })
        }
        Command::Notes => {
            // Notes never touch the platform, so no client or token is needed.
            let notes = crate::notes::CommitLogFormatter::new(
                &history,
                crate::notes::NotesContext::from_settings(&settings),
            )
            .render_notes(&settings.tag())
            .await?;
            println!("{notes}");
            Ok(0)
        }
        Command::Notify {
            title,
            description,
            failure,
        } => {
            let notifier = Notifier::new(settings.webhook_url.clone());
            let outcome = notifier.notify(&title, &description, !failure).await;
            log::debug!("Notification outcome: {outcome:?}");
            Ok(0)
        }
    }
}
