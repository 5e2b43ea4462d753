//! Release status notification to a chat webhook.
//!
//! Notification is best effort: every failure is logged and reported as a
//! [`NotifyOutcome`], never as an error, and nothing is sent to a URL that has
//! not passed [`validate_webhook_url`].

use serde::Serialize;
use std::fmt;
use url::Url;

/// Hosts a webhook URL may point at
pub const ALLOWED_WEBHOOK_DOMAINS: &[&str] = &["discord.com", "discordapp.com"];

/// Embed color for a successful run
pub const SUCCESS_COLOR: u32 = 0x00ff00;
/// Embed color for a failed run
pub const FAILURE_COLOR: u32 = 0xff0000;

/// Why a configured webhook URL was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookRejection {
    /// Not a URL at all
    Unparsable,
    /// Scheme other than `https`
    InsecureScheme(String),
    /// Host missing or not on the allow-list
    DisallowedHost(String),
}

impl fmt::Display for WebhookRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebhookRejection::Unparsable => write!(f, "URL could not be parsed"),
            WebhookRejection::InsecureScheme(scheme) => write!(f, "protocol {scheme}: is not https:"),
            WebhookRejection::DisallowedHost(host) => write!(f, "domain {host} is not allowed"),
        }
    }
}

/// What happened to a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// Webhook accepted the message
    Delivered,
    /// No webhook configured
    Skipped,
    /// Webhook URL failed validation; nothing was sent
    Rejected(WebhookRejection),
    /// Request failed or the webhook answered with a non-success status
    Failed(String),
}

/// One embed of a webhook message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
    /// Title line
    pub title: String,
    /// Body text
    pub description: String,
    /// Side bar color
    pub color: u32,
}

/// JSON body posted to the webhook
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookPayload {
    /// Message embeds
    pub embeds: Vec<Embed>,
}

impl WebhookPayload {
    /// Single-embed status message
    pub fn status(title: &str, description: &str, success: bool) -> Self {
        Self {
            embeds: vec![Embed {
                title: title.to_string(),
                description: description.to_string(),
                color: if success { SUCCESS_COLOR } else { FAILURE_COLOR },
            }],
        }
    }
}

/// Check that `raw` is an https URL on one of `allowed` hosts
pub fn validate_webhook_url(raw: &str, allowed: &[&str]) -> Result<Url, WebhookRejection> {
    let url = Url::parse(raw).map_err(|_| WebhookRejection::Unparsable)?;
    if url.scheme() != "https" {
        return Err(WebhookRejection::InsecureScheme(url.scheme().to_string()));
    }
    match url.host_str() {
        Some(host) if allowed.contains(&host) => Ok(url),
        host => Err(WebhookRejection::DisallowedHost(
            host.unwrap_or_default().to_string(),
        )),
    }
}

/// Posts release status messages to the configured webhook
#[derive(Debug, Clone)]
pub struct Notifier {
    http: reqwest::Client,
    webhook_url: Option<String>,
}

impl Notifier {
    /// Notifier for an optional webhook URL
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            webhook_url,
        }
    }

    /// Validate the webhook and post one status message.
    pub async fn notify(&self, title: &str, description: &str, success: bool) -> NotifyOutcome {
        let Some(raw) = self.webhook_url.as_deref() else {
            log::warn!("DISCORD_WEBHOOK_RELEASE is not available!");
            return NotifyOutcome::Skipped;
        };

        let url = match validate_webhook_url(raw, ALLOWED_WEBHOOK_DOMAINS) {
            Ok(url) => url,
            Err(rejection) => {
                match &rejection {
                    WebhookRejection::Unparsable => {
                        log::error!("Invalid DISCORD_WEBHOOK_RELEASE URL: {raw}")
                    }
                    WebhookRejection::InsecureScheme(scheme) => {
                        log::error!("Invalid DISCORD_WEBHOOK_RELEASE protocol: {scheme}:")
                    }
                    WebhookRejection::DisallowedHost(host) => {
                        log::error!("Invalid DISCORD_WEBHOOK_RELEASE domain: {host}")
                    }
                }
                return NotifyOutcome::Rejected(rejection);
            }
        };

        post_payload(
            &self.http,
            url,
            &WebhookPayload::status(title, description, success),
        )
        .await
    }
}

/// POST `payload` to an already validated `url`
pub(crate) async fn post_payload(
    http: &reqwest::Client,
    url: Url,
    payload: &WebhookPayload,
) -> NotifyOutcome {
    match http.post(url).json(payload).send().await {
        Ok(response) if response.status().is_success() => NotifyOutcome::Delivered,
        Ok(response) => {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("Webhook responded with {status}: {body}");
            NotifyOutcome::Failed(format!("{status}: {body}"))
        }
        Err(e) => {
            log::error!("Webhook request failed: {e}");
            NotifyOutcome::Failed(e.to_string())
        }
    }
}
