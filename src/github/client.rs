//! GitHub REST client for the release endpoints.

use crate::config::ReleaseSettings;
use crate::error::{GitHubError, Result};
use bytes::Bytes;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::future::Future;
use url::Url;

/// A release asset. Does not contain all fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Asset id
    pub id: u64,
    /// File name, unique within a release
    pub name: String,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
}

/// A GitHub release. Does not contain all fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Release id
    pub id: u64,
    /// Tag the release points at
    pub tag_name: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Release notes
    #[serde(default)]
    pub body: Option<String>,
    /// Prerelease flag
    #[serde(default)]
    pub prerelease: bool,
    /// Hypermedia upload URL, `.../assets{?name,label}`
    #[serde(default)]
    pub upload_url: String,
    /// Assets already attached
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl Release {
    /// Whether an asset with exactly `name` is attached
    pub fn has_asset(&self, name: &str) -> bool {
        self.assets.iter().any(|asset| asset.name == name)
    }
}

/// Body of a create-release request
#[derive(Debug, Clone, Serialize)]
pub struct CreateReleaseRequest {
    /// Tag to release
    pub tag_name: String,
    /// Display name
    pub name: String,
    /// Release notes
    pub body: String,
    /// Prerelease flag
    pub prerelease: bool,
}

/// Release operations on the hosting platform
pub trait ReleaseApi {
    /// Release for `tag`; `Ok(None)` when the platform has none
    fn get_release_by_tag(&self, tag: &str) -> impl Future<Output = Result<Option<Release>>>;

    /// Create a release
    fn create_release(&self, request: &CreateReleaseRequest) -> impl Future<Output = Result<Release>>;

    /// Attach `content` to `release` as `name`
    fn upload_release_asset(
        &self,
        release: &Release,
        name: &str,
        content: Bytes,
    ) -> impl Future<Output = Result<Asset>>;
}

/// reqwest-backed GitHub client, built once per run and shared by reference
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    owner: String,
    repo: String,
}

impl GitHubClient {
    /// Build a client from validated settings
    pub fn new(settings: &ReleaseSettings) -> Result<Self> {
        Self::with_base_url(
            &settings.api_url,
            settings.token()?,
            &settings.owner,
            &settings.repo,
        )
    }

    /// Build a client against an explicit API base URL
    pub fn with_base_url(api_url: &str, token: &str, owner: &str, repo: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static("2022-11-28"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
            GitHubError::Api {
                operation: "build client",
                status: 0,
                message: format!("token is not a valid header value: {e}"),
            }
        })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("release_helper/", env!("CARGO_PKG_VERSION"))),
        );

        let http = reqwest::Client::builder().default_headers(headers).build()?;
        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    fn repo_url(&self, path: &str) -> String {
        format!("{}/repos/{}/{}/{}", self.api_url, self.owner, self.repo, path)
    }
}

/// Map a non-success response to [`GitHubError::Api`]
async fn check(operation: &'static str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(GitHubError::Api {
        operation,
        status: status.as_u16(),
        message,
    }
    .into())
}

/// Expand the `{?name,label}` upload template for `name`
pub fn asset_upload_url(upload_url: &str, name: &str) -> Result<Url> {
    let base = upload_url.split('{').next().unwrap_or(upload_url);
    let mut url = Url::parse(base).map_err(|e| GitHubError::InvalidUploadUrl {
        url: upload_url.to_string(),
        reason: e.to_string(),
    })?;
    url.query_pairs_mut().clear().append_pair("name", name);
    Ok(url)
}

impl ReleaseApi for GitHubClient {
    async fn get_release_by_tag(&self, tag: &str) -> Result<Option<Release>> {
        let response = self
            .http
            .get(self.repo_url(&format!("releases/tags/{tag}")))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let release = check("get release by tag", response).await?.json().await?;
        Ok(Some(release))
    }

    async fn create_release(&self, request: &CreateReleaseRequest) -> Result<Release> {
        let response = self
            .http
            .post(self.repo_url("releases"))
            .json(request)
            .send()
            .await?;
        Ok(check("create release", response).await?.json().await?)
    }

    async fn upload_release_asset(&self, release: &Release, name: &str, content: Bytes) -> Result<Asset> {
        let url = asset_upload_url(&release.upload_url, name)?;
        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(content)
            .send()
            .await?;
        Ok(check("upload release asset", response).await?.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReleaseError;
    use mockito::Matcher;

    fn release_json(server_url: &str, assets: &str) -> String {
        format!(
            r#"{{"id":42,"tag_name":"v1.1.0","name":"v1.1.0","body":"notes","prerelease":false,
               "upload_url":"{server_url}/upload/repos/o/r/releases/42/assets{{?name,label}}",
               "assets":{assets}}}"#
        )
    }

    #[test]
    fn test_upload_url_template_expanded() {
        let url = asset_upload_url(
            "https://uploads.github.com/repos/o/r/releases/1/assets{?name,label}",
            "app v1.zip",
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://uploads.github.com/repos/o/r/releases/1/assets?name=app+v1.zip"
        );
    }

    #[test]
    fn test_upload_url_invalid() {
        assert!(asset_upload_url("not a url{?name}", "x").is_err());
    }

    #[tokio::test]
    async fn test_missing_release_is_none() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/o/r/releases/tags/v1.1.0")
            .match_header("authorization", "Bearer secret")
            .with_status(404)
            .with_body(r#"{"message":"Not Found"}"#)
            .create_async()
            .await;

        let client = GitHubClient::with_base_url(&server.url(), "secret", "o", "r").unwrap();
        assert_eq!(client.get_release_by_tag("v1.1.0").await.unwrap(), None);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_found_release_parsed() {
        let mut server = mockito::Server::new_async().await;
        let body = release_json(&server.url(), r#"[{"id":7,"name":"app.zip","size":3}]"#);
        server
            .mock("GET", "/repos/o/r/releases/tags/v1.1.0")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let client = GitHubClient::with_base_url(&server.url(), "secret", "o", "r").unwrap();
        let release = client.get_release_by_tag("v1.1.0").await.unwrap().unwrap();
        assert_eq!(release.id, 42);
        assert!(release.has_asset("app.zip"));
        assert!(!release.has_asset("App.zip"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/o/r/releases/tags/v1.1.0")
            .with_status(200)
            .with_body("{not json")
            .create_async()
            .await;

        let client = GitHubClient::with_base_url(&server.url(), "secret", "o", "r").unwrap();
        let err = client.get_release_by_tag("v1.1.0").await.unwrap_err();
        assert!(matches!(err, ReleaseError::Http(ref e) if e.is_decode()));
    }

    #[tokio::test]
    async fn test_server_error_propagates() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/o/r/releases/tags/v1.1.0")
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let client = GitHubClient::with_base_url(&server.url(), "secret", "o", "r").unwrap();
        let err = client.get_release_by_tag("v1.1.0").await.unwrap_err();
        assert!(matches!(
            err,
            ReleaseError::GitHub(GitHubError::Api { status: 502, .. })
        ));
    }

    #[tokio::test]
    async fn test_create_and_upload() {
        let mut server = mockito::Server::new_async().await;
        let create = server
            .mock("POST", "/repos/o/r/releases")
            .match_body(Matcher::PartialJsonString(
                r#"{"tag_name":"v1.1.0","prerelease":true}"#.to_string(),
            ))
            .with_status(201)
            .with_body(release_json(&server.url(), "[]"))
            .create_async()
            .await;
        let upload = server
            .mock("POST", "/upload/repos/o/r/releases/42/assets")
            .match_query(Matcher::UrlEncoded("name".into(), "app.exe".into()))
            .match_header("content-type", "application/octet-stream")
            .match_body("MZ")
            .with_status(201)
            .with_body(r#"{"id":9,"name":"app.exe","size":2}"#)
            .create_async()
            .await;

        let client = GitHubClient::with_base_url(&server.url(), "secret", "o", "r").unwrap();
        let release = client
            .create_release(&CreateReleaseRequest {
                tag_name: "v1.1.0".to_string(),
                name: "v1.1.0".to_string(),
                body: "notes".to_string(),
                prerelease: true,
            })
            .await
            .unwrap();
        let asset = client
            .upload_release_asset(&release, "app.exe", Bytes::from_static(b"MZ"))
            .await
            .unwrap();
        assert_eq!(asset.name, "app.exe");
        create.assert_async().await;
        upload.assert_async().await;
    }
}
