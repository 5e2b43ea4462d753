//! Environment-driven configuration.
//!
//! The environment is captured once into an [`EnvConfig`] snapshot and then
//! validated into [`ReleaseSettings`], which every component borrows. Nothing
//! mutates configuration after [`ReleaseSettings::load`] returns.

use crate::error::{ConfigError, Result};
use path_absolutize::Absolutize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Web server used for compare links when `GITHUB_SERVER_URL` is unset
pub const DEFAULT_SERVER_URL: &str = "https://github.com";
/// Repository slug used when `GITHUB_REPOSITORY` is unset
pub const DEFAULT_REPOSITORY: &str = "violentmonkey/violentmonkey";
/// REST API base used when `GITHUB_API_URL` is unset
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Warning block prepended to prerelease notes when `PRERELEASE_NOTICE` is unset
pub const DEFAULT_PRERELEASE_NOTICE: &str = "**This is a beta release, use it at your own risk.**<br>\
If you already use a stable version, back up your data before installing the beta.";

/// Immutable snapshot of the process environment
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    vars: HashMap<String, String>,
}

impl EnvConfig {
    /// Capture the current process environment
    pub fn from_env() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Build a snapshot from explicit pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Look up a variable; empty values count as unset
    pub fn get(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .filter(|value| !value.is_empty())
            .cloned()
    }
}

/// Validated configuration for one run
#[derive(Debug, Clone)]
pub struct ReleaseSettings {
    /// Version string without the `v` prefix
    pub version: String,
    /// Display name for a newly created release
    pub release_name: String,
    /// Whether a created release is marked prerelease
    pub prerelease: bool,
    /// Warning block for prerelease notes
    pub prerelease_notice: String,
    /// Confinement root (absolute)
    pub root_dir: PathBuf,
    /// Assets directory (absolute, inside `root_dir`)
    pub assets_dir: PathBuf,
    /// Optional notification webhook
    pub webhook_url: Option<String>,
    /// Web server URL for compare links
    pub server_url: String,
    /// REST API base URL
    pub api_url: String,
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    token: Option<String>,
}

impl ReleaseSettings {
    /// Validate the environment snapshot.
    ///
    /// Fails before touching the filesystem or network when a required
    /// variable is missing or `ASSETS_DIR` escapes `SAFE_ROOT_DIR`.
    pub fn load(env: &EnvConfig) -> Result<Self> {
        let version = env
            .get("VERSION")
            .ok_or(ConfigError::MissingVariable { name: "VERSION" })?;

        let root_raw = env.get("SAFE_ROOT_DIR").ok_or(ConfigError::MissingVariable {
            name: "SAFE_ROOT_DIR",
        })?;
        let root_dir = absolutize("SAFE_ROOT_DIR", &root_raw, Path::new(&root_raw))?;
        let assets_raw = env.get("ASSETS_DIR").unwrap_or_default();
        let assets_dir = confine("ASSETS_DIR", &assets_raw, &root_dir)?;

        let slug = env
            .get("GITHUB_REPOSITORY")
            .unwrap_or_else(|| DEFAULT_REPOSITORY.to_string());
        let (owner, repo) = parse_repository(&slug)?;

        let tag = format!("v{version}");
        Ok(Self {
            release_name: env.get("RELEASE_NAME").unwrap_or_else(|| tag.clone()),
            prerelease: env.get("PRERELEASE").as_deref() == Some("true"),
            prerelease_notice: env
                .get("PRERELEASE_NOTICE")
                .unwrap_or_else(|| DEFAULT_PRERELEASE_NOTICE.to_string()),
            root_dir,
            assets_dir,
            webhook_url: env.get("DISCORD_WEBHOOK_RELEASE"),
            server_url: env
                .get("GITHUB_SERVER_URL")
                .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
            api_url: env
                .get("GITHUB_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            owner,
            repo,
            token: env.get("GITHUB_TOKEN").or_else(|| env.get("GH_TOKEN")),
            version,
        })
    }

    /// The active tag, `v{version}`
    pub fn tag(&self) -> String {
        format!("v{}", self.version)
    }

    /// `owner/repo`
    pub fn repository(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Credential for the hosting platform.
    ///
    /// Checked on demand so commands that never reach the platform run without one.
    pub fn token(&self) -> Result<&str> {
        Ok(self.token.as_deref().ok_or(ConfigError::MissingToken)?)
    }
}

/// Resolve `relative` against `root` and require the result to stay inside it.
///
/// Resolution is lexical, and containment is checked per path component, so a
/// sibling such as `/srv/root-evil` does not pass for `/srv/root`.
pub fn confine(name: &'static str, relative: &str, root: &Path) -> Result<PathBuf> {
    let joined = root.join(relative);
    let resolved = absolutize(name, relative, &joined)?;
    if !resolved.starts_with(root) {
        return Err(ConfigError::PathOutsideRoot {
            name,
            value: relative.to_string(),
            resolved,
            root: root.to_path_buf(),
        }
        .into());
    }
    Ok(resolved)
}

fn absolutize(name: &'static str, value: &str, path: &Path) -> Result<PathBuf> {
    path.absolutize()
        .map(|p| p.into_owned())
        .map_err(|e| {
            ConfigError::UnresolvablePath {
                name,
                value: value.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
}

fn parse_repository(slug: &str) -> Result<(String, String)> {
    match slug.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(ConfigError::InvalidRepository {
            value: slug.to_string(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReleaseError;

    fn base_env(root: &str, assets: &str) -> EnvConfig {
        EnvConfig::from_pairs([
            ("VERSION", "2.19.0"),
            ("SAFE_ROOT_DIR", root),
            ("ASSETS_DIR", assets),
            ("GITHUB_TOKEN", "ghs_test"),
        ])
    }

    #[test]
    fn test_defaults_applied() {
        let settings = ReleaseSettings::load(&base_env("/srv/build", "dist")).unwrap();
        assert_eq!(settings.tag(), "v2.19.0");
        assert_eq!(settings.release_name, "v2.19.0");
        assert!(!settings.prerelease);
        assert_eq!(settings.server_url, DEFAULT_SERVER_URL);
        assert_eq!(settings.repository(), DEFAULT_REPOSITORY);
        assert_eq!(settings.assets_dir, PathBuf::from("/srv/build/dist"));
        assert_eq!(settings.webhook_url, None);
    }

    #[test]
    fn test_prerelease_only_for_literal_true() {
        let mut pairs = vec![
            ("VERSION", "1.0.0"),
            ("SAFE_ROOT_DIR", "/srv/build"),
            ("PRERELEASE", "TRUE"),
        ];
        let settings = ReleaseSettings::load(&EnvConfig::from_pairs(pairs.clone())).unwrap();
        assert!(!settings.prerelease);

        pairs[2] = ("PRERELEASE", "true");
        let settings = ReleaseSettings::load(&EnvConfig::from_pairs(pairs)).unwrap();
        assert!(settings.prerelease);
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let env = EnvConfig::from_pairs([("VERSION", "1.0.0")]);
        let err = ReleaseSettings::load(&env).unwrap_err();
        assert!(matches!(
            err,
            ReleaseError::Config(ConfigError::MissingVariable {
                name: "SAFE_ROOT_DIR"
            })
        ));
    }

    #[test]
    fn test_empty_version_counts_as_missing() {
        let env = EnvConfig::from_pairs([("VERSION", ""), ("SAFE_ROOT_DIR", "/srv")]);
        assert!(ReleaseSettings::load(&env).is_err());
    }

    #[test]
    fn test_traversal_rejected() {
        let err = ReleaseSettings::load(&base_env("/srv/build", "../../etc")).unwrap_err();
        assert!(matches!(
            err,
            ReleaseError::Config(ConfigError::PathOutsideRoot { name: "ASSETS_DIR", .. })
        ));
    }

    #[test]
    fn test_absolute_assets_dir_rejected() {
        assert!(ReleaseSettings::load(&base_env("/srv/build", "/tmp/dist")).is_err());
    }

    #[test]
    fn test_sibling_prefix_rejected() {
        let err = confine("ASSETS_DIR", "../build-evil", Path::new("/srv/build")).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_inner_dotdot_allowed() {
        let path = confine("ASSETS_DIR", "dist/../out", Path::new("/srv/build")).unwrap();
        assert_eq!(path, PathBuf::from("/srv/build/out"));
    }

    #[test]
    fn test_empty_assets_dir_is_root() {
        let settings = ReleaseSettings::load(&base_env("/srv/build", "")).unwrap();
        assert_eq!(settings.assets_dir, PathBuf::from("/srv/build"));
    }

    #[test]
    fn test_token_fallback_and_absence() {
        let env = EnvConfig::from_pairs([
            ("VERSION", "1.0.0"),
            ("SAFE_ROOT_DIR", "/srv"),
            ("GH_TOKEN", "gho_fallback"),
        ]);
        let settings = ReleaseSettings::load(&env).unwrap();
        assert_eq!(settings.token().unwrap(), "gho_fallback");

        let env = EnvConfig::from_pairs([("VERSION", "1.0.0"), ("SAFE_ROOT_DIR", "/srv")]);
        let settings = ReleaseSettings::load(&env).unwrap();
        assert!(matches!(
            settings.token(),
            Err(ReleaseError::Config(ConfigError::MissingToken))
        ));
    }

    #[test]
    fn test_repository_slug_validation() {
        assert!(parse_repository("owner/repo").is_ok());
        assert!(parse_repository("owner").is_err());
        assert!(parse_repository("/repo").is_err());
        assert!(parse_repository("a/b/c").is_err());
    }
}
