//! Configuration for topicgen.
//!
//! Two layers:
//! - [`RunConfig`]: the per-run values (credentials, domain, count, target
//!   repository). Read once from the process environment; every value is
//!   required.
//! - [`Settings`]: endpoints, model, timeouts, and dataset location. Optional
//!   TOML file (`topicgen.toml`); every field has a default.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, TopicGenError};
use crate::types::{Domain, RepoSlug, TopicCount};

/// Settings file looked up in the working directory when no path is given.
pub const DEFAULT_SETTINGS_FILE: &str = "topicgen.toml";

/// Environment variable names for the run configuration.
const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
const ENV_DOMAIN: &str = "DOMAIN";
const ENV_NUM_TOPICS: &str = "NUM_TOPICS";
const ENV_REPO_NAME: &str = "REPO_NAME";

// ---------------------------------------------------------------------------
// Secret
// ---------------------------------------------------------------------------

/// A credential that never shows up in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw credential, for building request headers only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

// ---------------------------------------------------------------------------
// RunConfig (environment)
// ---------------------------------------------------------------------------

/// Per-run configuration, populated once at startup and passed by reference.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Gemini API key (`GEMINI_API_KEY`).
    pub gemini_api_key: Secret,
    /// GitHub token with permission to create issues (`GITHUB_TOKEN`).
    pub github_token: Secret,
    /// Domain to generate topics for (`DOMAIN`).
    pub domain: Domain,
    /// Number of topics to request (`NUM_TOPICS`).
    pub num_topics: TopicCount,
    /// Repository the issue is filed in (`REPO_NAME`).
    pub repo: RepoSlug,
}

impl RunConfig {
    /// Read the run configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the run configuration from any key lookup.
    ///
    /// Empty values count as missing. All missing keys are reported in one
    /// error so a misconfigured workflow is fixed in a single pass.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let gemini_api_key = get(ENV_GEMINI_API_KEY);
        let github_token = get(ENV_GITHUB_TOKEN);
        let domain = get(ENV_DOMAIN);
        let num_topics = get(ENV_NUM_TOPICS);
        let repo = get(ENV_REPO_NAME);

        let missing: Vec<&str> = [
            (ENV_GEMINI_API_KEY, gemini_api_key.is_none()),
            (ENV_GITHUB_TOKEN, github_token.is_none()),
            (ENV_DOMAIN, domain.is_none()),
            (ENV_NUM_TOPICS, num_topics.is_none()),
            (ENV_REPO_NAME, repo.is_none()),
        ]
        .into_iter()
        .filter_map(|(key, absent)| absent.then_some(key))
        .collect();

        let (
            Some(gemini_api_key),
            Some(github_token),
            Some(domain),
            Some(num_topics),
            Some(repo),
        ) = (gemini_api_key, github_token, domain, num_topics, repo)
        else {
            return Err(TopicGenError::config(format!(
                "missing required environment variable(s): {}",
                missing.join(", ")
            )));
        };

        let domain = Domain::new(&domain).map_err(|e| in_var(ENV_DOMAIN, e))?;
        let num_topics = num_topics
            .parse::<TopicCount>()
            .map_err(|e| in_var(ENV_NUM_TOPICS, e))?;
        let repo = repo.parse::<RepoSlug>().map_err(|e| in_var(ENV_REPO_NAME, e))?;

        Ok(Self {
            gemini_api_key: Secret::new(gemini_api_key.trim()),
            github_token: Secret::new(github_token.trim()),
            domain,
            num_topics,
            repo,
        })
    }
}

/// Re-label a value error as a config error naming the offending variable.
fn in_var(key: &str, err: TopicGenError) -> TopicGenError {
    let detail = match err {
        TopicGenError::Validation { message } => message,
        other => other.to_string(),
    };
    TopicGenError::config(format!("{key}: {detail}"))
}

// ---------------------------------------------------------------------------
// Settings (TOML)
// ---------------------------------------------------------------------------

/// Tunable settings, deserialized from `topicgen.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Dataset location and table conventions.
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Gemini endpoint and model.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// GitHub endpoint.
    #[serde(default)]
    pub github: GitHubConfig,
}

/// `[dataset]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Markdown file holding the existing topics.
    #[serde(default = "default_dataset_path")]
    pub path: PathBuf,

    /// Prefix of the identifiers in a topic table's first column.
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
            id_prefix: default_id_prefix(),
        }
    }
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("golden_dataset.md")
}
fn default_id_prefix() -> String {
    "rub_".into()
}

/// `[gemini]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API root; `v1beta/models/...` is appended.
    #[serde(default = "default_gemini_base")]
    pub api_base: Url,

    /// Model used for generation.
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds.
    #[serde(default = "default_gemini_timeout")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base: default_gemini_base(),
            model: default_model(),
            timeout_secs: default_gemini_timeout(),
        }
    }
}

fn default_gemini_base() -> Url {
    Url::parse("https://generativelanguage.googleapis.com").expect("valid default Gemini URL")
}
fn default_model() -> String {
    "gemini-1.5-flash".into()
}
fn default_gemini_timeout() -> u64 {
    60
}

/// `[github]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// REST API root.
    #[serde(default = "default_github_base")]
    pub api_base: Url,

    /// Request timeout in seconds.
    #[serde(default = "default_github_timeout")]
    pub timeout_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base: default_github_base(),
            timeout_secs: default_github_timeout(),
        }
    }
}

fn default_github_base() -> Url {
    Url::parse("https://api.github.com").expect("valid default GitHub URL")
}
fn default_github_timeout() -> u64 {
    10
}

// ---------------------------------------------------------------------------
// Settings loading
// ---------------------------------------------------------------------------

/// Load settings.
///
/// An explicit path must exist. Without one, `./topicgen.toml` is used when
/// present, otherwise the built-in defaults.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(TopicGenError::config(format!(
                "settings file {} does not exist",
                path.display()
            )));
        }
        return load_settings_from(path);
    }

    let path = Path::new(DEFAULT_SETTINGS_FILE);
    if !path.exists() {
        tracing::debug!(?path, "settings file not found, using defaults");
        return Ok(Settings::default());
    }

    load_settings_from(path)
}

/// Load settings from a specific file path.
pub fn load_settings_from(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path).map_err(|e| TopicGenError::io(path, e))?;

    let settings: Settings = toml::from_str(&content).map_err(|e| {
        TopicGenError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    tracing::debug!(?path, model = %settings.gemini.model, "loaded settings");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn full_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("GEMINI_API_KEY", "gm-key"),
            ("GITHUB_TOKEN", "ghp_token"),
            ("DOMAIN", "Psychology"),
            ("NUM_TOPICS", "5"),
            ("REPO_NAME", "octo-org/essays"),
        ])
    }

    fn lookup(env: &HashMap<&'static str, &'static str>) -> impl Fn(&str) -> Option<String> {
        move |key| env.get(key).map(|v| v.to_string())
    }

    #[test]
    fn run_config_from_complete_env() {
        let env = full_env();
        let config = RunConfig::from_lookup(lookup(&env)).expect("complete env");
        assert_eq!(config.domain.as_str(), "Psychology");
        assert_eq!(config.num_topics.get(), 5);
        assert_eq!(config.repo.to_string(), "octo-org/essays");
        assert_eq!(config.github_token.expose(), "ghp_token");
    }

    #[test]
    fn run_config_reports_every_missing_var() {
        let mut env = full_env();
        env.remove("GITHUB_TOKEN");
        env.insert("REPO_NAME", "   ");

        let err = RunConfig::from_lookup(lookup(&env)).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("config error: missing required"), "{msg}");
        assert!(msg.contains("GITHUB_TOKEN"));
        assert!(msg.contains("REPO_NAME"));
        assert!(!msg.contains("DOMAIN"));
    }

    #[test]
    fn run_config_rejects_bad_values() {
        let mut env = full_env();
        env.insert("NUM_TOPICS", "zero");
        let err = RunConfig::from_lookup(lookup(&env)).unwrap_err();
        assert!(matches!(err, TopicGenError::Config { .. }));
        assert!(err.to_string().contains("NUM_TOPICS"));

        let mut env = full_env();
        env.insert("REPO_NAME", "just-a-name");
        let err = RunConfig::from_lookup(lookup(&env)).unwrap_err();
        assert!(err.to_string().contains("REPO_NAME"));
    }

    #[test]
    fn secrets_are_redacted_in_debug() {
        let env = full_env();
        let config = RunConfig::from_lookup(lookup(&env)).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("gm-key"));
        assert!(!debug.contains("ghp_token"));
        assert!(debug.contains("Secret(***)"));
    }

    #[test]
    fn default_settings_serialize() {
        let settings = Settings::default();
        let toml_str = toml::to_string_pretty(&settings).expect("serialize default settings");
        assert!(toml_str.contains("golden_dataset.md"));
        assert!(toml_str.contains("gemini-1.5-flash"));
    }

    #[test]
    fn partial_settings_fill_defaults() {
        let toml_str = r#"
[gemini]
model = "gemini-2.0-flash"

[dataset]
path = "data/topics.md"
"#;
        let settings: Settings = toml::from_str(toml_str).expect("parse");
        assert_eq!(settings.gemini.model, "gemini-2.0-flash");
        assert_eq!(settings.gemini.timeout_secs, 60);
        assert_eq!(settings.dataset.path, PathBuf::from("data/topics.md"));
        assert_eq!(settings.dataset.id_prefix, "rub_");
        assert_eq!(settings.github.api_base.as_str(), "https://api.github.com/");
        assert_eq!(settings.github.timeout_secs, 10);
    }

    #[test]
    fn explicit_missing_settings_file_is_an_error() {
        let err = load_settings(Some(Path::new("/nonexistent/topicgen.toml"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn settings_fixture_loads() {
        let settings =
            load_settings_from(Path::new("../../../fixtures/config/topicgen.toml"))
                .expect("read settings fixture");
        assert_eq!(settings.dataset.id_prefix, "rub_");
        assert_eq!(settings.gemini.model, "gemini-1.5-pro");
        assert_eq!(settings.github.timeout_secs, 15);
    }
}
