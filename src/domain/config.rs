//! # Configuration
//!
//! Manages the loading and parsing of the application's configuration file (`config.yaml`).
//! Defines the structs for the Matrix login, the GitLab defaults, the bot's name and the brain backend.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub services: ServicesConfig,
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub brain: BrainConfig,
}

impl AppConfig {
    /// Reads and parses the YAML file, then applies the `GITLAB_*` environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut config: AppConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.services.gitlab.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }
}

/// Configuration for various connected services.
#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    pub matrix: MatrixConfig,
    #[serde(default)]
    pub gitlab: GitlabConfig,
}

/// Specific configuration for the Matrix service.
#[derive(Debug, Deserialize, Clone)]
pub struct MatrixConfig {
    pub username: String,
    pub password: String,
    pub homeserver: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Process-wide GitLab defaults.
/// Rooms override `url` and `token` through `access config`.
#[derive(Debug, Deserialize, Clone)]
pub struct GitlabConfig {
    #[serde(default = "default_gitlab_url")]
    pub url: String,
    #[serde(default)]
    pub token: Option<String>,
    /// Records rendered per list reply (and `per_page` sent to GitLab). 0 disables the limit.
    #[serde(default = "default_record_limit")]
    pub record_limit: usize,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for GitlabConfig {
    fn default() -> Self {
        Self {
            url: default_gitlab_url(),
            token: None,
            record_limit: default_record_limit(),
            timeout_secs: default_timeout(),
        }
    }
}

impl GitlabConfig {
    /// Applies `GITLAB_URL`, `GITLAB_TOKEN` and `GITLAB_RECORD_LIMIT`.
    /// The lookup is injected so tests don't touch the process environment.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("GITLAB_URL").filter(|v| !v.trim().is_empty()) {
            self.url = url;
        }
        if let Some(token) = lookup("GITLAB_TOKEN").filter(|v| !v.trim().is_empty()) {
            self.token = Some(token);
        }
        if let Some(limit) = lookup("GITLAB_RECORD_LIMIT") {
            match limit.trim().parse() {
                Ok(n) => self.record_limit = n,
                Err(_) => tracing::warn!("Ignoring invalid GITLAB_RECORD_LIMIT '{}'", limit),
            }
        }
    }
}

fn default_gitlab_url() -> String {
    "https://gitlab.com".to_string()
}

fn default_record_limit() -> usize {
    20
}

fn default_timeout() -> u64 {
    30
}

/// How the bot is addressed in a room.
#[derive(Debug, Deserialize, Clone)]
pub struct BotConfig {
    #[serde(default = "default_bot_name")]
    pub name: String,
    /// Short prefix (e.g. `!`) accepted instead of the name.
    #[serde(default)]
    pub alias: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            alias: None,
        }
    }
}

impl BotConfig {
    /// Name shown in guidance messages: the alias when set, the name otherwise.
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

fn default_bot_name() -> String {
    "gitbot".to_string()
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BrainBackend {
    Memory,
    #[default]
    File,
    Redis,
}

/// Where room context is persisted.
#[derive(Debug, Deserialize, Clone)]
pub struct BrainConfig {
    #[serde(default)]
    pub backend: BrainBackend,
    #[serde(default = "default_brain_path")]
    pub path: String,
    #[serde(default)]
    pub redis_url: Option<String>,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            backend: BrainBackend::default(),
            path: default_brain_path(),
            redis_url: None,
        }
    }
}

fn default_brain_path() -> String {
    "data/brain.json".to_string()
}
