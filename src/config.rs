//! Configuration management for gamesource using the prefer crate.
//!
//! Values are resolved in layers: built-in defaults, then the config file
//! (discovered by prefer or given with `--config`), then environment
//! variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::finder::{CandidateTemplate, FinderOptions};

/// Default bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 8123;

/// Default page fetch timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

/// Default timeout for a single candidate probe in seconds.
pub const DEFAULT_PROBE_TIMEOUT: u64 = 10;

/// Errors loading a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Host the server binds to.
    pub host: String,
    /// Port the server binds to.
    pub port: u16,
    /// User agent config (None = default browser, "random", or a custom string).
    pub user_agent: Option<String>,
    /// Fixed Referer for outbound requests (None = origin of the fetched page).
    pub referer: Option<String>,
    /// Timeout for fetching the listing page.
    pub request_timeout: Duration,
    /// Timeout for each candidate probe.
    pub probe_timeout: Duration,
    /// Extraction allow-list, player ids and probe templates.
    pub finder: FinderOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            user_agent: None,
            referer: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT),
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT),
            finder: FinderOptions::default(),
        }
    }
}

impl Settings {
    /// Apply environment overrides: `HOST`, `PORT` and `GAMESOURCE_USER_AGENT`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = var("HOST") {
            tracing::debug!("Using HOST from environment: {}", host);
            self.host = host;
        }
        if let Some(port) = var("PORT") {
            match port.trim().parse::<u16>() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!("Ignoring invalid PORT value: {}", port),
            }
        }
        if let Some(user_agent) = var("GAMESOURCE_USER_AGENT") {
            self.user_agent = Some(user_agent);
        }
    }
}

/// Finder section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinderConfig {
    /// CDN host fragments an iframe `src` must contain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cdn_fragments: Option<Vec<String>>,
    /// Element ids checked when no iframe matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_ids: Option<Vec<String>>,
    /// Ordered candidate templates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<Vec<CandidateTemplate>>,
}

impl FinderConfig {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,
    /// Page fetch timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    /// Per-candidate probe timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe_timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "FinderConfig::is_default")]
    pub finder: FinderConfig,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Falls back to defaults when no config file is found or it fails to parse.
    pub async fn load() -> Self {
        match prefer::load("gamesource").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("Ignoring config file: {}", e);
                            Self::default()
                        }
                    }
                } else {
                    Self::default()
                }
            }
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// Format is chosen by extension: TOML, YAML, otherwise JSON.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let mut config = Self::parse(&contents, path)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        Ok(match ext {
            "toml" => toml::from_str(contents)?,
            "yaml" | "yml" => serde_yaml::from_str(contents)?,
            _ => serde_json::from_str(contents)?,
        })
    }

    /// Apply config values to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref host) = self.host {
            settings.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = Some(user_agent.clone());
        }
        if let Some(ref referer) = self.referer {
            settings.referer = Some(referer.clone());
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = Duration::from_secs(timeout);
        }
        if let Some(timeout) = self.probe_timeout {
            settings.probe_timeout = Duration::from_secs(timeout);
        }
        if let Some(ref fragments) = self.finder.cdn_fragments {
            settings.finder.cdn_fragments = fragments.clone();
        }
        if let Some(ref ids) = self.finder.element_ids {
            settings.finder.element_ids = ids.clone();
        }
        if let Some(ref templates) = self.finder.templates {
            settings.finder.templates = templates.clone();
        }
    }

    /// Snapshot of resolved settings in config file form.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            host: Some(settings.host.clone()),
            port: Some(settings.port),
            user_agent: settings.user_agent.clone(),
            referer: settings.referer.clone(),
            request_timeout: Some(settings.request_timeout.as_secs()),
            probe_timeout: Some(settings.probe_timeout.as_secs()),
            finder: FinderConfig {
                cdn_fragments: Some(settings.finder.cdn_fragments.clone()),
                element_ids: Some(settings.finder.element_ids.clone()),
                templates: Some(settings.finder.templates.clone()),
            },
            source_path: None,
        }
    }
}

/// Resolve settings from defaults, config file and environment.
///
/// An explicit `config_path` must load; auto-discovered files that fail to
/// parse are skipped with a warning.
pub async fn load_settings(
    config_path: Option<&Path>,
) -> Result<(Settings, Config), ConfigError> {
    let config = match config_path {
        Some(path) => Config::load_from_path(path).await?,
        None => Config::load().await,
    };

    if let Some(ref path) = config.source_path {
        tracing::debug!("Loaded config from {}", path.display());
    }

    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    settings.apply_env(|key| std::env::var(key).ok());

    Ok((settings, config))
}
