//! Operational settings with layered precedence
//!
//! Loads settings from multiple sources with the following precedence (low to high):
//! 1. Built-in defaults
//! 2. Settings file (~/.tagpin/config.yaml, or an explicit path)
//! 3. Environment variables (TAGPIN_* prefix)
//! 4. CLI flags (handled by caller)

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use tracing::debug;
use url::Url;

/// Settings file name inside the config directory
pub const SETTINGS_FILE: &str = "config.yaml";

/// Complete operational settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    /// HTTP client configuration
    #[serde(default)]
    pub network: NetworkSettings,

    /// Registry API endpoints
    #[serde(default)]
    pub endpoints: EndpointSettings,
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkSettings {
    /// HTTP timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// User agent string for registry requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            http_timeout_secs: default_http_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Registry API endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EndpointSettings {
    /// Docker Hub API base URL
    #[serde(default = "default_docker_hub_api")]
    pub docker_hub_api: String,

    /// Quay API base URL
    #[serde(default = "default_quay_api")]
    pub quay_api: String,

    /// Registry hosts reached over plain HTTP
    #[serde(default)]
    pub insecure_registries: Vec<String>,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            docker_hub_api: default_docker_hub_api(),
            quay_api: default_quay_api(),
            insecure_registries: Vec::new(),
        }
    }
}

impl EndpointSettings {
    /// URL scheme used to reach a generic registry host
    pub fn scheme_for(&self, hostname: &str) -> &'static str {
        let host = hostname.split(':').next().unwrap_or(hostname);
        if host == "localhost"
            || host == "127.0.0.1"
            || self
                .insecure_registries
                .iter()
                .any(|r| r.eq_ignore_ascii_case(hostname))
        {
            "http"
        } else {
            "https"
        }
    }
}

fn default_http_timeout() -> u64 {
    30
}
fn default_user_agent() -> String {
    format!(
        "tagpin/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}
fn default_docker_hub_api() -> String {
    "https://hub.docker.com".to_string()
}
fn default_quay_api() -> String {
    "https://quay.io".to_string()
}

/// Settings hierarchy loader
pub struct SettingsLoader {
    /// Directory holding the settings file
    config_dir: Option<Utf8PathBuf>,
}

impl SettingsLoader {
    /// Create a loader rooted at ~/.tagpin
    pub fn new() -> Self {
        let config_dir = dirs::home_dir()
            .and_then(|home| Utf8PathBuf::from_path_buf(home).ok())
            .map(|home| home.join(".tagpin"));
        Self { config_dir }
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: Utf8PathBuf) -> Self {
        Self {
            config_dir: Some(config_dir),
        }
    }

    /// Default settings file location, whether or not it exists
    pub fn settings_path(&self) -> Option<Utf8PathBuf> {
        self.config_dir.as_ref().map(|dir| dir.join(SETTINGS_FILE))
    }

    /// Load settings from the config directory, if a settings file exists there
    pub fn load(&self) -> Result<Settings> {
        let path = self.settings_path().filter(|p| p.exists());

        match path {
            Some(path) => self.load_from(&path),
            None => {
                debug!("No settings file found, using defaults");
                self.finish(Settings::default())
            }
        }
    }

    /// Load settings from an explicit file; the file must exist
    pub fn load_from(&self, path: &Utf8Path) -> Result<Settings> {
        if !path.exists() {
            return Err(Error::invalid_config(format!(
                "settings file not found: {}",
                path
            )));
        }

        debug!("Loading settings from {}", path);
        let content = fs::read_to_string(path)?;
        let settings: Settings = serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))?;

        self.finish(settings)
    }

    fn finish(&self, settings: Settings) -> Result<Settings> {
        let settings = apply_env_overrides(settings)?;
        validate(&settings)?;
        Ok(settings)
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply environment variable overrides
fn apply_env_overrides(mut settings: Settings) -> Result<Settings> {
    if let Ok(val) = env::var("TAGPIN_HTTP_TIMEOUT_SECS") {
        settings.network.http_timeout_secs = val.parse().map_err(|_| {
            Error::invalid_config("TAGPIN_HTTP_TIMEOUT_SECS must be a valid number")
        })?;
    }

    if let Ok(val) = env::var("TAGPIN_USER_AGENT") {
        settings.network.user_agent = val;
    }

    if let Ok(val) = env::var("TAGPIN_DOCKER_HUB_API") {
        settings.endpoints.docker_hub_api = val;
    }

    if let Ok(val) = env::var("TAGPIN_QUAY_API") {
        settings.endpoints.quay_api = val;
    }

    if let Ok(val) = env::var("TAGPIN_INSECURE_REGISTRIES") {
        settings.endpoints.insecure_registries = val
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
    }

    Ok(settings)
}

fn validate(settings: &Settings) -> Result<()> {
    if settings.network.http_timeout_secs == 0 {
        return Err(Error::invalid_config(
            "http-timeout-secs must be greater than zero",
        ));
    }

    for (name, value) in [
        ("docker-hub-api", &settings.endpoints.docker_hub_api),
        ("quay-api", &settings.endpoints.quay_api),
    ] {
        let url = Url::parse(value)
            .map_err(|e| Error::invalid_config(format!("{} '{}': {}", name, value, e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(Error::invalid_config(format!(
                "{} must use http or https, got '{}'",
                name,
                url.scheme()
            )));
        }
    }

    Ok(())
}
